//! Filter — the query language.
//!
//! Grammar: `key[.key...]:[<|>]value`, space-separated comparisons, implicit
//! AND. Tokens are either quoted (`"a b : . 2"`, which may contain dots,
//! colons and spaces; no escape sequences) or bare maximal runs of letters,
//! digits and `.`. The operator precedes the value token: `c:>5`, never
//! `c:">5"`.
//!
//! Pipeline:
//!   raw &str
//!     └─ lex_token()   → token + index past it
//!          └─ parse()  → Filter { ands: Vec<Comparison> }
//!               └─ Filter::matches() applied per document

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::document::{Document, get_path, render_value};

// ─── Types ───────────────────────────────────────────────────────────────────

/// Comparison operator. Equality compares canonical text renderings; the
/// range operators compare numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Eq,
  Lt,
  Gt,
}

impl fmt::Display for Op {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Op::Eq => write!(f, "="),
      Op::Lt => write!(f, "<"),
      Op::Gt => write!(f, ">"),
    }
  }
}

/// One `(path, operator, literal)` clause of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
  /// Key path, split on `.` from the key token.
  pub path:  Vec<String>,
  /// Literal value token, unquoted form.
  pub value: String,
  pub op:    Op,
}

/// A parsed query: the AND of its comparisons. An empty filter matches
/// every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
  pub ands: Vec<Comparison>,
}

/// Lexer and parser failures. Positions are character indices into the
/// query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
  #[error("unterminated quoted string starting at position {0}")]
  UnterminatedQuote(usize),

  #[error("expected a token at position {0}")]
  EmptyToken(usize),

  #[error("expected ':' at position {0}")]
  ExpectedColon(usize),
}

// ─── Lexer ───────────────────────────────────────────────────────────────────

/// Lex one token from `input` starting at `start`.
///
/// A leading `"` consumes through the next `"` inclusive and yields the
/// content between the quotes (which may be empty). Otherwise a maximal run
/// of alphanumerics and `.` is consumed; zero characters is an
/// [`FilterError::EmptyToken`], including at end of input — an operator with
/// nothing after it is malformed, not an empty literal.
///
/// Returns the token and the index just past it.
pub(crate) fn lex_token(
  input: &[char],
  start: usize,
) -> Result<(String, usize), FilterError> {
  if start >= input.len() {
    return Err(FilterError::EmptyToken(start));
  }

  if input[start] == '"' {
    let mut i = start + 1;
    while i < input.len() {
      if input[i] == '"' {
        return Ok((input[start + 1..i].iter().collect(), i + 1));
      }
      i += 1;
    }
    return Err(FilterError::UnterminatedQuote(start));
  }

  let mut i = start;
  while i < input.len() && (input[i].is_alphanumeric() || input[i] == '.') {
    i += 1;
  }
  if i == start {
    return Err(FilterError::EmptyToken(start));
  }
  Ok((input[start..i].iter().collect(), i))
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse a query string into a [`Filter`].
///
/// Loop: skip whitespace (end of input here is a clean finish), lex a key
/// token, require `:`, take an optional `<` or `>` operator, lex a value
/// token, split the key on `.` into the path. An empty query yields an
/// empty filter.
pub fn parse(query: &str) -> Result<Filter, FilterError> {
  let input: Vec<char> = query.chars().collect();
  let mut ands = Vec::new();
  let mut i = 0;

  while i < input.len() {
    while i < input.len() && input[i].is_whitespace() {
      i += 1;
    }
    if i >= input.len() {
      break;
    }

    let (key, after_key) = lex_token(&input, i)?;
    if after_key >= input.len() || input[after_key] != ':' {
      return Err(FilterError::ExpectedColon(after_key));
    }
    i = after_key + 1;

    let op = match input.get(i) {
      Some('<') => {
        i += 1;
        Op::Lt
      }
      Some('>') => {
        i += 1;
        Op::Gt
      }
      _ => Op::Eq,
    };

    let (value, after_value) = lex_token(&input, i)?;
    i = after_value;

    ands.push(Comparison {
      path: key.split('.').map(str::to_string).collect(),
      value,
      op,
    });
  }

  Ok(Filter { ands })
}

// ─── Matching ────────────────────────────────────────────────────────────────

/// Numeric coercion for the range operators: numbers convert directly,
/// strings are parsed as floats, anything else has no numeric value.
fn coerce_number(value: &Value) -> Option<f64> {
  match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.parse().ok(),
    _ => None,
  }
}

impl Comparison {
  /// Whether `doc` satisfies this clause. A missing path or a non-object
  /// intermediate fails the clause; an unparsable range literal or an
  /// uncoercible resolved value is a non-match, never an error.
  pub fn matches(&self, doc: &Document) -> bool {
    let Some(resolved) = get_path(doc, &self.path) else {
      return false;
    };

    match self.op {
      Op::Eq => render_value(resolved) == self.value,
      Op::Lt | Op::Gt => {
        let (Ok(literal), Some(actual)) =
          (self.value.parse::<f64>(), coerce_number(resolved))
        else {
          return false;
        };
        if self.op == Op::Lt {
          actual < literal
        } else {
          actual > literal
        }
      }
    }
  }

  /// Whether this clause is a range (`<` / `>`) comparison. Range clauses
  /// are never index-accelerated.
  pub fn is_range(&self) -> bool { self.op != Op::Eq }
}

impl Filter {
  /// Whether `doc` satisfies every comparison.
  pub fn matches(&self, doc: &Document) -> bool {
    self.ands.iter().all(|cmp| cmp.matches(doc))
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Whether `token` must be quoted to survive a parse round-trip.
fn needs_quotes(token: &str) -> bool {
  token.is_empty()
    || token.chars().any(|c| !(c.is_alphanumeric() || c == '.'))
}

fn write_token(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
  if needs_quotes(token) {
    write!(f, "\"{token}\"")
  } else {
    write!(f, "{token}")
  }
}

impl fmt::Display for Comparison {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_token(f, &self.path.join("."))?;
    write!(f, ":")?;
    if self.op != Op::Eq {
      write!(f, "{}", self.op)?;
    }
    write_token(f, &self.value)
  }
}

impl fmt::Display for Filter {
  /// Query-string form; `parse` of the output reproduces the filter for
  /// tokens free of embedded quotes (and, for key tokens, free of dots
  /// inside a single path segment).
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, cmp) in self.ands.iter().enumerate() {
      if i > 0 {
        write!(f, " ")?;
      }
      write!(f, "{cmp}")?;
    }
    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn chars(s: &str) -> Vec<char> { s.chars().collect() }

  fn doc(v: serde_json::Value) -> Document {
    match v {
      Value::Object(map) => map,
      other => panic!("expected object, got {other}"),
    }
  }

  // ── Lexer ──────────────────────────────────────────────────────────────

  #[test]
  fn lex_bare_token_stops_at_colon() {
    let input = chars("a.b:c");
    assert_eq!(lex_token(&input, 0).unwrap(), ("a.b".to_string(), 3));
  }

  #[test]
  fn lex_quoted_token_spans_specials() {
    let input = chars("\"a b : . 2\":12");
    assert_eq!(
      lex_token(&input, 0).unwrap(),
      ("a b : . 2".to_string(), 11)
    );
  }

  #[test]
  fn lex_at_whitespace_is_empty_token() {
    let input = chars(" a:2");
    assert_eq!(lex_token(&input, 0), Err(FilterError::EmptyToken(0)));
    assert_eq!(lex_token(&input, 1).unwrap(), ("a".to_string(), 2));
  }

  #[test]
  fn lex_at_end_of_input_is_empty_token() {
    let input = chars("a:");
    assert_eq!(lex_token(&input, 2), Err(FilterError::EmptyToken(2)));
  }

  #[test]
  fn lex_unterminated_quote() {
    let input = chars("\"abc");
    assert_eq!(lex_token(&input, 0), Err(FilterError::UnterminatedQuote(0)));
  }

  #[test]
  fn lex_empty_quoted_token_is_fine() {
    let input = chars("\"\"x");
    assert_eq!(lex_token(&input, 0).unwrap(), (String::new(), 2));
  }

  // ── Parser ─────────────────────────────────────────────────────────────

  #[test]
  fn parse_two_equality_comparisons() {
    let filter = parse("a.b:1 c:2").unwrap();
    assert_eq!(filter.ands, vec![
      Comparison {
        path:  vec!["a".to_string(), "b".to_string()],
        value: "1".to_string(),
        op:    Op::Eq,
      },
      Comparison {
        path:  vec!["c".to_string()],
        value: "2".to_string(),
        op:    Op::Eq,
      },
    ]);
  }

  #[test]
  fn parse_quoted_key_and_value_preserve_spaces() {
    let filter = parse("\" a \":\" n \"").unwrap();
    assert_eq!(filter.ands, vec![Comparison {
      path:  vec![" a ".to_string()],
      value: " n ".to_string(),
      op:    Op::Eq,
    }]);
  }

  #[test]
  fn parse_range_operators() {
    let filter = parse("a:>5 b:<3").unwrap();
    assert_eq!(filter.ands[0].op, Op::Gt);
    assert_eq!(filter.ands[0].value, "5");
    assert_eq!(filter.ands[1].op, Op::Lt);
    assert_eq!(filter.ands[1].value, "3");
  }

  #[test]
  fn parse_empty_query_is_empty_filter() {
    assert_eq!(parse("").unwrap(), Filter::default());
  }

  #[test]
  fn parse_trailing_whitespace_is_clean() {
    let filter = parse("a:2  ").unwrap();
    assert_eq!(filter.ands.len(), 1);
  }

  #[test]
  fn parse_missing_colon() {
    assert_eq!(parse("abc"), Err(FilterError::ExpectedColon(3)));
    assert_eq!(parse("a=b"), Err(FilterError::ExpectedColon(1)));
  }

  #[test]
  fn parse_operator_without_value() {
    assert_eq!(parse("a:>"), Err(FilterError::EmptyToken(3)));
  }

  #[test]
  fn parse_missing_value() {
    assert_eq!(parse("a:"), Err(FilterError::EmptyToken(2)));
  }

  #[test]
  fn parse_unterminated_quoted_value() {
    assert_eq!(parse("a:\"abc"), Err(FilterError::UnterminatedQuote(2)));
  }

  // ── Matching ───────────────────────────────────────────────────────────

  #[test]
  fn match_nested_equality() {
    let d = doc(json!({"a": {"b": 1}}));
    assert!(parse("a.b:1").unwrap().matches(&d));
    assert!(!parse("a.c:1").unwrap().matches(&d));
  }

  #[test]
  fn match_string_equality_is_exact() {
    let d = doc(json!({"name": "ada"}));
    assert!(parse("name:ada").unwrap().matches(&d));
    assert!(!parse("name:Ada").unwrap().matches(&d));
  }

  #[test]
  fn match_range_numeric() {
    let d = doc(json!({"n": 10}));
    assert!(parse("n:>5").unwrap().matches(&d));
    assert!(!parse("n:<5").unwrap().matches(&d));
    assert!(!parse("n:>10").unwrap().matches(&d));
  }

  #[test]
  fn match_range_coerces_numeric_strings() {
    let d = doc(json!({"n": "10"}));
    assert!(parse("n:>5").unwrap().matches(&d));
  }

  #[test]
  fn match_range_non_numeric_is_no_match() {
    let d = doc(json!({"n": "abc"}));
    assert!(!parse("n:>5").unwrap().matches(&d));
    let d = doc(json!({"n": true}));
    assert!(!parse("n:>5").unwrap().matches(&d));
  }

  #[test]
  fn match_range_unparsable_literal_is_no_match() {
    let d = doc(json!({"n": 10}));
    assert!(!parse("n:>abc").unwrap().matches(&d));
  }

  #[test]
  fn match_intermediate_scalar_fails_path() {
    let d = doc(json!({"a": 1}));
    assert!(!parse("a.b:1").unwrap().matches(&d));
  }

  #[test]
  fn match_empty_filter_matches_everything() {
    let d = doc(json!({"x": 1}));
    assert!(Filter::default().matches(&d));
  }

  #[test]
  fn match_conjunction_requires_all() {
    let d = doc(json!({"a": 1, "b": 2}));
    assert!(parse("a:1 b:2").unwrap().matches(&d));
    assert!(!parse("a:1 b:3").unwrap().matches(&d));
  }

  // ── Rendering round-trip ───────────────────────────────────────────────

  #[test]
  fn render_parse_round_trip() {
    for q in ["a.b:1 c:2", "a:>5 b:<3", "\" a \":\" n \"", "k:\"v w\""] {
      let filter = parse(q).unwrap();
      assert_eq!(parse(&filter.to_string()).unwrap(), filter, "query: {q}");
    }
  }

  #[test]
  fn render_bare_tokens_stay_bare() {
    let filter = parse("a.b:>12").unwrap();
    assert_eq!(filter.to_string(), "a.b:>12");
  }
}
