//! Fact — the unit of indexing.
//!
//! A fact is a `path=value` pair derived from one scalar leaf of a document.
//! Facts are never persisted as first-class records; their rendered form is
//! the key into the inverted index.

use std::fmt;

use serde_json::Value;

use crate::document::{Document, render_value};

/// One scalar leaf of a document: the dot-joined key chain and the canonical
/// rendering of the value at the end of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fact {
  pub path:  String,
  pub value: String,
}

impl fmt::Display for Fact {
  /// The index-key form, `path=value`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}", self.path, self.value)
  }
}

/// Decompose a document into its facts.
///
/// Nested objects recurse with the accumulated dotted prefix. Arrays are
/// skipped entirely at any depth (scalar elements included); they are never
/// indexed. Scalars emit one fact each. Only set membership of the result
/// is meaningful; order follows document key order.
pub fn flatten(doc: &Document, prefix: &str) -> Vec<Fact> {
  let mut facts = Vec::new();

  for (key, value) in doc {
    let path = if prefix.is_empty() {
      key.clone()
    } else {
      format!("{prefix}.{key}")
    };

    match value {
      Value::Object(inner) => facts.extend(flatten(inner, &path)),
      Value::Array(_) => {}
      scalar => facts.push(Fact {
        path,
        value: render_value(scalar),
      }),
    }
  }

  facts
}
