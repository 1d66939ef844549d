//! Document — the unit of storage.
//!
//! A document is an arbitrarily nested JSON object paired with an opaque,
//! string-sortable identifier. Documents are written once and never updated
//! or deleted; everything else in the engine is derived from them.

use serde_json::Value;

/// A document body: a JSON object mapping string keys to scalars, nested
/// objects, or arrays. Arrays are opaque to indexing.
pub type Document = serde_json::Map<String, Value>;

/// Canonical text rendering of a JSON value, shared by the fact flattener
/// and the equality matcher so that `flatten` output and query literals
/// compare in the same space.
///
/// Strings render bare (no surrounding quotes), numbers and booleans use
/// their JSON form, `null` renders as `null`. Objects and arrays fall back
/// to compact JSON; they are never produced by `flatten` but a path lookup
/// can resolve to one.
pub fn render_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Descend `doc` along a dotted path, one object level per segment.
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not an object. An empty path resolves to nothing.
pub fn get_path<'a>(doc: &'a Document, path: &[String]) -> Option<&'a Value> {
  let (first, rest) = path.split_first()?;
  let mut current = doc.get(first)?;
  for part in rest {
    current = current.as_object()?.get(part)?;
  }
  Some(current)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn doc(v: Value) -> Document {
    match v {
      Value::Object(map) => map,
      other => panic!("expected object, got {other}"),
    }
  }

  fn path(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
  }

  #[test]
  fn render_scalars() {
    assert_eq!(render_value(&json!(2)), "2");
    assert_eq!(render_value(&json!(2.5)), "2.5");
    assert_eq!(render_value(&json!("hey im here")), "hey im here");
    assert_eq!(render_value(&json!(true)), "true");
    assert_eq!(render_value(&json!(null)), "null");
  }

  #[test]
  fn get_path_descends_nested_objects() {
    let d = doc(json!({"a": {"b": 1}}));
    assert_eq!(get_path(&d, &path(&["a", "b"])), Some(&json!(1)));
    assert_eq!(get_path(&d, &path(&["a", "c"])), None);
  }

  #[test]
  fn get_path_through_non_object_is_none() {
    let d = doc(json!({"a": 1}));
    assert_eq!(get_path(&d, &path(&["a", "b"])), None);
  }

  #[test]
  fn get_path_can_resolve_an_object() {
    let d = doc(json!({"a": {"b": 1}}));
    assert_eq!(get_path(&d, &path(&["a"])), Some(&json!({"b": 1})));
  }

  #[test]
  fn get_path_empty_path_is_none() {
    let d = doc(json!({"a": 1}));
    assert_eq!(get_path(&d, &[]), None);
  }
}
