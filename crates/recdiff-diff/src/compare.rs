//! Diff entry point and shared helpers for nested comparisons.

use recdiff_types::{Array, Record, SpliceValue, Value};
use tracing::debug;

use crate::array_diff::diff_array;
use crate::error::{DiffError, DiffResult};
use crate::object_diff::diff_object;
use crate::options::DiffOptions;

/// Compute the records that make `b` look like `a`.
///
/// Both arguments must be arrays or plain objects. When `a` is an array the
/// comparison is an array diff and a non-array `b` counts as empty; when `a`
/// is an object and `b` an array, `b` counts as an empty object.
///
/// Recursion depth follows the nesting depth of the inputs, so extremely
/// deep structures can exhaust the stack.
pub fn diff(a: &Value, b: &Value, options: &DiffOptions) -> DiffResult<Vec<Record>> {
    let records = compare(a, b, options)?;
    debug!(
        kind = a.type_name(),
        records = records.len(),
        "computed diff"
    );
    Ok(records)
}

pub(crate) fn compare(a: &Value, b: &Value, options: &DiffOptions) -> DiffResult<Vec<Record>> {
    match (a, b) {
        (Value::Array(a), Value::Array(b)) => diff_array(a, b, options),
        (Value::Array(a), Value::Object(_)) => diff_array(a, &Array::new(), options),
        (Value::Object(_), Value::Object(_)) => diff_object(a, b, options),
        (Value::Object(_), Value::Array(_)) => diff_object(a, &Value::empty_object(), options),
        _ => Err(DiffError::InvalidInput {
            a: a.type_name(),
            b: b.type_name(),
        }),
    }
}

/// Diff a nested container against the matching value on the other side,
/// or against an empty container of the same kind when there is none.
pub(crate) fn compare_nested(
    a: &Value,
    b: Option<&Value>,
    options: &DiffOptions,
) -> DiffResult<Vec<Record>> {
    match b {
        Some(b) if same_container(a, b) => compare(a, b, options),
        _ => compare(a, &empty_like(a), options),
    }
}

/// Both values are arrays, or both are objects.
pub(crate) fn same_container(a: &Value, b: &Value) -> bool {
    (a.is_array() && b.is_array()) || (a.is_object() && b.is_object())
}

/// An empty container of the same kind as `value`.
pub(crate) fn empty_like(value: &Value) -> Value {
    if value.is_array() {
        Value::empty_array()
    } else {
        Value::empty_object()
    }
}

/// Wrap nested records so the patcher knows which container they rebuild.
pub(crate) fn nested_splice_value(a: &Value, records: Vec<Record>) -> SpliceValue {
    if a.is_array() {
        SpliceValue::Array(records)
    } else {
        SpliceValue::Object(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn primitives_are_rejected() {
        let err = diff(&v(json!(1)), &v(json!({})), &DiffOptions::default()).unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput { a: "number", b: "object" }));

        let err = diff(&v(json!([])), &Value::Null, &DiffOptions::default()).unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput { b: "null", .. }));
    }

    #[test]
    fn array_against_object_deletes_nothing() {
        let records = diff(&v(json!([1])), &v(json!({"x": 1})), &DiffOptions::default()).unwrap();
        assert_eq!(records, vec![Record::splice(0, 0, vec![Value::from(1).into()])]);
    }

    #[test]
    fn object_against_array_adds_everything() {
        let records = diff(&v(json!({"x": 1})), &v(json!([1, 2])), &DiffOptions::default()).unwrap();
        assert_eq!(records, vec![Record::add("x", 1)]);
    }

    #[test]
    fn identical_inputs_produce_nothing() {
        let value = v(json!({"a": [1, {"b": [true, null, "s"]}], "c": {"d": {}}}));
        assert!(diff(&value, &value.clone(), &DiffOptions::default())
            .unwrap()
            .is_empty());

        let list = v(json!([[1, 2], {"k": "v"}, 3]));
        assert!(diff(&list, &list.clone(), &DiffOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_like_matches_kind() {
        assert!(empty_like(&v(json!([1]))).is_array());
        assert!(empty_like(&v(json!({"a": 1}))).is_object());
        assert!(same_container(&v(json!([])), &v(json!([1]))));
        assert!(!same_container(&v(json!([])), &v(json!({}))));
    }
}
