//! Object diff: compare two plain objects key by key.
//!
//! Records come out in two groups: add/update records for the comparable
//! keys of `a` in key order, then delete records for the comparable keys of
//! `b` that `a` lacks, also in key order.

use recdiff_types::{Descriptor, PropertyKey, Record, Value, ValueKind};
use tracing::trace;

use crate::comparable::{get_comparable_objects, ComparableObjects};
use crate::compare::{compare_nested, empty_like, same_container};
use crate::error::{DiffError, DiffResult};
use crate::options::DiffOptions;

pub(crate) fn diff_object(a: &Value, b: &Value, options: &DiffOptions) -> DiffResult<Vec<Record>> {
    let (Value::Object(obj_a), Value::Object(obj_b)) = (a, b) else {
        return Err(DiffError::InvalidInput {
            a: a.type_name(),
            b: b.type_name(),
        });
    };

    let ComparableObjects {
        comparable_a,
        comparable_b,
        ..
    } = get_comparable_objects(obj_a, obj_b, options);

    let mut records = Vec::new();

    for (&name, &value_a) in &comparable_a {
        let value_b = comparable_b.get(name).copied();
        let b_has = value_b.is_some();

        if let Some(value_b) = value_b {
            if value_a.identical(value_b) || options.functions_match(value_a, value_b) {
                continue;
            }
        }

        let pass_through = options.ignore_property_values.matches(name, obj_a, obj_b);
        let b_custom = value_b.is_some_and(Value::is_custom);

        let record = match value_a.kind() {
            ValueKind::Sequence | ValueKind::Mapping if !pass_through => {
                let nested = compare_nested(value_a, value_b, options)?;
                // An empty nested diff is only a no-op when `b` already holds
                // a container of the same kind.
                if nested.is_empty() && value_b.is_some_and(|b| same_container(value_a, b)) {
                    None
                } else {
                    Some(patch_record(b_has, name, empty_like(value_a), nested))
                }
            }
            ValueKind::Custom if !b_custom => match value_a {
                Value::Custom(custom) => custom.diff(
                    value_b.unwrap_or(&Value::Undefined),
                    PropertyKey::Name(name),
                    b,
                ),
                _ => None,
            },
            _ if b_custom => match value_b {
                Some(Value::Custom(custom)) => custom.diff(value_a, PropertyKey::Name(name), a),
                _ => None,
            },
            ValueKind::Primitive => Some(patch_record(b_has, name, value_a.clone(), Vec::new())),
            _ if pass_through || options.permits_function(value_a) => {
                Some(patch_record(b_has, name, value_a.clone(), Vec::new()))
            }
            found => {
                return Err(DiffError::UnsupportedProperty {
                    name: name.to_string(),
                    found,
                })
            }
        };

        if let Some(record) = record {
            trace!(name, kind = record.kind(), "property differs");
            records.push(record);
        }
    }

    for &name in comparable_b.keys() {
        if !comparable_a.contains_key(name) {
            trace!(name, "property removed");
            records.push(Record::delete(name));
        }
    }

    Ok(records)
}

fn patch_record(update: bool, name: &str, value: Value, value_records: Vec<Record>) -> Record {
    let name = name.to_string();
    let descriptor = Descriptor::new(value);
    if update {
        Record::Update {
            name,
            descriptor,
            value_records,
        }
    } else {
        Record::Add {
            name,
            descriptor,
            value_records,
        }
    }
}
