//! Edit records: the output of a diff and the input of a patch.
//!
//! A record list describes how a *target* must change to look like a
//! *source*. Records are plain values: they hold no reference back to either
//! side and serialize to a JSON shape tagged by `type`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{PropertyFlags, Value};

fn default_true() -> bool {
    true
}

/// A value together with the flags it is installed with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub value: Value,
    #[serde(default = "default_true")]
    pub writable: bool,
    #[serde(default = "default_true")]
    pub enumerable: bool,
    #[serde(default = "default_true")]
    pub configurable: bool,
}

impl Descriptor {
    /// A writable, enumerable, configurable descriptor for `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_flags(value, PropertyFlags::default())
    }

    pub fn with_flags(value: impl Into<Value>, flags: PropertyFlags) -> Self {
        Self {
            value: value.into(),
            writable: flags.writable,
            enumerable: flags.enumerable,
            configurable: flags.configurable,
        }
    }

    pub fn flags(&self) -> PropertyFlags {
        PropertyFlags {
            writable: self.writable,
            enumerable: self.enumerable,
            configurable: self.configurable,
        }
    }
}

/// One edit operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    /// Install a key the target does not have.
    Add {
        name: String,
        descriptor: Descriptor,
        /// Edits that build the new value's own structure.
        #[serde(default, rename = "valueRecords", skip_serializing_if = "Vec::is_empty")]
        value_records: Vec<Record>,
    },
    /// Replace the value of a key the target already has.
    Update {
        name: String,
        descriptor: Descriptor,
        #[serde(default, rename = "valueRecords", skip_serializing_if = "Vec::is_empty")]
        value_records: Vec<Record>,
    },
    /// Remove a key.
    Delete { name: String },
    /// Array-style remove-and-insert within a sequence.
    Splice(SpliceRecord),
    /// Instantiate a value through a registered factory.
    Construct(ConstructRecord),
}

impl Record {
    /// An add record carrying `value` directly.
    pub fn add(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Record::Add {
            name: name.into(),
            descriptor: Descriptor::new(value),
            value_records: Vec::new(),
        }
    }

    /// An update record carrying `value` directly.
    pub fn update(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Record::Update {
            name: name.into(),
            descriptor: Descriptor::new(value),
            value_records: Vec::new(),
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Record::Delete { name: name.into() }
    }

    pub fn splice(start: usize, delete_count: usize, add: Vec<SpliceValue>) -> Self {
        Record::Splice(SpliceRecord {
            start,
            delete_count,
            add,
        })
    }

    /// The `type` tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Add { .. } => "add",
            Record::Update { .. } => "update",
            Record::Delete { .. } => "delete",
            Record::Splice(_) => "splice",
            Record::Construct(_) => "construct",
        }
    }

    /// The key this record targets. Splices and unnamed construct drafts
    /// have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Record::Add { name, .. } | Record::Update { name, .. } | Record::Delete { name } => {
                Some(name)
            }
            Record::Construct(c) => c.name.as_deref(),
            Record::Splice(_) => None,
        }
    }

    /// Stamp the record with a key. Has no effect on splices.
    pub fn set_name(&mut self, new_name: impl Into<String>) {
        match self {
            Record::Add { name, .. } | Record::Update { name, .. } | Record::Delete { name } => {
                *name = new_name.into();
            }
            Record::Construct(c) => c.name = Some(new_name.into()),
            Record::Splice(_) => {}
        }
    }

    pub fn is_splice(&self) -> bool {
        matches!(self, Record::Splice(_))
    }

    /// Nested records of an add/update, empty for everything else.
    pub fn value_records(&self) -> &[Record] {
        match self {
            Record::Add { value_records, .. } | Record::Update { value_records, .. } => {
                value_records
            }
            _ => &[],
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Add { name, value_records, .. } | Record::Update { name, value_records, .. } => {
                write!(f, "{} {name}", self.kind())?;
                if !value_records.is_empty() {
                    write!(f, " ({} nested)", value_records.len())?;
                }
                Ok(())
            }
            Record::Delete { name } => write!(f, "delete {name}"),
            Record::Splice(s) => write!(
                f,
                "splice @{} -{} +{}",
                s.start,
                s.delete_count,
                s.add.len()
            ),
            Record::Construct(c) => write!(
                f,
                "construct {} = {}({} args)",
                c.name.as_deref().unwrap_or("?"),
                c.factory,
                c.args.len()
            ),
        }
    }
}

/// Remove `delete_count` items at `start`, then insert `add` there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpliceRecord {
    pub start: usize,
    #[serde(rename = "deleteCount")]
    pub delete_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<SpliceValue>,
}

/// A value staged for insertion by a splice.
///
/// Nested record lists are tagged with the container they rebuild, so the
/// patcher knows whether to start from an array or an object when the
/// sequence had nothing at that position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpliceValue {
    Value(Value),
    Array(Vec<Record>),
    Object(Vec<Record>),
}

impl From<Value> for SpliceValue {
    fn from(value: Value) -> Self {
        SpliceValue::Value(value)
    }
}

/// Instantiate a value through a named factory and install it under `name`.
///
/// Diffing never produces these; they come from [`create_construct_record`]
/// or from custom differs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Registry tag of the factory that builds the value.
    pub factory: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<PropertyFlags>,
    /// Records applied to the freshly built value before it is installed.
    #[serde(default, rename = "propertyRecords", skip_serializing_if = "Vec::is_empty")]
    pub property_records: Vec<Record>,
}

impl ConstructRecord {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property_records(mut self, records: Vec<Record>) -> Self {
        self.property_records = records;
        self
    }
}

impl From<ConstructRecord> for Record {
    fn from(record: ConstructRecord) -> Self {
        Record::Construct(record)
    }
}

/// Draft a construct record. The name is attached later, either explicitly
/// with [`ConstructRecord::named`] or by the custom differ that returns it.
pub fn create_construct_record(
    factory: impl Into<String>,
    args: Vec<Value>,
    descriptor: Option<PropertyFlags>,
) -> ConstructRecord {
    ConstructRecord {
        name: None,
        factory: factory.into(),
        args,
        descriptor,
        property_records: Vec::new(),
    }
}

/// Where a value sits inside its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey<'a> {
    Name(&'a str),
    Index(usize),
}

impl fmt::Display for PropertyKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Name(name) => f.write_str(name),
            PropertyKey::Index(index) => write!(f, "{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_name_stamps_named_records() {
        let mut r = Record::delete("old");
        r.set_name("new");
        assert_eq!(r.name(), Some("new"));

        let mut c = Record::from(create_construct_record("Date", vec![], None));
        assert_eq!(c.name(), None);
        c.set_name("when");
        assert_eq!(c.name(), Some("when"));

        let mut s = Record::splice(0, 1, vec![]);
        s.set_name("ignored");
        assert_eq!(s.name(), None);
    }

    #[test]
    fn wire_shape_of_records() {
        let records = vec![
            Record::add("a", 1),
            Record::delete("b"),
            Record::splice(1, 2, vec![Value::from(2).into(), Value::from(3).into()]),
        ];
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(
            json,
            json!([
                {"type": "add", "name": "a", "descriptor": {
                    "value": 1, "writable": true, "enumerable": true, "configurable": true
                }},
                {"type": "delete", "name": "b"},
                {"type": "splice", "start": 1, "deleteCount": 2, "add": [{"value": 2}, {"value": 3}]}
            ])
        );
    }

    #[test]
    fn parses_records_with_defaulted_flags() {
        let json = json!([
            {"type": "update", "name": "cfg", "descriptor": {"value": {}},
             "valueRecords": [{"type": "add", "name": "port", "descriptor": {"value": 8080}}]},
            {"type": "splice", "start": 0, "deleteCount": 1},
            {"type": "construct", "name": "at", "factory": "Date", "args": [0]}
        ]);
        let records: Vec<Record> = serde_json::from_value(json).unwrap();
        assert_eq!(records.len(), 3);

        match &records[0] {
            Record::Update { descriptor, value_records, .. } => {
                assert!(descriptor.writable && descriptor.enumerable && descriptor.configurable);
                assert_eq!(value_records.len(), 1);
            }
            other => panic!("expected Update, got {other:?}"),
        }
        match &records[1] {
            Record::Splice(s) => assert!(s.add.is_empty()),
            other => panic!("expected Splice, got {other:?}"),
        }
        match &records[2] {
            Record::Construct(c) => {
                assert_eq!(c.factory, "Date");
                assert_eq!(c.args, vec![Value::from(0)]);
                assert!(c.descriptor.is_none());
            }
            other => panic!("expected Construct, got {other:?}"),
        }
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Record::delete("x").to_string(), "delete x");
        assert_eq!(Record::splice(3, 1, vec![]).to_string(), "splice @3 -1 +0");
        let c = Record::from(create_construct_record("Date", vec![Value::from(1)], None).named("t"));
        assert_eq!(c.to_string(), "construct t = Date(1 args)");
    }
}
