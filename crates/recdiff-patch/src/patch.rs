//! Apply edit records to a target in place.
//!
//! Records are applied in order. A splice needs an array and every other
//! record needs an object; when the target has the wrong shape it is replaced
//! by an empty container of the right kind before the record runs.

use recdiff_types::{Array, ConstructRecord, Descriptor, Object, Record, SpliceRecord, SpliceValue, Value};
use tracing::{debug, trace};

use crate::error::{PatchError, PatchResult};
use crate::registry::FactoryRegistry;

/// Apply `records` to `target` with an empty factory registry.
///
/// Construct records fail with [`PatchError::UnknownFactory`]; use a
/// [`Patcher`] with registered factories when records may contain them.
pub fn patch(target: &mut Value, records: Vec<Record>) -> PatchResult<&mut Value> {
    Patcher::default().patch(target, records)
}

/// Applies records, building construct records through its registry.
#[derive(Clone, Debug, Default)]
pub struct Patcher {
    registry: FactoryRegistry,
}

impl Patcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: FactoryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FactoryRegistry {
        &mut self.registry
    }

    /// Apply `records` to `target` and hand the target back.
    ///
    /// The target must be an array or a plain object that is neither sealed
    /// nor frozen. A failing record stops the run; earlier records stay
    /// applied.
    pub fn patch<'t>(&self, target: &'t mut Value, records: Vec<Record>) -> PatchResult<&'t mut Value> {
        if !target.is_array() && !target.is_object() {
            return Err(PatchError::InvalidTarget(target.type_name()));
        }
        if target.is_immutable() {
            return Err(PatchError::ImmutableTarget);
        }

        debug!(
            kind = target.type_name(),
            records = records.len(),
            "applying patch"
        );

        for record in records {
            self.apply(target, record)?;
        }
        Ok(target)
    }

    fn apply(&self, target: &mut Value, record: Record) -> PatchResult<()> {
        trace!(kind = record.kind(), name = record.name(), "applying record");
        match record {
            Record::Splice(splice) => self.patch_splice(array_slot(target)?, splice),
            Record::Delete { name } => {
                object_slot(target)?.delete(&name)?;
                Ok(())
            }
            Record::Add {
                name,
                descriptor,
                value_records,
            } => self.patch_property(object_slot(target)?, &name, descriptor, value_records, false),
            Record::Update {
                name,
                descriptor,
                value_records,
            } => self.patch_property(object_slot(target)?, &name, descriptor, value_records, true),
            Record::Construct(construct) => self.patch_construct(object_slot(target)?, construct),
        }
    }

    fn patch_splice(&self, array: &mut Array, splice: SpliceRecord) -> PatchResult<()> {
        let SpliceRecord {
            start,
            delete_count,
            add,
        } = splice;

        let mut previous = array.slice(start, delete_count).into_iter();
        let resolved = add
            .into_iter()
            .map(|value| self.resolve(value, previous.next()))
            .collect::<PatchResult<Vec<_>>>()?;

        array.splice(start, delete_count, resolved)?;
        Ok(())
    }

    /// Turn a staged splice value into the value to insert. Nested record
    /// lists rebuild the item they replace when it has the matching kind.
    fn resolve(&self, value: SpliceValue, previous: Option<Value>) -> PatchResult<Value> {
        let (mut base, records) = match (value, previous) {
            (SpliceValue::Value(value), _) => return Ok(value),
            (SpliceValue::Array(records), Some(previous @ Value::Array(_))) => (previous, records),
            (SpliceValue::Array(records), _) => (Value::empty_array(), records),
            (SpliceValue::Object(records), Some(previous @ Value::Object(_))) => (previous, records),
            (SpliceValue::Object(records), _) => (Value::empty_object(), records),
        };
        self.patch(&mut base, records)?;
        Ok(base)
    }

    fn patch_property(
        &self,
        object: &mut Object,
        name: &str,
        mut descriptor: Descriptor,
        value_records: Vec<Record>,
        update: bool,
    ) -> PatchResult<()> {
        if !value_records.is_empty() {
            let mut base = match object.get(name) {
                Some(existing) if update && same_container(existing, &descriptor.value) => {
                    existing.clone()
                }
                _ => std::mem::take(&mut descriptor.value),
            };
            self.patch(&mut base, value_records)?;
            descriptor.value = base;
        }
        object.define_property(name, descriptor)?;
        Ok(())
    }

    fn patch_construct(&self, object: &mut Object, construct: ConstructRecord) -> PatchResult<()> {
        let ConstructRecord {
            name,
            factory,
            args,
            descriptor,
            property_records,
        } = construct;

        let Some(name) = name else {
            return Err(PatchError::UnnamedConstruct(factory));
        };
        let mut value = self
            .registry
            .build(&factory, &args)
            .ok_or_else(|| PatchError::UnknownFactory(factory.clone()))?;

        if !property_records.is_empty() {
            if !value.is_array() && !value.is_object() {
                return Err(PatchError::ConstructTarget {
                    factory,
                    found: value.type_name(),
                });
            }
            for record in property_records {
                self.apply(&mut value, record)?;
            }
        }

        debug!(name = %name, factory = %factory, "constructed value");
        object.define_property(&name, Descriptor::with_flags(value, descriptor.unwrap_or_default()))?;
        Ok(())
    }
}

fn same_container(a: &Value, b: &Value) -> bool {
    (a.is_array() && b.is_array()) || (a.is_object() && b.is_object())
}

fn array_slot(target: &mut Value) -> PatchResult<&mut Array> {
    if !target.is_array() {
        *target = Value::empty_array();
    }
    let found = target.type_name();
    target.as_array_mut().ok_or(PatchError::InvalidTarget(found))
}

fn object_slot(target: &mut Value) -> PatchResult<&mut Object> {
    if !target.is_object() {
        *target = Value::empty_object();
    }
    let found = target.type_name();
    target.as_object_mut().ok_or(PatchError::InvalidTarget(found))
}
