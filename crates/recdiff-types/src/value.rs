//! The plain-data value model.
//!
//! A [`Value`] is either a primitive, an ordered [`Array`], a plain
//! [`Object`] mapping string keys to [`Property`] slots, or one of the
//! reference variants (functions, custom-diff wrappers, opaque host objects)
//! that only take part in comparison by identity.
//!
//! # Invariants
//!
//! - Object keys iterate in sorted order, so every traversal is deterministic.
//! - Property flags default to writable, enumerable and configurable.
//! - Sealing and freezing are one-way: there is no API to undo them.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

use crate::custom::CustomDiff;
use crate::error::TypeError;
use crate::record::Descriptor;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A plain data value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Object),
    Function(FunctionRef),
    Custom(CustomDiff),
    Opaque(Opaque),
}

/// Classification of a [`Value`] as seen by the diff engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Primitive,
    Sequence,
    Mapping,
    Custom,
    Function,
    Other,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Primitive => "primitive",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
            ValueKind::Custom => "custom",
            ValueKind::Function => "function",
            ValueKind::Other => "other",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value. Checked in priority order: primitive, sequence,
/// mapping, custom wrapper, function, anything else.
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            ValueKind::Primitive
        }
        Value::Array(_) => ValueKind::Sequence,
        Value::Object(_) => ValueKind::Mapping,
        Value::Custom(_) => ValueKind::Custom,
        Value::Function(_) => ValueKind::Function,
        Value::Opaque(_) => ValueKind::Other,
    }
}

impl Value {
    /// An empty, extensible object.
    pub fn empty_object() -> Self {
        Value::Object(Object::new())
    }

    /// An empty, extensible array.
    pub fn empty_array() -> Self {
        Value::Array(Array::new())
    }

    pub fn kind(&self) -> ValueKind {
        classify(self)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Custom(_) => "custom",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.kind() == ValueKind::Primitive
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Value::Custom(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Strict identity comparison.
    ///
    /// Primitives compare by value (`NaN` is never identical to itself).
    /// Reference variants compare by pointer. Two arrays or objects are only
    /// identical when both sides are the same borrowed value.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => std::ptr::eq(a, b),
            (Value::Object(a), Value::Object(b)) => std::ptr::eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Custom(a), Value::Custom(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Whether the container is frozen or sealed. Non-containers never are.
    pub fn is_immutable(&self) -> bool {
        match self {
            Value::Array(a) => a.is_sealed(),
            Value::Object(o) => o.is_sealed(),
            _ => false,
        }
    }
}

/// Deep structural equality over what `diff` compares: own enumerable
/// properties and array items. Property flags, integrity levels and
/// non-enumerable properties are not compared; reference variants compare by
/// pointer.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => self.identical(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Integrity
// ---------------------------------------------------------------------------

/// How far a container has been locked down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Integrity {
    #[default]
    Extensible,
    NonExtensible,
    Sealed,
    Frozen,
}

// ---------------------------------------------------------------------------
// Array
// ---------------------------------------------------------------------------

/// An ordered, index-addressed sequence of values.
#[derive(Clone, Debug, Default)]
pub struct Array {
    items: Vec<Value>,
    integrity: Integrity,
}

impl Array {
    /// Create an empty, extensible array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Iterate over the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Borrow the items as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Append an item, bypassing the integrity level. Intended for building
    /// fresh values.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Copy of the items in `start..start + count`, clamped to the array.
    pub fn slice(&self, start: usize, count: usize) -> Vec<Value> {
        let start = start.min(self.items.len());
        let end = start.saturating_add(count).min(self.items.len());
        self.items[start..end].to_vec()
    }

    /// Remove `delete_count` items at `start` and insert `insert` in their
    /// place. Out-of-range positions are clamped rather than rejected.
    /// Returns the removed items.
    ///
    /// A non-extensible array cannot grow; such a splice fails and leaves the
    /// array untouched.
    pub fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        insert: Vec<Value>,
    ) -> Result<Vec<Value>, TypeError> {
        let len = self.items.len();
        let start = start.min(len);
        let end = start.saturating_add(delete_count).min(len);
        if self.integrity != Integrity::Extensible && insert.len() > end - start {
            return Err(TypeError::NotExtensible(len.to_string()));
        }
        Ok(self.items.splice(start..end, insert).collect())
    }

    /// Current integrity level.
    pub fn integrity(&self) -> Integrity {
        self.integrity
    }

    /// Forbid growing the array.
    pub fn prevent_extensions(&mut self) {
        self.integrity = self.integrity.max(Integrity::NonExtensible);
    }

    /// Forbid growing or shrinking the array.
    pub fn seal(&mut self) {
        self.integrity = self.integrity.max(Integrity::Sealed);
    }

    /// Seal the array and make its items read-only.
    pub fn freeze(&mut self) {
        self.integrity = Integrity::Frozen;
    }

    /// An empty non-extensible array counts as sealed (and frozen).
    pub fn is_sealed(&self) -> bool {
        self.integrity >= Integrity::Sealed
            || (self.integrity == Integrity::NonExtensible && self.items.is_empty())
    }

    /// An empty non-extensible array counts as frozen.
    pub fn is_frozen(&self) -> bool {
        self.integrity == Integrity::Frozen
            || (self.integrity >= Integrity::NonExtensible && self.items.is_empty())
    }

    /// Consume the array, returning its items.
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self {
            items,
            integrity: Integrity::Extensible,
        }
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// Write/enumerate/reconfigure permissions of a property slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyFlags {
    #[serde(default = "default_true")]
    pub writable: bool,
    #[serde(default = "default_true")]
    pub enumerable: bool,
    #[serde(default = "default_true")]
    pub configurable: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }
}

/// A value stored under an object key, together with its flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub value: Value,
    pub flags: PropertyFlags,
}

/// A plain key/value mapping with per-property flags.
#[derive(Clone, Debug, Default)]
pub struct Object {
    props: BTreeMap<String, Property>,
    integrity: Integrity,
}

impl Object {
    /// Create an empty, extensible object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of own properties, enumerable or not.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Whether the object has no own properties at all.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Whether `name` is an own property, enumerable or not.
    pub fn contains_key(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Value of the own property `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name).map(|p| &p.value)
    }

    /// Mutable value of the own property `name`, ignoring its flags.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.props.get_mut(name).map(|p| &mut p.value)
    }

    /// Value and flags of the own property `name`.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.props.get(name)
    }

    /// Own enumerable keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.props
            .iter()
            .filter(|(_, p)| p.flags.enumerable)
            .map(|(k, _)| k.as_str())
    }

    /// Own enumerable entries, in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.props
            .iter()
            .filter(|(_, p)| p.flags.enumerable)
            .map(|(k, p)| (k.as_str(), &p.value))
    }

    /// Every own property, enumerable or not.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> + '_ {
        self.props.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Set a property with default flags, bypassing descriptor validation.
    /// Intended for building fresh values.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.props
            .insert(
                name.into(),
                Property {
                    value: value.into(),
                    flags: PropertyFlags::default(),
                },
            )
            .map(|p| p.value)
    }

    /// Install a property from a descriptor.
    ///
    /// Follows data-property redefinition rules: a non-configurable property
    /// cannot become configurable or change enumerability; once it is also
    /// non-writable it cannot become writable or take a different value.
    /// New keys are rejected on non-extensible objects.
    pub fn define_property(&mut self, name: &str, descriptor: Descriptor) -> Result<(), TypeError> {
        let flags = descriptor.flags();
        let value = descriptor.value;

        let Some(existing) = self.props.get_mut(name) else {
            if self.integrity != Integrity::Extensible {
                return Err(TypeError::NotExtensible(name.to_string()));
            }
            self.props.insert(name.to_string(), Property { value, flags });
            return Ok(());
        };

        if !existing.flags.configurable {
            if flags.configurable || flags.enumerable != existing.flags.enumerable {
                return Err(TypeError::NonConfigurable(name.to_string()));
            }
            if !existing.flags.writable {
                if flags.writable {
                    return Err(TypeError::NonConfigurable(name.to_string()));
                }
                if existing.value != value {
                    return Err(TypeError::ReadOnly(name.to_string()));
                }
            }
        }

        *existing = Property { value, flags };
        Ok(())
    }

    /// Remove a property. Removing an absent key is a no-op returning
    /// `Ok(false)`; non-configurable properties cannot be removed.
    pub fn delete(&mut self, name: &str) -> Result<bool, TypeError> {
        match self.props.get(name) {
            None => Ok(false),
            Some(p) if !p.flags.configurable => Err(TypeError::Undeletable(name.to_string())),
            Some(_) => {
                self.props.remove(name);
                Ok(true)
            }
        }
    }

    /// Current integrity level.
    pub fn integrity(&self) -> Integrity {
        self.integrity
    }

    /// Whether new keys may be added.
    pub fn is_extensible(&self) -> bool {
        self.integrity == Integrity::Extensible
    }

    /// Forbid adding new keys.
    pub fn prevent_extensions(&mut self) {
        self.integrity = self.integrity.max(Integrity::NonExtensible);
    }

    /// Prevent extensions and mark every property non-configurable.
    pub fn seal(&mut self) {
        self.integrity = self.integrity.max(Integrity::Sealed);
        for p in self.props.values_mut() {
            p.flags.configurable = false;
        }
    }

    /// Seal and additionally mark every property read-only.
    pub fn freeze(&mut self) {
        self.integrity = Integrity::Frozen;
        for p in self.props.values_mut() {
            p.flags.configurable = false;
            p.flags.writable = false;
        }
    }

    /// Non-extensible with every property non-configurable.
    pub fn is_sealed(&self) -> bool {
        self.integrity != Integrity::Extensible
            && self.props.values().all(|p| !p.flags.configurable)
    }

    /// Sealed with every property read-only.
    pub fn is_frozen(&self) -> bool {
        self.integrity != Integrity::Extensible
            && self
                .props
                .values()
                .all(|p| !p.flags.configurable && !p.flags.writable)
    }
}

/// Compares own enumerable entries only, matching what `diff` looks at.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.entries().eq(other.entries())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut obj = Object::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

// ---------------------------------------------------------------------------
// Reference variants
// ---------------------------------------------------------------------------

type Callable = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named callable value. Compared by pointer.
#[derive(Clone)]
pub struct FunctionRef {
    name: Arc<str>,
    func: Arc<Callable>,
}

impl FunctionRef {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({})", self.name)
    }
}

/// A host object the diff engine cannot look inside.
///
/// Opaque values are produced by construct-record factories or embedded by
/// callers; comparing one structurally is an error.
#[derive(Clone)]
pub struct Opaque {
    type_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        Self {
            type_name: Arc::from(type_name.into()),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from(items))
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Value::Function(f)
    }
}

impl From<CustomDiff> for Value {
    fn from(c: CustomDiff) -> Self {
        Value::Custom(c)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Value::Opaque(o)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

fn json_number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// JSON rendering: `undefined` becomes `null` in arrays and is dropped from
/// objects, non-finite numbers become `null`, non-enumerable properties are
/// skipped. Reference variants have no representation.
impl TryFrom<&Value> for serde_json::Value {
    type Error = TypeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => json_number(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(a) => serde_json::Value::Array(
                a.iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(o) => {
                let mut map = serde_json::Map::new();
                for (k, v) in o.entries().filter(|(_, v)| !v.is_undefined()) {
                    map.insert(k.to_string(), serde_json::Value::try_from(v)?);
                }
                serde_json::Value::Object(map)
            }
            other => return Err(TypeError::NotSerializable(other.type_name())),
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => json_number(*n).serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(a) => {
                let mut seq = serializer.serialize_seq(Some(a.len()))?;
                for item in a {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(o) => {
                let mut map = serializer.serialize_map(None)?;
                for (k, v) in o.entries().filter(|(_, v)| !v.is_undefined()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            other => Err(S::Error::custom(TypeError::NotSerializable(other.type_name()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(json: serde_json::Value) -> Object {
        match Value::from(json) {
            Value::Object(o) => o,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn classification_priority() {
        assert_eq!(classify(&Value::Undefined), ValueKind::Primitive);
        assert_eq!(classify(&Value::from("s")), ValueKind::Primitive);
        assert_eq!(classify(&Value::empty_array()), ValueKind::Sequence);
        assert_eq!(classify(&Value::empty_object()), ValueKind::Mapping);
        assert_eq!(
            classify(&Value::Custom(CustomDiff::new(|_, _, _| None))),
            ValueKind::Custom
        );
        assert_eq!(
            classify(&Value::Function(FunctionRef::new("f", |_| Value::Null))),
            ValueKind::Function
        );
        assert_eq!(classify(&Value::Opaque(Opaque::new("Date", 0u64))), ValueKind::Other);
    }

    #[test]
    fn identity_vs_structural_equality() {
        let a = Value::from(json!({"x": [1, 2]}));
        let b = Value::from(json!({"x": [1, 2]}));
        assert_eq!(a, b);
        assert!(!a.identical(&b));
        assert!(a.identical(&a));
        assert!(!Value::Number(f64::NAN).identical(&Value::Number(f64::NAN)));
        assert!(Value::Number(0.0).identical(&Value::Number(-0.0)));
    }

    #[test]
    fn functions_compare_by_pointer() {
        let f = FunctionRef::new("f", |_| Value::Null);
        let g = FunctionRef::new("f", |_| Value::Null);
        assert!(Value::Function(f.clone()).identical(&Value::Function(f)));
        assert!(!Value::Function(g.clone()).identical(&Value::Function(FunctionRef::new("g", |_| Value::Null))));
        assert_eq!(g.call(&[]), Value::Null);
    }

    #[test]
    fn keys_are_sorted_and_enumerable_only() {
        let mut o = obj(json!({"b": 1, "a": 2}));
        o.define_property(
            "hidden",
            Descriptor {
                value: Value::Null,
                writable: true,
                enumerable: false,
                configurable: true,
            },
        )
        .unwrap();
        let keys: Vec<_> = o.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(o.len(), 3);
    }

    #[test]
    fn define_on_non_configurable_rejects_reconfigure() {
        let mut o = Object::new();
        o.define_property(
            "id",
            Descriptor {
                value: Value::from(1),
                writable: false,
                enumerable: true,
                configurable: false,
            },
        )
        .unwrap();

        let err = o.define_property("id", Descriptor::new(Value::from(2))).unwrap_err();
        assert_eq!(err, TypeError::NonConfigurable("id".into()));

        let same = Descriptor {
            value: Value::from(1),
            writable: false,
            enumerable: true,
            configurable: false,
        };
        assert!(o.define_property("id", same.clone()).is_ok());

        let changed = Descriptor {
            value: Value::from(5),
            ..same
        };
        assert_eq!(
            o.define_property("id", changed).unwrap_err(),
            TypeError::ReadOnly("id".into())
        );
    }

    #[test]
    fn writable_non_configurable_accepts_new_value() {
        let mut o = Object::new();
        let locked = Descriptor {
            value: Value::from(1),
            writable: true,
            enumerable: true,
            configurable: false,
        };
        o.define_property("n", locked.clone()).unwrap();
        o.define_property(
            "n",
            Descriptor {
                value: Value::from(2),
                ..locked
            },
        )
        .unwrap();
        assert_eq!(o.get("n"), Some(&Value::from(2)));
    }

    #[test]
    fn delete_semantics() {
        let mut o = obj(json!({"a": 1}));
        assert_eq!(o.delete("a"), Ok(true));
        assert_eq!(o.delete("a"), Ok(false));

        let mut sealed = obj(json!({"a": 1}));
        sealed.seal();
        assert_eq!(sealed.delete("a"), Err(TypeError::Undeletable("a".into())));
    }

    #[test]
    fn non_extensible_rejects_new_keys() {
        let mut o = obj(json!({"a": 1}));
        o.prevent_extensions();
        assert!(!o.is_sealed());
        assert!(o.define_property("a", Descriptor::new(Value::from(2))).is_ok());
        assert_eq!(
            o.define_property("b", Descriptor::new(Value::from(2))),
            Err(TypeError::NotExtensible("b".into()))
        );
    }

    #[test]
    fn seal_and_freeze_levels() {
        let mut o = obj(json!({"a": 1}));
        assert!(!o.is_sealed());
        o.seal();
        assert!(o.is_sealed());
        assert!(!o.is_frozen());
        o.freeze();
        assert!(o.is_frozen());

        let mut empty = Object::new();
        empty.prevent_extensions();
        assert!(empty.is_sealed() && empty.is_frozen());

        let mut arr = Array::from(vec![Value::from(1)]);
        arr.freeze();
        assert!(Value::Array(arr).is_immutable());
    }

    #[test]
    fn array_splice_clamps() {
        let mut a: Array = (0..4i32).map(Value::from).collect();
        let removed = a.splice(2, 10, vec![Value::from("x")]).unwrap();
        assert_eq!(removed, vec![Value::from(2), Value::from(3)]);
        assert_eq!(a.len(), 3);

        let removed = a.splice(99, 1, vec![Value::from("end")]).unwrap();
        assert!(removed.is_empty());
        assert_eq!(a.get(3), Some(&Value::from("end")));
        assert_eq!(a.slice(1, 100).len(), 3);
    }

    #[test]
    fn non_extensible_array_cannot_grow() {
        let mut a: Array = (0..3i32).map(Value::from).collect();
        a.prevent_extensions();

        let err = a.splice(3, 0, vec![Value::from(3)]).unwrap_err();
        assert_eq!(err, TypeError::NotExtensible("3".into()));
        assert_eq!(a.len(), 3);

        let err = a.splice(0, 1, vec![Value::from(7), Value::from(8)]).unwrap_err();
        assert!(matches!(err, TypeError::NotExtensible(_)));

        assert_eq!(a.splice(0, 1, vec![Value::from(9)]).unwrap(), vec![Value::from(0)]);
        assert_eq!(a.splice(1, 2, Vec::new()).unwrap().len(), 2);
        assert_eq!(a.as_slice(), &[Value::from(9)]);
    }

    #[test]
    fn equality_ignores_non_enumerable_properties() {
        let mut hidden = obj(json!({"a": 1}));
        hidden
            .define_property(
                "secret",
                Descriptor::with_flags(
                    2,
                    PropertyFlags {
                        enumerable: false,
                        ..PropertyFlags::default()
                    },
                ),
            )
            .unwrap();
        assert_eq!(hidden, obj(json!({"a": 1})));
        assert_ne!(hidden, obj(json!({"a": 1, "secret": 2})));
    }

    #[test]
    fn json_roundtrip() {
        let source = json!({"a": [1, 2.5, "x", null, true], "b": {"c": {}}});
        let value = Value::from(source.clone());
        let back = serde_json::Value::try_from(&value).unwrap();
        assert_eq!(back, source);
        assert_eq!(serde_json::to_value(&value).unwrap(), source);
    }

    #[test]
    fn undefined_and_references_in_json() {
        let mut o = Object::new();
        o.insert("gone", Value::Undefined);
        o.insert("kept", Value::from(1));
        let json = serde_json::Value::try_from(&Value::Object(o)).unwrap();
        assert_eq!(json, json!({"kept": 1}));

        let f = Value::Function(FunctionRef::new("f", |_| Value::Null));
        assert_eq!(
            serde_json::Value::try_from(&f),
            Err(TypeError::NotSerializable("function"))
        );
        assert!(serde_json::to_string(&f).is_err());
    }

    #[test]
    fn opaque_downcast() {
        let o = Opaque::new("Timestamp", 42u64);
        assert_eq!(o.type_name(), "Timestamp");
        assert_eq!(o.downcast_ref::<u64>(), Some(&42));
        assert!(o.downcast_ref::<String>().is_none());
    }
}
