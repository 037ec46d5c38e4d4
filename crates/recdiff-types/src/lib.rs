//! Foundation types for recdiff.
//!
//! This crate provides the plain-data value model and the edit records the
//! diff and patch crates exchange. Every other recdiff crate depends on
//! `recdiff-types`.
//!
//! # Key Types
//!
//! - [`Value`]: Primitive, array, object, or reference value
//! - [`Object`] / [`Array`]: Containers with property flags and integrity levels
//! - [`Record`]: One edit operation (add, update, delete, splice, construct)
//! - [`Descriptor`]: A value plus the flags it is installed with
//! - [`CustomDiff`]: Value wrapper that supplies its own comparison

pub mod custom;
pub mod error;
pub mod record;
pub mod value;

pub use custom::CustomDiff;
pub use error::TypeError;
pub use record::{
    create_construct_record, ConstructRecord, Descriptor, PropertyKey, Record, SpliceRecord,
    SpliceValue,
};
pub use value::{
    classify, Array, FunctionRef, Integrity, Object, Opaque, Property, PropertyFlags, Value,
    ValueKind,
};
