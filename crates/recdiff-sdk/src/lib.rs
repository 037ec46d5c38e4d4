//! High-level SDK for recdiff.
//!
//! Bundles diff options and a patcher into a [`Reconciler`] and re-exports
//! the public surface of the lower crates, so applications only need to
//! depend on this one.

pub mod error;
pub mod reconciler;

pub use error::{SdkError, SdkResult};
pub use reconciler::Reconciler;

// Re-export key types
pub use recdiff_diff::{
    diff, get_comparable_objects, ComparableObjects, DiffConfig, DiffError, DiffOptions,
    DiffResult, IgnorePredicate, IgnoreRule, PropertyPattern,
};
pub use recdiff_patch::{patch, Factory, FactoryRegistry, PatchError, PatchResult, Patcher};
pub use recdiff_types::{
    create_construct_record, Array, ConstructRecord, CustomDiff, Descriptor, FunctionRef,
    Integrity, Object, Opaque, Property, PropertyFlags, PropertyKey, Record, SpliceRecord,
    SpliceValue, TypeError, Value, ValueKind,
};
