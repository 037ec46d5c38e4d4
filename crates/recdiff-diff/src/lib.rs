//! Diff engine for recdiff.
//!
//! Computes the ordered edit records that turn one plain object or array
//! into another. The engine is pure: it never mutates its inputs, and any
//! unsupported value aborts the whole diff.
//!
//! # Key Types
//!
//! - [`diff`] -- Compare two values and return the record list
//! - [`DiffOptions`] / [`IgnoreRule`] -- Function handling and ignore rules
//! - [`DiffConfig`] -- Serializable mirror of the options (TOML / JSON)
//! - [`get_comparable_objects`] -- The ignore-rule filter, usable on its own

mod array_diff;
pub mod comparable;
pub mod compare;
pub mod config;
pub mod error;
mod object_diff;
pub mod options;

pub use comparable::{get_comparable_objects, ComparableObjects};
pub use compare::diff;
pub use config::DiffConfig;
pub use error::{DiffError, DiffResult};
pub use options::{DiffOptions, IgnorePredicate, IgnoreRule, PropertyPattern};
pub use recdiff_types::{create_construct_record, CustomDiff};
