//! Patch engine for recdiff.
//!
//! Applies the records produced by `recdiff-diff` (or built by hand) to an
//! array or plain object in place. Construct records are instantiated through
//! a [`FactoryRegistry`] of named factories.

pub mod error;
pub mod patch;
pub mod registry;

pub use error::{PatchError, PatchResult};
pub use patch::{patch, Patcher};
pub use registry::{Factory, FactoryRegistry};
