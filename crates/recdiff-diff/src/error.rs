//! Error types for the diff crate.

use recdiff_types::ValueKind;

/// Errors that can occur during diff operations.
///
/// Every variant aborts the whole diff; no partial record list is returned.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The top-level arguments were not both arrays or plain objects.
    #[error("arguments are not plain objects or arrays: got {a} and {b}")]
    InvalidInput {
        a: &'static str,
        b: &'static str,
    },

    /// A property value could not be compared structurally.
    #[error("value of property \"{name}\" is not a primitive, plain object, or array (found {found})")]
    UnsupportedProperty { name: String, found: ValueKind },

    /// An array element could not be compared structurally.
    #[error("value of array element {index} is not a primitive, plain object, or array (found {found})")]
    UnsupportedElement { index: usize, found: ValueKind },

    /// An ignore pattern in the configuration is not a valid regex.
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
