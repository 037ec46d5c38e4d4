use thiserror::Error;

/// Errors produced while installing or removing properties on a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("cannot redefine non-configurable property \"{0}\"")]
    NonConfigurable(String),

    #[error("cannot assign to read-only property \"{0}\"")]
    ReadOnly(String),

    #[error("cannot add property \"{0}\", object is not extensible")]
    NotExtensible(String),

    #[error("cannot delete non-configurable property \"{0}\"")]
    Undeletable(String),

    #[error("value of kind {0} has no JSON representation")]
    NotSerializable(&'static str),
}
