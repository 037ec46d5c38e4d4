//! Error types for the patch crate.

use recdiff_types::TypeError;

/// Errors that can occur while applying records.
///
/// Records applied before the failing one stay applied; there is no
/// rollback.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The target is not an array or a plain object.
    #[error("a patch target must be an array or a plain object, got {0}")]
    InvalidTarget(&'static str),

    /// The target is sealed or frozen.
    #[error("cannot patch sealed or frozen objects")]
    ImmutableTarget,

    /// A construct record names a factory that is not registered.
    #[error("no factory registered for {0:?}")]
    UnknownFactory(String),

    /// A construct record reached the patcher without a property name.
    #[error("construct record for factory {0:?} has no name")]
    UnnamedConstruct(String),

    /// A factory built a value that cannot take property records.
    #[error("factory {factory:?} built a {found}, which cannot take property records")]
    ConstructTarget {
        factory: String,
        found: &'static str,
    },

    /// Installing or deleting a property failed.
    #[error("install failed: {0}")]
    Install(#[from] TypeError),
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
