use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("diff error: {0}")]
    Diff(#[from] recdiff_diff::DiffError),

    #[error("patch error: {0}")]
    Patch(#[from] recdiff_patch::PatchError),
}

pub type SdkResult<T> = Result<T, SdkError>;
