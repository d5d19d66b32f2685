use thiserror::Error;

/// Portal-level error type.
///
/// Every variant is recoverable at the UI boundary: the caller shows a
/// message and keeps its prior state. Persisted-storage corruption is not
/// represented here because load paths degrade to defaults instead of
/// failing (see `resume::ResumeStore::load` and `store::FileStore::open`).
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Import format error: {0}")]
    ImportFormat(String),

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown field '{field}' for section '{section}'")]
    UnknownField { section: String, field: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
