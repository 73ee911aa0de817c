use thiserror::Error;

use models::errors::ModelError;

/// Caller-facing error taxonomy for the registration workflows.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("invalid {field}: {value:?}")]
    InvalidFormat { field: &'static str, value: String },
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no payment screenshot supplied")]
    MissingArtifact,
    #[error("unsupported artifact type: {0}")]
    UnsupportedArtifactType(String),
    #[error("artifact too large: {size} bytes (limit {limit})")]
    ArtifactTooLarge { size: usize, limit: usize },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Conflict(email) => ServiceError::DuplicateEmail(email),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}
