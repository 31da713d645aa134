use thiserror::Error;

/// Store failures that collaborators need to tell apart. Everything else
/// travels as a plain `anyhow` chain with context attached at the seam.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("failed to open storage engine: {0}")]
    StorageUnavailable(String),

    #[error("malformed import document: {0}")]
    MalformedImport(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
