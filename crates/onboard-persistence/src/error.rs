//! Errores de persistencia.
//! `DraftStore` sólo entiende `StorageError`; la conversión conserva el
//! `io::Error` original.

use onboard_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("invalid draft key '{0}'")]
    InvalidKey(String),
    #[error("invalid draft namespace '{0}': only [A-Za-z0-9_-] allowed")]
    InvalidNamespace(String),
    #[error("draft io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PersistenceError> for StorageError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Io(e) => StorageError::Io(e),
            other => StorageError::Unavailable(other.to_string()),
        }
    }
}
