//! Almacenamiento clave → texto para drafts.
//!
//! Es la capa falible; `DraftStore` la envuelve y la vuelve "fail soft".
use std::collections::HashMap;

use crate::errors::StorageError;

/// Almacenamiento local durable (localStorage, ficheros, ...).
pub trait DraftStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Implementación en memoria. Permite inyectar fallos de lectura/escritura
/// y contenido corrupto para ejercitar la degradación.
#[derive(Debug, Default)]
pub struct InMemoryDraftStorage {
    pub inner: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escribe texto arbitrario sin pasar por el store (p.ej. JSON roto).
    pub fn put_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Simula cuota agotada en `write`/`remove`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl DraftStorage for InMemoryDraftStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("read disabled".into()));
        }
        Ok(self.inner.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.remove(key);
        Ok(())
    }
}
