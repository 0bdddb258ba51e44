//! Ficheros seleccionados por el usuario y su forma empaquetada.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Fichero local elegido en el picker. Los bytes se comparten (`Arc`) entre
/// el manager y el paquete de subida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    bytes: Arc<[u8]>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self { name: name.into(),
               bytes: Arc::from(bytes) }
    }

    /// Nombre original que dio el sistema operativo.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Extensión original con punto (`".png"`), si la hay.
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.name)
    }

    /// Tipo MIME inferido por firma de bytes.
    pub fn content_type(&self) -> &'static str {
        infer::get(&self.bytes).map(|t| t.mime_type()).unwrap_or(FALLBACK_CONTENT_TYPE)
    }

    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }
}

/// Extensión con punto de un nombre de fichero. Un nombre que empieza por
/// punto (`.env`) no tiene extensión.
pub(crate) fn extension_of(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(&name[dot..])
}

/// Fichero ya subido en una sesión anterior (modo edición). Visible para el
/// usuario pero nunca se vuelve a subir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub filename: String,
    pub location: String,
}

/// Entrada lista para multipart: `(fieldName, bytes, filename)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedFile {
    pub field_name: String,
    pub filename: String,
    pub content_type: String,
    pub sha256: String,
    pub bytes: Arc<[u8]>,
}
