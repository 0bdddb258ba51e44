//! `DraftStorage` sobre el sistema de ficheros: un fichero JSON por clave.
//!
//! `onboard:draft:local:individual` se guarda como
//! `<dir>/onboard.draft.local.individual.json`. Sólo se aceptan segmentos
//! `[A-Za-z0-9_-]`, así que la correspondencia es reversible y ninguna clave
//! puede salir del directorio.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use onboard_core::{DraftStorage, StorageError};

use crate::PersistenceError;

const EXTENSION: &str = "json";

/// Segmento de clave admitido: no vacío y sólo `[A-Za-z0-9_-]`.
pub fn is_valid_segment(seg: &str) -> bool {
    !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Clone)]
pub struct FileDraftStorage {
    dir: PathBuf,
}

impl FileDraftStorage {
    /// Crea el directorio si no existe.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty() && key.split(':').all(is_valid_segment);
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{EXTENSION}", key.replace(':', "."))))
    }

    /// Claves con draft guardado, ordenadas.
    pub fn list_keys(&self) -> Result<Vec<String>, PersistenceError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.replace('.', ":"));
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn read_file(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Escritura atómica: fichero temporal + rename.
    fn write_file(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let target = self.path_for(key)?;
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        debug!("draft file {} written", target.display());
        Ok(())
    }

    fn remove_file(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl DraftStorage for FileDraftStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_file(key)?)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.write_file(key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Ok(self.remove_file(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_keys_that_could_escape_the_dir() {
        let storage = FileDraftStorage { dir: PathBuf::from("drafts") };
        for key in ["", "../etc:passwd", "a::b", "a/b:c", "a.b"] {
            assert!(storage.path_for(key).is_err(), "key {key:?}");
        }
        assert_eq!(storage.path_for("onboard:draft:local:individual").unwrap(),
                   PathBuf::from("drafts").join("onboard.draft.local.individual.json"));
    }
}
