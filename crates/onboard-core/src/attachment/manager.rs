//! AttachmentManager: ficheros por campo, políticas de nombre y empaquetado.
//!
//! Los adjuntos no forman parte del documento ni del draft: se pierden al
//! recargar. En el submit se aplanan a una lista `(fieldName, bytes,
//! filename)` ordenada por campo.
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file::extension_of;
use super::{FileHandle, PackagedFile, StoredFile};

/// Política de nombres de un campo de adjunto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPolicy {
    /// Mostrar un token opaco en lugar del nombre real.
    pub random_display: bool,
    /// Nombre con el que se sube (se le añade la extensión original).
    pub server_filename: Option<String>,
}

impl AttachmentPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn random_display(mut self) -> Self {
        self.random_display = true;
        self
    }

    pub fn server_filename(mut self, name: impl Into<String>) -> Self {
        self.server_filename = Some(name.into());
        self
    }

    /// Nombre de subida: `override + extensión original`, o el nombre del
    /// usuario si no hay override.
    pub fn upload_name(&self, original: &str) -> String {
        upload_name(self.server_filename.as_deref(), original)
    }

    fn display_name(&self, original: &str) -> String {
        if self.random_display {
            format!("{}{}", Uuid::new_v4().simple(), extension_of(original).unwrap_or(""))
        } else {
            original.to_string()
        }
    }
}

fn upload_name(server_filename: Option<&str>, original: &str) -> String {
    match server_filename {
        Some(base) => format!("{}{}", base, extension_of(original).unwrap_or("")),
        None => original.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    Local(FileHandle),
    Stored(StoredFile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub field_name: String,
    pub content: AttachmentContent,
    pub display_name: String,
    pub server_filename: Option<String>,
    pub revision: u64,
}

impl Attachment {
    pub fn file(&self) -> Option<&FileHandle> {
        match &self.content {
            AttachmentContent::Local(f) => Some(f),
            AttachmentContent::Stored(_) => None,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self.content, AttachmentContent::Stored(_))
    }
}

/// Evento de cambio. Cada selección produce una revisión nueva, aunque el
/// fichero sea idéntico byte a byte al anterior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentChange {
    pub field_name: String,
    pub revision: u64,
    pub cleared: bool,
}

#[derive(Debug, Default)]
pub struct AttachmentManager {
    policies: BTreeMap<String, AttachmentPolicy>,
    entries: BTreeMap<String, Attachment>,
    revision: u64,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policies(policies: BTreeMap<String, AttachmentPolicy>) -> Self {
        Self { policies,
               ..Self::default() }
    }

    pub fn configure(&mut self, field: impl Into<String>, policy: AttachmentPolicy) {
        self.policies.insert(field.into(), policy);
    }

    pub fn policy(&self, field: &str) -> Option<&AttachmentPolicy> {
        self.policies.get(field)
    }

    /// Selecciona (o quita, con `None`) el fichero de un campo.
    pub fn set(&mut self, field: &str, file: Option<FileHandle>) -> AttachmentChange {
        self.revision += 1;
        let revision = self.revision;
        let cleared = file.is_none();
        match file {
            Some(file) => {
                let policy = self.policies.get(field).cloned().unwrap_or_default();
                let attachment = Attachment { field_name: field.to_string(),
                                              display_name: policy.display_name(file.name()),
                                              server_filename: policy.server_filename.clone(),
                                              content: AttachmentContent::Local(file),
                                              revision };
                debug!("attachment {field} selected (rev {revision})");
                self.entries.insert(field.to_string(), attachment);
            }
            None => {
                self.entries.remove(field);
            }
        }
        AttachmentChange { field_name: field.to_string(),
                           revision,
                           cleared }
    }

    /// Registra un fichero ya subido (hidratación en modo edición).
    pub fn load_stored(&mut self, field: &str, stored: StoredFile) {
        self.revision += 1;
        let attachment = Attachment { field_name: field.to_string(),
                                      display_name: stored.filename.clone(),
                                      server_filename: None,
                                      content: AttachmentContent::Stored(stored),
                                      revision: self.revision };
        self.entries.insert(field.to_string(), attachment);
    }

    pub fn get(&self, field: &str) -> Option<&Attachment> {
        self.entries.get(field)
    }

    pub fn display_name(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(|a| a.display_name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Lista plana para el submit. Sólo se incluyen ficheros locales.
    pub fn package_all(&self) -> Vec<PackagedFile> {
        self.entries
            .values()
            .filter_map(|a| {
                let file = a.file()?;
                Some(PackagedFile { field_name: a.field_name.clone(),
                                    filename: upload_name(a.server_filename.as_deref(), file.name()),
                                    content_type: file.content_type().to_string(),
                                    sha256: file.sha256(),
                                    bytes: file.shared_bytes() })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_keeps_original_extension() {
        let policy = AttachmentPolicy::new().server_filename("Signature of Principal Applicant");
        assert_eq!(policy.upload_name("IMG_0042.png"), "Signature of Principal Applicant.png");
        assert_eq!(policy.upload_name("scan"), "Signature of Principal Applicant");
        assert_eq!(AttachmentPolicy::new().upload_name("IMG_0042.png"), "IMG_0042.png");
    }

    #[test]
    fn packaged_name_matches_policy_upload_name() {
        let policy = AttachmentPolicy::new().server_filename("Proof of Address");
        let mut manager = AttachmentManager::new();
        manager.configure("proof", policy.clone());
        manager.set("proof", Some(FileHandle::new("bill.March.pdf", b"%PDF".to_vec())));
        manager.set("plain", Some(FileHandle::new("notes.txt", b"n".to_vec())));
        let names: Vec<_> = manager.package_all().into_iter().map(|f| f.filename).collect();
        assert_eq!(names, vec!["notes.txt".to_string(), policy.upload_name("bill.March.pdf")]);
        assert_eq!(names[1], "Proof of Address.pdf");
    }

    #[test]
    fn clearing_removes_entry() {
        let mut manager = AttachmentManager::new();
        manager.set("nic", Some(FileHandle::new("nic.jpg", b"abc".to_vec())));
        let change = manager.set("nic", None);
        assert!(change.cleared);
        assert!(manager.get("nic").is_none());
        assert!(manager.package_all().is_empty());
    }
}
