//! Adjuntos: selección por campo, nombres y empaquetado multipart.

mod file;
mod manager;

pub use file::{FileHandle, PackagedFile, StoredFile};
pub use manager::{Attachment, AttachmentChange, AttachmentContent, AttachmentManager, AttachmentPolicy};
