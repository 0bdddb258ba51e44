//! onboard-persistence
//!
//! Almacenamiento durable de drafts fuera del navegador: un directorio de
//! ficheros JSON detrás del trait `DraftStorage` del core.
//!
//! Módulos:
//! - `file`: `FileDraftStorage`.
//! - `config`: carga de configuración desde .env.
//! - `error`: `PersistenceError` y su conversión a `StorageError`.

pub mod config;
pub mod error;
pub mod file;

pub use config::{init_dotenv, DraftConfig};
pub use error::PersistenceError;
pub use file::FileDraftStorage;

use onboard_core::DraftStore;

/// DraftStore listo para usar a partir de la configuración. El namespace
/// forma parte de cada clave, así que se valida aquí y no en cada escritura.
pub fn open_draft_store(config: &DraftConfig) -> Result<DraftStore<FileDraftStorage>, PersistenceError> {
    if !file::is_valid_segment(&config.namespace) {
        return Err(PersistenceError::InvalidNamespace(config.namespace.clone()));
    }
    let storage = FileDraftStorage::open(&config.dir)?;
    Ok(DraftStore::with_namespace(storage, config.namespace.clone()))
}
