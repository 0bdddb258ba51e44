//! Configuración del almacenamiento de drafts desde variables de entorno.
//! `ONBOARD_DRAFT_DIR` y `ONBOARD_NAMESPACE`, ambas opcionales.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use onboard_core::constants::DEFAULT_NAMESPACE;

pub const DEFAULT_DRAFT_DIR: &str = ".onboard/drafts";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftConfig {
    pub dir: PathBuf,
    pub namespace: String,
}

impl DraftConfig {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self { dir: dir.into(),
               namespace: namespace.into() }
    }

    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let dir = env::var("ONBOARD_DRAFT_DIR").ok()
                                               .filter(|v| !v.trim().is_empty())
                                               .unwrap_or_else(|| DEFAULT_DRAFT_DIR.to_string());
        let namespace = env::var("ONBOARD_NAMESPACE").ok()
                                                     .filter(|v| !v.trim().is_empty())
                                                     .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        Self::new(dir, namespace)
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DRAFT_DIR, DEFAULT_NAMESPACE)
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_dir_and_namespace() {
        let config = DraftConfig::default();
        assert_eq!(config.dir, PathBuf::from(DEFAULT_DRAFT_DIR));
        assert_eq!(config.namespace, "onboard");
        assert_eq!(DraftConfig::new("/tmp/x", "acme").namespace, "acme");
    }
}
