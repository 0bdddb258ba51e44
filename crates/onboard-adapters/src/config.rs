//! Configuración del cliente HTTP desde variables de entorno.

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::AdapterError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base sin barra final, p.ej. `https://broker.example/api`.
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(),
               token: None,
               timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `ONBOARD_API_URL` es obligatoria; `ONBOARD_API_TOKEN` y
    /// `ONBOARD_API_TIMEOUT_SECS` no.
    pub fn from_env() -> Result<Self, AdapterError> {
        Lazy::force(&DOTENV_LOADED);
        let base_url = env::var("ONBOARD_API_URL").map_err(|_| AdapterError::Config("ONBOARD_API_URL not set".into()))?;
        let mut config = Self::new(base_url);
        if let Some(token) = env::var("ONBOARD_API_TOKEN").ok().filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(secs) = env::var("ONBOARD_API_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
