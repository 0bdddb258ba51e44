//! onboard-adapters: colaboradores externos del wizard.
//!
//! - `http`: `HttpSubmissionClient`, implementación de `SubmissionApi`.
//! - `payload`: respuestas de validación del backend → path → mensaje.
pub mod config;
pub mod error;
pub mod http;
pub mod payload;

pub use config::ClientConfig;
pub use error::AdapterError;
pub use http::HttpSubmissionClient;
pub use payload::{classify_failure, decode_validation_payload};
