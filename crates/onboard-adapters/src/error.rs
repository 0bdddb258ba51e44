use onboard_core::SubmitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("configuration: {0}")]
    Config(String),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

// Todo lo que no sea un 400/422 con errores por campo llega al controller
// como fallo genérico.
impl From<AdapterError> for SubmitError {
    fn from(err: AdapterError) -> Self {
        SubmitError::Failure(err.to_string())
    }
}
