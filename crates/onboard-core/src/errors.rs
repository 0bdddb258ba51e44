//! Errores del core.
//!
//! Taxonomía:
//! - `StorageError`: fallos del almacenamiento de drafts. Se recuperan en
//!   `DraftStore` (no-op + `warn!`), nunca llegan al usuario.
//! - `PathError`: path mal formado o tipo incompatible. Recuperable.
//! - `FlowError`: definición de flow inválida (se detecta al construirla).
//! - `SubmitError`: respuesta del colaborador de submission.
//! - `WizardError`: lo que devuelve el controller.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::flow::FlowId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("malformed path '{0}': empty segment")]
    EmptySegment(String),
    #[error("type mismatch at '{path}': cannot descend into {found}")]
    TypeMismatch { path: String, found: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("invalid flow id component '{0}'")]
    InvalidId(String),
    #[error("flow {0} declares no steps")]
    NoSteps(FlowId),
    #[error("flow {flow} declares step '{key}' twice")]
    DuplicateStep { flow: FlowId, key: String },
    #[error("flow {0} template must be an object")]
    TemplateNotObject(FlowId),
    #[error("flow {flow} template has no root entry for step '{key}'")]
    MissingStepRoot { flow: FlowId, key: String },
    #[error("flow {flow} has more than one sync rule writing '{target}'")]
    DuplicateSyncTarget { flow: FlowId, target: String },
    #[error("flow {0} is already registered")]
    AlreadyRegistered(FlowId),
    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    /// Errores por campo (path → mensaje) devueltos por el backend.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(BTreeMap<String, String>),
    /// Error de red/servidor sin errores por campo.
    #[error("submission failed: {0}")]
    Failure(String),
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("no flow registered for region '{region}' and applicant type '{applicant_type}'")]
    FlowNotFound { region: String, applicant_type: String },
    #[error("'{operation}' is not allowed while {state}")]
    InvalidState { operation: &'static str, state: &'static str },
    #[error("edit bundle belongs to flow {found}, expected {expected}")]
    FlowMismatch { expected: FlowId, found: FlowId },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_counts_fields() {
        let mut map = BTreeMap::new();
        map.insert("kyc.pep".to_string(), "required".to_string());
        assert_eq!(SubmitError::Validation(map).to_string(), "validation failed for 1 field(s)");
    }

    #[test]
    fn flow_not_found_names_both_params() {
        let err = WizardError::FlowNotFound { region: "mars".into(),
                                              applicant_type: "individual".into() };
        assert_eq!(err.to_string(),
                   "no flow registered for region 'mars' and applicant type 'individual'");
    }
}
