//! Contrato con el backend de solicitudes.
//!
//! El core sólo conoce este trait; la implementación HTTP vive en
//! `onboard-adapters`. La única operación que se espera (`await`) en todo el
//! engine es la llamada a este colaborador.
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::{PackagedFile, StoredFile};
use crate::document::Node;
use crate::errors::SubmitError;

/// Respuesta a un alta: identificador y credenciales para editar después.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub id: String,
    pub edit_token: String,
    pub edit_until: DateTime<Utc>,
}

/// Solicitud existente, tal como la devuelve el backend para editarla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBundle {
    pub region: String,
    pub applicant_type: String,
    pub document: Node,
    #[serde(default)]
    pub attachments: BTreeMap<String, StoredFile>,
}

#[async_trait]
pub trait SubmissionApi: Send + Sync {
    async fn submit(&self, document: &Node, files: &[PackagedFile]) -> Result<SubmitReceipt, SubmitError>;

    async fn update(&self, id: &str, document: &Node, files: &[PackagedFile]) -> Result<(), SubmitError>;

    async fn fetch_for_edit(&self, id: &str) -> Result<EditBundle, SubmitError>;
}

/// Colaborador sin backend: toda llamada falla sin errores por campo. Útil
/// para sesiones que sólo editan drafts (CLI).
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSubmissionApi;

const OFFLINE: &str = "no submission backend configured";

#[async_trait]
impl SubmissionApi for OfflineSubmissionApi {
    async fn submit(&self, _document: &Node, _files: &[PackagedFile]) -> Result<SubmitReceipt, SubmitError> {
        Err(SubmitError::Failure(OFFLINE.to_string()))
    }

    async fn update(&self, _id: &str, _document: &Node, _files: &[PackagedFile]) -> Result<(), SubmitError> {
        Err(SubmitError::Failure(OFFLINE.to_string()))
    }

    async fn fetch_for_edit(&self, _id: &str) -> Result<EditBundle, SubmitError> {
        Err(SubmitError::Failure(OFFLINE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn receipt_uses_camel_case() {
        let receipt: SubmitReceipt = serde_json::from_value(json!({
            "id": "app-1",
            "editToken": "tok",
            "editUntil": "2026-01-01T00:00:00Z"
        })).unwrap();
        assert_eq!(receipt.edit_token, "tok");
    }

    #[test]
    fn offline_api_always_fails() {
        let api = OfflineSubmissionApi;
        let err = tokio_test::block_on(api.submit(&Node::object(), &[])).unwrap_err();
        assert!(matches!(err, SubmitError::Failure(_)));
    }
}
