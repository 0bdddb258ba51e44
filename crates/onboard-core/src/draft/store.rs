//! DraftStore: persistencia local del documento de un flow.
//!
//! Contrato "fail soft":
//! - `load` devuelve `None` si la lectura falla o el contenido no es un
//!   documento JSON válido; un draft corrupto nunca impide empezar de cero.
//! - `save` y `clear` son best-effort: los errores se registran y se
//!   descartan (perder el draft por cuota llena es una degradación aceptada).
//!
//! Layout: `"<namespace>:draft:<region>:<applicantType>"` → documento JSON.
//! Los adjuntos nunca se persisten aquí.
use log::{debug, warn};

use super::DraftStorage;
use crate::constants::DEFAULT_NAMESPACE;
use crate::document::Node;
use crate::flow::FlowId;

#[derive(Debug)]
pub struct DraftStore<S: DraftStorage> {
    storage: S,
    namespace: String,
}

impl<S: DraftStorage> DraftStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        Self { storage,
               namespace: namespace.into() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key_for(&self, flow: &FlowId) -> String {
        format!("{}:draft:{}:{}", self.namespace, flow.region(), flow.applicant_type())
    }

    pub fn load(&self, flow: &FlowId) -> Option<Node> {
        let key = self.key_for(flow);
        let raw = match self.storage.read(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("draft read failed for {key}: {e}");
                return None;
            }
        };
        match serde_json::from_str::<Node>(&raw) {
            Ok(doc @ Node::Object(_)) => Some(doc),
            Ok(other) => {
                warn!("draft {key} is not a document (found {}), ignoring", other.kind_name());
                None
            }
            Err(e) => {
                warn!("draft {key} is not valid JSON, ignoring: {e}");
                None
            }
        }
    }

    pub fn save(&mut self, flow: &FlowId, doc: &Node) {
        let key = self.key_for(flow);
        let raw = match serde_json::to_string(doc) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("draft {key} could not be serialized: {e}");
                return;
            }
        };
        match self.storage.write(&key, &raw) {
            Ok(()) => debug!("draft {key} saved ({} bytes)", raw.len()),
            Err(e) => warn!("draft write failed for {key}: {e}"),
        }
    }

    pub fn clear(&mut self, flow: &FlowId) {
        let key = self.key_for(flow);
        if let Err(e) = self.storage.remove(&key) {
            warn!("draft clear failed for {key}: {e}");
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
