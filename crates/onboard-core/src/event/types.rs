//! Eventos observables del controller.
//!
//! Log append-only de transiciones, con el mismo espíritu que un event
//! store: permite inspeccionar qué pasó en una sesión (orden de hidratación,
//! escrituras del auto-sync, resultado del submit) sin exponer el estado
//! mutable del controller.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origen del documento con el que arrancó la sesión.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HydrationSource {
    Remote { id: String },
    Draft,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEventKind {
    /// Primer evento de toda sesión.
    Hydrated { source: HydrationSource, definition_hash: String },
    FieldUpdated { path: String },
    /// Escritura hecha por una regla, no por el usuario.
    AutoSynced { rule: String, target: String },
    StepChanged { from: usize, to: usize },
    ErrorsReplaced { count: usize },
    AttachmentChanged { field: String, revision: u64, cleared: bool },
    DraftSaved { fingerprint: String },
    DraftCleared,
    SubmitStarted,
    Submitted { id: String },
    SubmitFailed { field_errors: usize, message: Option<String> },
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardEvent {
    pub seq: u64,
    pub kind: WizardEventKind,
    pub ts: DateTime<Utc>, // metadato
}
