//! Estados del wizard y parámetros de ruta.
use serde::{Deserialize, Serialize};

/// Estado observable del controller.
///
/// `Editing` y `Failed` llevan el step actual: un submit fallido deja al
/// usuario donde estaba, con el documento intacto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardState {
    Loading,
    Editing { step: usize },
    Submitting,
    Done,
    Failed { step: usize },
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::Loading => "loading",
            WizardState::Editing { .. } => "editing",
            WizardState::Submitting => "submitting",
            WizardState::Done => "done",
            WizardState::Failed { .. } => "failed",
        }
    }

    /// `true` si el documento admite ediciones.
    pub fn is_editable(&self) -> bool {
        matches!(self, WizardState::Editing { .. } | WizardState::Failed { .. })
    }
}

/// Fase interna, sin el cursor de step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Loading,
    Editing,
    Submitting,
    Done,
    Failed,
}

impl Phase {
    pub(crate) fn with_cursor(self, step: usize) -> WizardState {
        match self {
            Phase::Loading => WizardState::Loading,
            Phase::Editing => WizardState::Editing { step },
            Phase::Submitting => WizardState::Submitting,
            Phase::Done => WizardState::Done,
            Phase::Failed => WizardState::Failed { step },
        }
    }
}

/// Lo que aporta el router: los dos parámetros de ruta y el `editId`
/// opcional de la query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    pub region: String,
    pub applicant_type: String,
    #[serde(default)]
    pub edit_id: Option<String>,
}

impl RouteParams {
    pub fn new(region: impl Into<String>, applicant_type: impl Into<String>) -> Self {
        Self { region: region.into(),
               applicant_type: applicant_type.into(),
               edit_id: None }
    }

    pub fn editing(mut self, id: impl Into<String>) -> Self {
        self.edit_id = Some(id.into());
        self
    }
}
