//! WizardController: máquina de estados de una sesión de onboarding.
//!
//! Es el único dueño del documento durante la sesión. Todo cambio pasa por
//! `update`, que escribe vía PathAccessor, deja que el AutoSyncEngine
//! converja y persiste el resultado final en el DraftStore. Cambiar de flow
//! implica crear un controller nuevo; no hay API para mutar el flow de uno
//! vivo.
//!
//! Transiciones:
//! ```text
//! Loading --hydrate--> Editing(0)
//! Editing/Failed --update/set_attachment--> Editing
//! Editing/Failed --submit--> Submitting --ok--> Done
//!                                       --err--> Failed
//! ```
use std::collections::BTreeMap;

use log::{debug, info, warn};

use super::state::{Phase, RouteParams, WizardState};
use crate::attachment::{AttachmentChange, AttachmentManager, FileHandle};
use crate::constants::MAX_SYNC_PASSES;
use crate::document::{get, set_in, Node, Path};
use crate::draft::{DraftStorage, DraftStore};
use crate::errors::{SubmitError, WizardError};
use crate::event::{EventLog, HydrationSource, WizardEventKind};
use crate::flow::{Flow, FlowId, FlowRegistry, StepDef};
use crate::hashing::hash_node;
use crate::submit::{EditBundle, SubmissionApi, SubmitReceipt};
use crate::sync::{AutoSyncEngine, SyncWrite};
use crate::validation::{ErrorIndex, Validator};

/// Mensaje para un rechazo de validación que no señala ningún campo.
const EMPTY_VALIDATION: &str = "submission rejected without field errors";

/// Resultado de un `update`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateOutcome {
    /// Escrituras del auto-sync provocadas por el cambio, en orden.
    pub synced: Vec<SyncWrite>,
    /// `true` si el draft se reescribió.
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(SubmitReceipt),
    Updated { id: String },
}

pub struct WizardController<S: DraftStorage, A: SubmissionApi> {
    flow: Flow,
    drafts: DraftStore<S>,
    api: A,
    edit_id: Option<String>,
    document: Node,
    cursor: usize,
    phase: Phase,
    errors: ErrorIndex,
    failure_message: Option<String>,
    sync: AutoSyncEngine,
    attachments: AttachmentManager,
    events: EventLog,
    last_saved: Option<String>,
    receipt: Option<SubmitReceipt>,
}

impl<S: DraftStorage, A: SubmissionApi> WizardController<S, A> {
    /// Controller en `Loading` para un flow ya resuelto. El documento es el
    /// template hasta que se llame a `hydrate`.
    pub fn new(flow: Flow, drafts: DraftStore<S>, api: A, edit_id: Option<String>) -> Self {
        let sync = AutoSyncEngine::new(flow.sync_rules().to_vec());
        let attachments = AttachmentManager::with_policies(flow.attachment_policies().clone());
        let document = flow.instantiate();
        Self { flow,
               drafts,
               api,
               edit_id,
               document,
               cursor: 0,
               phase: Phase::Loading,
               errors: ErrorIndex::new(),
               failure_message: None,
               sync,
               attachments,
               events: EventLog::new(),
               last_saved: None,
               receipt: None }
    }

    /// Resuelve el flow a partir de la ruta. Una combinación desconocida es
    /// `FlowNotFound`; nunca se elige un flow por defecto.
    pub fn open(registry: &FlowRegistry, route: &RouteParams, drafts: DraftStore<S>, api: A) -> Result<Self, WizardError> {
        let flow = registry.resolve(&route.region, &route.applicant_type)?.clone();
        Ok(Self::new(flow, drafts, api, route.edit_id.clone()))
    }

    // ---------------------------------------------------------------
    // Hidratación
    // ---------------------------------------------------------------

    /// `Loading -> Editing(0)`. Con `edit_id` el documento viene del backend;
    /// si no, del draft local o, en su defecto, del template.
    ///
    /// Si `fetch_for_edit` falla el controller sigue en `Loading` y se puede
    /// reintentar.
    pub async fn hydrate(&mut self) -> Result<HydrationSource, WizardError> {
        self.ensure("hydrate", &[Phase::Loading])?;
        let source = match self.edit_id.clone() {
            Some(id) => {
                let bundle = self.api.fetch_for_edit(&id).await?;
                self.adopt_bundle(bundle)?;
                HydrationSource::Remote { id }
            }
            None => self.load_local(),
        };
        self.finish_hydration(source.clone());
        Ok(source)
    }

    /// Hidratación sin red, para sesiones que no editan una solicitud
    /// existente.
    pub fn hydrate_local(&mut self) -> Result<HydrationSource, WizardError> {
        self.ensure("hydrate_local", &[Phase::Loading])?;
        if self.edit_id.is_some() {
            return Err(WizardError::InvalidState { operation: "hydrate_local",
                                                   state: "editing an existing application" });
        }
        let source = self.load_local();
        self.finish_hydration(source.clone());
        Ok(source)
    }

    fn load_local(&mut self) -> HydrationSource {
        match self.drafts.load(self.flow.id()) {
            Some(doc) => {
                self.last_saved = Some(hash_node(&doc));
                self.document = doc;
                HydrationSource::Draft
            }
            None => {
                self.document = self.flow.instantiate();
                HydrationSource::Template
            }
        }
    }

    fn adopt_bundle(&mut self, bundle: EditBundle) -> Result<(), WizardError> {
        let found = FlowId::new(bundle.region, bundle.applicant_type);
        if &found != self.flow.id() {
            return Err(WizardError::FlowMismatch { expected: self.flow.id().clone(),
                                                   found });
        }
        if !matches!(bundle.document, Node::Object(_)) {
            return Err(SubmitError::Failure(format!("edit document is not an object (found {})",
                                                    bundle.document.kind_name())).into());
        }
        self.document = bundle.document;
        for (field, stored) in bundle.attachments {
            self.attachments.load_stored(&field, stored);
        }
        Ok(())
    }

    fn finish_hydration(&mut self, source: HydrationSource) {
        let from_draft = source == HydrationSource::Draft;
        self.events.append_kind(WizardEventKind::Hydrated { source,
                                                            definition_hash: self.flow.definition_hash().to_string() });
        self.sync.reset();
        self.sync.prime(&self.document);
        self.run_sync();
        self.cursor = 0;
        self.phase = Phase::Editing;
        // El template no crea draft: eso ocurre en la primera edición.
        if from_draft {
            self.persist();
        }
        info!("wizard {} hydrated", self.flow.id());
    }

    // ---------------------------------------------------------------
    // Edición
    // ---------------------------------------------------------------

    /// Escribe `value` en `path`, deja converger el auto-sync y persiste.
    ///
    /// Un path mal formado o un tipo incompatible devuelven error sin tocar
    /// el documento.
    pub fn update(&mut self, path: &str, value: impl Into<Node>) -> Result<UpdateOutcome, WizardError> {
        self.ensure("update", &[Phase::Editing, Phase::Failed])?;
        let path = Path::parse(path)?;
        set_in(&mut self.document, &path, value.into())?;
        self.events.append_kind(WizardEventKind::FieldUpdated { path: path.as_str().to_string() });
        self.resume_editing();
        let synced = self.run_sync();
        let saved = self.persist();
        Ok(UpdateOutcome { synced, saved })
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        Path::parse(path).ok().and_then(|p| get(&self.document, &p))
    }

    pub fn set_attachment(&mut self, field: &str, file: Option<FileHandle>) -> Result<AttachmentChange, WizardError> {
        self.ensure("set_attachment", &[Phase::Editing, Phase::Failed])?;
        let change = self.attachments.set(field, file);
        self.events.append_kind(WizardEventKind::AttachmentChanged { field: change.field_name.clone(),
                                                                     revision: change.revision,
                                                                     cleared: change.cleared });
        self.resume_editing();
        Ok(change)
    }

    /// Una edición tras un submit fallido vuelve a `Editing`.
    fn resume_editing(&mut self) {
        if self.phase == Phase::Failed {
            self.phase = Phase::Editing;
            self.failure_message = None;
            info!("wizard {} back to editing", self.flow.id());
        }
    }

    /// Pasadas del engine hasta que no haya escrituras. Cada pasada ve las
    /// escrituras de la anterior, así que reglas encadenadas convergen.
    fn run_sync(&mut self) -> Vec<SyncWrite> {
        let mut all = Vec::new();
        for _ in 0..MAX_SYNC_PASSES {
            let writes = self.sync.run_pass(&mut self.document);
            if writes.is_empty() {
                return all;
            }
            for w in &writes {
                self.events.append_kind(WizardEventKind::AutoSynced { rule: w.rule.clone(),
                                                                      target: w.target.as_str().to_string() });
            }
            all.extend(writes);
        }
        warn!("auto-sync for {} did not settle after {MAX_SYNC_PASSES} passes", self.flow.id());
        all
    }

    /// Guarda el draft si el documento cambió desde el último guardado. En
    /// modo edición nunca se toca el draft local.
    fn persist(&mut self) -> bool {
        if self.edit_id.is_some() {
            return false;
        }
        let fingerprint = hash_node(&self.document);
        if self.last_saved.as_deref() == Some(fingerprint.as_str()) {
            return false;
        }
        self.drafts.save(self.flow.id(), &self.document);
        self.events.append_kind(WizardEventKind::DraftSaved { fingerprint: fingerprint.clone() });
        self.last_saved = Some(fingerprint);
        true
    }

    // ---------------------------------------------------------------
    // Navegación (sin validación: eso es cosa de cada step)
    // ---------------------------------------------------------------

    pub fn next(&mut self) -> Result<usize, WizardError> {
        self.go_to(self.cursor.saturating_add(1))
    }

    pub fn prev(&mut self) -> Result<usize, WizardError> {
        self.go_to(self.cursor.saturating_sub(1))
    }

    /// Salta a `index`, acotado a `[0, steps - 1]`.
    pub fn go_to(&mut self, index: usize) -> Result<usize, WizardError> {
        self.ensure("navigate", &[Phase::Editing, Phase::Failed])?;
        let to = index.min(self.flow.step_count().saturating_sub(1));
        if to != self.cursor {
            self.events.append_kind(WizardEventKind::StepChanged { from: self.cursor, to });
            debug!("wizard {} step {} -> {}", self.flow.id(), self.cursor, to);
            self.cursor = to;
        }
        Ok(to)
    }

    pub fn current_step(&self) -> Option<&StepDef> {
        self.flow.step(self.cursor)
    }

    pub fn step_index(&self) -> usize {
        self.cursor
    }

    // ---------------------------------------------------------------
    // Errores
    // ---------------------------------------------------------------

    /// Validación local: sustituye el ErrorIndex completo. Devuelve el número
    /// de errores.
    pub fn validate(&mut self, validator: &dyn Validator) -> Result<usize, WizardError> {
        self.ensure("validate", &[Phase::Editing, Phase::Failed])?;
        let found = validator.validate(&self.document);
        Ok(self.replace_errors(found))
    }

    pub fn replace_errors(&mut self, mapping: BTreeMap<String, String>) -> usize {
        self.errors.replace_all(mapping);
        let count = self.errors.len();
        self.events.append_kind(WizardEventKind::ErrorsReplaced { count });
        count
    }

    pub fn errors(&self) -> &ErrorIndex {
        &self.errors
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors.lookup(path)
    }

    /// Mensaje de un fallo sin errores por campo (red, servidor).
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    // ---------------------------------------------------------------
    // Submit
    // ---------------------------------------------------------------

    /// Entrega documento y adjuntos al backend: `submit` para una solicitud
    /// nueva, `update` en modo edición.
    ///
    /// El documento se conserva siempre. En éxito se limpia el draft; un
    /// `SubmitError::Validation` vuelca el mapa al ErrorIndex; cualquier otro
    /// fallo, incluida una validación sin campos, queda en `failure_message`
    /// sin tocar el ErrorIndex.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WizardError> {
        self.ensure("submit", &[Phase::Editing, Phase::Failed])?;
        self.phase = Phase::Submitting;
        self.failure_message = None;
        self.events.append_kind(WizardEventKind::SubmitStarted);
        info!("wizard {} submitting", self.flow.id());

        let files = self.attachments.package_all();
        let result = match &self.edit_id {
            Some(id) => self.api
                            .update(id, &self.document, &files)
                            .await
                            .map(|()| SubmitOutcome::Updated { id: id.clone() }),
            None => self.api.submit(&self.document, &files).await.map(SubmitOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                self.phase = Phase::Done;
                self.errors.clear();
                let id = match &outcome {
                    SubmitOutcome::Created(receipt) => {
                        self.receipt = Some(receipt.clone());
                        receipt.id.clone()
                    }
                    SubmitOutcome::Updated { id } => id.clone(),
                };
                if self.edit_id.is_none() {
                    self.drafts.clear(self.flow.id());
                    self.last_saved = None;
                    self.events.append_kind(WizardEventKind::DraftCleared);
                }
                self.events.append_kind(WizardEventKind::Submitted { id });
                info!("wizard {} done", self.flow.id());
                Ok(outcome)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                let err = match err {
                    SubmitError::Validation(fields) if fields.is_empty() => {
                        SubmitError::Failure(EMPTY_VALIDATION.to_string())
                    }
                    other => other,
                };
                match &err {
                    SubmitError::Validation(fields) => {
                        self.errors.replace_all(fields.clone());
                        self.events.append_kind(WizardEventKind::ErrorsReplaced { count: fields.len() });
                    }
                    SubmitError::Failure(message) => self.failure_message = Some(message.clone()),
                }
                self.events.append_kind(WizardEventKind::SubmitFailed { field_errors: self.errors.len(),
                                                                        message: self.failure_message.clone() });
                warn!("wizard {} submit failed: {err}", self.flow.id());
                Err(err.into())
            }
        }
    }

    /// Descarta el trabajo: borra el draft y vuelve a empezar desde el
    /// template con memoria de auto-sync nueva.
    pub fn discard(&mut self) -> Result<(), WizardError> {
        self.ensure("discard", &[Phase::Editing, Phase::Failed, Phase::Done])?;
        if self.edit_id.is_some() {
            return Err(WizardError::InvalidState { operation: "discard",
                                                   state: "editing an existing application" });
        }
        self.drafts.clear(self.flow.id());
        self.last_saved = None;
        self.document = self.flow.instantiate();
        self.errors.clear();
        self.failure_message = None;
        self.attachments.clear();
        self.receipt = None;
        self.sync.reset();
        self.sync.prime(&self.document);
        self.run_sync();
        self.cursor = 0;
        self.phase = Phase::Editing;
        self.events.append_kind(WizardEventKind::Discarded);
        info!("wizard {} discarded", self.flow.id());
        Ok(())
    }

    fn ensure(&self, operation: &'static str, allowed: &[Phase]) -> Result<(), WizardError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(WizardError::InvalidState { operation,
                                            state: self.state().name() })
        }
    }

    // ---------------------------------------------------------------
    // Accesores
    // ---------------------------------------------------------------

    pub fn state(&self) -> WizardState {
        self.phase.with_cursor(self.cursor)
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    pub fn sync_engine(&self) -> &AutoSyncEngine {
        &self.sync
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn receipt(&self) -> Option<&SubmitReceipt> {
        self.receipt.as_ref()
    }

    pub fn edit_id(&self) -> Option<&str> {
        self.edit_id.as_deref()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_id.is_some()
    }

    pub fn drafts(&self) -> &DraftStore<S> {
        &self.drafts
    }

    pub fn drafts_mut(&mut self) -> &mut DraftStore<S> {
        &mut self.drafts
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Devuelve el store para reutilizarlo en el controller del siguiente
    /// flow.
    pub fn into_drafts(self) -> DraftStore<S> {
        self.drafts
    }
}
