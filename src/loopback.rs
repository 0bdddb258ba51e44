//! Backend de solicitudes en proceso.
//!
//! Aplica una validación de campos requeridos del lado "servidor", emite
//! recibos y guarda lo recibido para poder editarlo después. Sirve para la
//! demo y para los tests de extremo a extremo sin red.
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use onboard_core::{EditBundle, FlowId, Node, PackagedFile, RequiredPaths, StoredFile, SubmissionApi, SubmitError,
                   SubmitReceipt, Validator};
use uuid::Uuid;

/// Días durante los que una solicitud se puede editar.
pub const EDIT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct StoredApplication {
    pub document: Node,
    pub files: BTreeMap<String, StoredFile>,
    pub revisions: u32,
}

/// Los clones comparten el mismo almacén, así que un controller nuevo en
/// modo edición ve lo que recibió el anterior.
#[derive(Clone)]
pub struct LoopbackApi {
    flow: FlowId,
    required: Arc<RequiredPaths>,
    applications: Arc<Mutex<HashMap<String, StoredApplication>>>,
    offline: Arc<AtomicBool>,
}

impl LoopbackApi {
    pub fn new(flow: FlowId) -> Self {
        Self::with_required(flow, Vec::<String>::new())
    }

    pub fn with_required<I, P>(flow: FlowId, required: I) -> Self
        where I: IntoIterator<Item = P>,
              P: Into<String>
    {
        Self { flow,
               required: Arc::new(RequiredPaths::new(required)),
               applications: Arc::new(Mutex::new(HashMap::new())),
               offline: Arc::new(AtomicBool::new(false)) }
    }

    /// Simula una caída de red: las llamadas fallan sin errores por campo.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn application(&self, id: &str) -> Option<StoredApplication> {
        self.applications.lock().ok()?.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.applications.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, document: &Node) -> Result<(), SubmitError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SubmitError::Failure("backend unreachable".into()));
        }
        let errors = self.required.validate(document);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SubmitError::Validation(errors))
        }
    }

    fn store_files(id: &str, files: &[PackagedFile], into: &mut BTreeMap<String, StoredFile>) {
        for file in files {
            into.insert(file.field_name.clone(),
                        StoredFile { filename: file.filename.clone(),
                                     location: format!("/applications/{id}/files/{}", file.sha256) });
        }
    }

    fn poisoned() -> SubmitError {
        SubmitError::Failure("application store unavailable".into())
    }
}

#[async_trait]
impl SubmissionApi for LoopbackApi {
    async fn submit(&self, document: &Node, files: &[PackagedFile]) -> Result<SubmitReceipt, SubmitError> {
        self.check(document)?;
        let id = Uuid::new_v4().to_string();
        let mut stored = BTreeMap::new();
        Self::store_files(&id, files, &mut stored);
        let mut applications = self.applications.lock().map_err(|_| Self::poisoned())?;
        applications.insert(id.clone(),
                            StoredApplication { document: document.clone(),
                                                files: stored,
                                                revisions: 1 });
        Ok(SubmitReceipt { id,
                           edit_token: Uuid::new_v4().simple().to_string(),
                           edit_until: Utc::now() + Duration::days(EDIT_WINDOW_DAYS) })
    }

    async fn update(&self, id: &str, document: &Node, files: &[PackagedFile]) -> Result<(), SubmitError> {
        self.check(document)?;
        let mut applications = self.applications.lock().map_err(|_| Self::poisoned())?;
        let app = applications.get_mut(id)
                              .ok_or_else(|| SubmitError::Failure(format!("404 application {id} not found")))?;
        app.document = document.clone();
        app.revisions += 1;
        Self::store_files(id, files, &mut app.files);
        Ok(())
    }

    async fn fetch_for_edit(&self, id: &str) -> Result<EditBundle, SubmitError> {
        let applications = self.applications.lock().map_err(|_| Self::poisoned())?;
        let app = applications.get(id)
                              .ok_or_else(|| SubmitError::Failure(format!("404 application {id} not found")))?;
        Ok(EditBundle { region: self.flow.region().to_string(),
                        applicant_type: self.flow.applicant_type().to_string(),
                        document: app.document.clone(),
                        attachments: app.files.clone() })
    }
}
