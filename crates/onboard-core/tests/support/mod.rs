#![allow(dead_code)]
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use onboard_core::{AutoSyncRule, EditBundle, Flow, Node, PackagedFile, SubmissionApi, SubmitError, SubmitReceipt};
use serde_json::json;

/// Small two-region flow with one mirror rule and one joint-applicant rule.
pub fn sample_flow() -> Flow {
    Flow::builder("local", "individual").step("clientRegistration", "Client registration")
                                        .step("kyc", "KYC")
                                        .step("iWeDeclaration", "Declaration")
                                        .template(json!({
                                            "clientRegistration": {
                                                "principal": { "namesByInitials": "", "nic": "" },
                                                "hasJoint": false,
                                                "joint": { "namesByInitials": "" }
                                            },
                                            "kyc": { "pep": "" },
                                            "iWeDeclaration": { "name": "", "jointName": "" }
                                        }))
                                        .sync(AutoSyncRule::mirror("clientRegistration.principal.namesByInitials",
                                                                   "iWeDeclaration.name").unwrap())
                                        .sync(AutoSyncRule::mirror("clientRegistration.joint.namesByInitials",
                                                                   "iWeDeclaration.jointName").unwrap()
                                                                                             .enabled_when_flag("clientRegistration.hasJoint")
                                                                                             .unwrap())
                                        .build()
                                        .unwrap()
}

pub fn receipt(id: &str) -> SubmitReceipt {
    SubmitReceipt { id: id.to_string(),
                    edit_token: format!("token-{id}"),
                    edit_until: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap() }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Submit { document: Node, files: Vec<(String, String)> },
    Update { id: String, document: Node, files: Vec<(String, String)> },
    Fetch { id: String },
}

/// Scripted submission double: answers are consumed in order.
#[derive(Default)]
pub struct ScriptedApi {
    pub submits: Mutex<VecDeque<Result<SubmitReceipt, SubmitError>>>,
    pub updates: Mutex<VecDeque<Result<(), SubmitError>>>,
    pub fetches: Mutex<VecDeque<Result<EditBundle, SubmitError>>>,
    pub calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_submit(self, answer: Result<SubmitReceipt, SubmitError>) -> Self {
        self.submits.lock().unwrap().push_back(answer);
        self
    }

    pub fn on_update(self, answer: Result<(), SubmitError>) -> Self {
        self.updates.lock().unwrap().push_back(answer);
        self
    }

    pub fn on_fetch(self, answer: Result<EditBundle, SubmitError>) -> Self {
        self.fetches.lock().unwrap().push_back(answer);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn names(files: &[PackagedFile]) -> Vec<(String, String)> {
    files.iter().map(|f| (f.field_name.clone(), f.filename.clone())).collect()
}

fn exhausted() -> SubmitError {
    SubmitError::Failure("no scripted answer".to_string())
}

#[async_trait]
impl SubmissionApi for ScriptedApi {
    async fn submit(&self, document: &Node, files: &[PackagedFile]) -> Result<SubmitReceipt, SubmitError> {
        self.calls.lock().unwrap().push(Call::Submit { document: document.clone(),
                                                       files: names(files) });
        self.submits.lock().unwrap().pop_front().unwrap_or_else(|| Err(exhausted()))
    }

    async fn update(&self, id: &str, document: &Node, files: &[PackagedFile]) -> Result<(), SubmitError> {
        self.calls.lock().unwrap().push(Call::Update { id: id.to_string(),
                                                       document: document.clone(),
                                                       files: names(files) });
        self.updates.lock().unwrap().pop_front().unwrap_or_else(|| Err(exhausted()))
    }

    async fn fetch_for_edit(&self, id: &str) -> Result<EditBundle, SubmitError> {
        self.calls.lock().unwrap().push(Call::Fetch { id: id.to_string() });
        self.fetches.lock().unwrap().pop_front().unwrap_or_else(|| Err(exhausted()))
    }
}
