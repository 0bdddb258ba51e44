mod support;

use std::collections::BTreeMap;

use onboard_core::{get_str, DraftStore, EditBundle, FileHandle, FlowRegistry, HydrationSource, InMemoryDraftStorage,
                   Node, RequiredPaths, RouteParams, StoredFile, SubmitError, SubmitOutcome, WizardController,
                   WizardError, WizardEventKind, WizardState};
use serde_json::json;
use support::{receipt, sample_flow, Call, ScriptedApi};

type Controller = WizardController<InMemoryDraftStorage, ScriptedApi>;

const DRAFT_KEY: &str = "onboard:draft:local:individual";

fn controller(storage: InMemoryDraftStorage, api: ScriptedApi) -> Controller {
    WizardController::new(sample_flow(), DraftStore::new(storage), api, None)
}

fn hydrated(api: ScriptedApi) -> Controller {
    let mut c = controller(InMemoryDraftStorage::default(), api);
    c.hydrate_local().unwrap();
    c
}

fn text<'a>(c: &'a Controller, path: &str) -> Option<&'a str> {
    c.get(path).and_then(Node::as_text)
}

fn stored_draft(c: &Controller) -> Option<serde_json::Value> {
    c.drafts()
     .storage()
     .get_raw(DRAFT_KEY)
     .map(|raw| serde_json::from_str(raw).unwrap())
}

#[test]
fn starts_loading_and_rejects_edits() {
    let mut c = controller(InMemoryDraftStorage::default(), ScriptedApi::new());
    assert_eq!(c.state(), WizardState::Loading);
    let err = c.update("kyc.pep", "no").unwrap_err();
    assert!(matches!(err, WizardError::InvalidState { operation: "update", state: "loading" }));
}

#[test]
fn unknown_route_is_flow_not_found() {
    let registry = FlowRegistry::new().with(sample_flow()).unwrap();
    let route = RouteParams::new("local", "trust");
    let result = Controller::open(&registry, &route, DraftStore::new(InMemoryDraftStorage::default()), ScriptedApi::new());
    assert!(matches!(result, Err(WizardError::FlowNotFound { .. })));
}

#[test]
fn hydrates_from_template_without_creating_a_draft() {
    let c = hydrated(ScriptedApi::new());
    assert_eq!(c.state(), WizardState::Editing { step: 0 });
    assert_eq!(c.document(), c.flow().template());
    assert!(stored_draft(&c).is_none());
    assert!(matches!(c.events().list()[0].kind,
                     WizardEventKind::Hydrated { source: HydrationSource::Template, .. }));
}

#[test]
fn corrupted_draft_falls_back_to_template() {
    let mut storage = InMemoryDraftStorage::default();
    storage.put_raw(DRAFT_KEY, "{not json");
    let mut c = controller(storage, ScriptedApi::new());
    assert_eq!(c.hydrate_local().unwrap(), HydrationSource::Template);
    assert_eq!(c.document(), c.flow().template());
}

#[test]
fn update_persists_and_mirrors_through_the_same_write_path() {
    let mut c = hydrated(ScriptedApi::new());
    let outcome = c.update("clientRegistration.principal.namesByInitials", "A.B. Silva").unwrap();
    assert!(outcome.saved);
    assert_eq!(outcome.synced.len(), 1);
    assert_eq!(text(&c, "iWeDeclaration.name"), Some("A.B. Silva"));

    let draft = stored_draft(&c).unwrap();
    assert_eq!(draft["iWeDeclaration"]["name"], json!("A.B. Silva"));
}

#[test]
fn user_override_of_declaration_name_is_kept() {
    let mut c = hydrated(ScriptedApi::new());
    c.update("clientRegistration.principal.namesByInitials", "A.B. Silva").unwrap();
    c.update("iWeDeclaration.name", "A.B. Silva (Jr)").unwrap();
    let outcome = c.update("clientRegistration.principal.namesByInitials", "A.B.C. Silva").unwrap();
    assert!(outcome.synced.is_empty());
    assert_eq!(text(&c, "iWeDeclaration.name"), Some("A.B. Silva (Jr)"));
}

#[test]
fn rewriting_the_same_value_does_not_resave() {
    let mut c = hydrated(ScriptedApi::new());
    assert!(c.update("kyc.pep", "no").unwrap().saved);
    assert!(!c.update("kyc.pep", "no").unwrap().saved);
}

#[test]
fn draft_rehydrates_and_keeps_auto_ownership() {
    let mut first = hydrated(ScriptedApi::new());
    first.update("clientRegistration.principal.namesByInitials", "A").unwrap();
    let drafts = first.into_drafts();

    let mut second = WizardController::new(sample_flow(), drafts, ScriptedApi::new(), None);
    assert_eq!(second.hydrate_local().unwrap(), HydrationSource::Draft);
    assert_eq!(text(&second, "iWeDeclaration.name"), Some("A"));
    second.update("clientRegistration.principal.namesByInitials", "B").unwrap();
    assert_eq!(text(&second, "iWeDeclaration.name"), Some("B"));
}

#[test]
fn type_mismatch_leaves_document_untouched() {
    let mut c = hydrated(ScriptedApi::new());
    let before = c.document().clone();
    let err = c.update("kyc.pep.value", "x").unwrap_err();
    assert!(matches!(err, WizardError::Path(_)));
    assert_eq!(c.document(), &before);
}

#[test]
fn navigation_is_clamped() {
    let mut c = hydrated(ScriptedApi::new());
    assert_eq!(c.prev().unwrap(), 0);
    assert_eq!(c.go_to(99).unwrap(), 2);
    assert_eq!(c.next().unwrap(), 2);
    assert_eq!(c.state(), WizardState::Editing { step: 2 });
    assert_eq!(c.current_step().map(|s| s.key.as_str()), Some("iWeDeclaration"));
}

#[test]
fn joint_toggle_clears_auto_filled_name() {
    let mut c = hydrated(ScriptedApi::new());
    c.update("clientRegistration.hasJoint", true).unwrap();
    c.update("clientRegistration.joint.namesByInitials", "C. Perera").unwrap();
    assert_eq!(text(&c, "iWeDeclaration.jointName"), Some("C. Perera"));
    c.update("clientRegistration.hasJoint", false).unwrap();
    assert_eq!(text(&c, "iWeDeclaration.jointName"), Some(""));
}

#[test]
fn local_validation_replaces_error_index() {
    let mut c = hydrated(ScriptedApi::new());
    let validator = RequiredPaths::new(["kyc.pep", "clientRegistration.principal.nic"]);
    assert_eq!(c.validate(&validator).unwrap(), 2);
    c.update("kyc.pep", "no").unwrap();
    assert_eq!(c.validate(&validator).unwrap(), 1);
    assert_eq!(c.error_for("kyc.pep"), None);
    assert_eq!(c.error_for("clientRegistration.principal.nic"), Some("required"));
}

#[test]
fn successful_submit_clears_draft_and_errors() {
    let api = ScriptedApi::new().on_submit(Ok(receipt("app-1")));
    let mut c = hydrated(api);
    c.update("kyc.pep", "no").unwrap();
    c.replace_errors(BTreeMap::from([("kyc.pep".to_string(), "stale".to_string())]));
    c.set_attachment("nicFront", Some(FileHandle::new("front.jpg", b"jpeg".to_vec()))).unwrap();

    let outcome = tokio_test::block_on(c.submit()).unwrap();
    assert!(matches!(outcome, SubmitOutcome::Created(ref r) if r.id == "app-1"));
    assert_eq!(c.state(), WizardState::Done);
    assert!(c.errors().is_empty());
    assert!(stored_draft(&c).is_none());
    assert_eq!(c.receipt().map(|r| r.edit_token.as_str()), Some("token-app-1"));

    match &c.api().calls()[0] {
        Call::Submit { document, files } => {
            assert_eq!(get_str(document, "kyc.pep"), Some(&Node::text("no")));
            assert_eq!(files, &vec![("nicFront".to_string(), "front.jpg".to_string())]);
        }
        other => panic!("unexpected call {other:?}"),
    }

    let err = tokio_test::block_on(c.submit()).unwrap_err();
    assert!(matches!(err, WizardError::InvalidState { operation: "submit", state: "done" }));
}

#[test]
fn validation_failure_routes_errors_to_exact_paths() {
    let failure = BTreeMap::from([("beneficialOwnership.beneficialOwners.0.pep".to_string(), "required".to_string())]);
    let api = ScriptedApi::new().on_submit(Err(SubmitError::Validation(failure)));
    let mut c = hydrated(api);
    c.update("kyc.pep", "no").unwrap();
    c.go_to(1).unwrap();

    let err = tokio_test::block_on(c.submit()).unwrap_err();
    assert!(matches!(err, WizardError::Submit(SubmitError::Validation(_))));
    assert_eq!(c.state(), WizardState::Failed { step: 1 });
    assert_eq!(c.error_for("beneficialOwnership.beneficialOwners.0.pep"), Some("required"));
    assert_eq!(c.error_for("beneficialOwnership.beneficialOwners.1.pep"), None);
    assert_eq!(c.error_for("beneficialOwnership.beneficialOwners.0"), None);
    assert_eq!(text(&c, "kyc.pep"), Some("no"));
    assert!(stored_draft(&c).is_some());
}

#[test]
fn transport_failure_keeps_errors_and_document() {
    let api = ScriptedApi::new().on_submit(Err(SubmitError::Failure("502 bad gateway".into())))
                                .on_submit(Ok(receipt("app-2")));
    let mut c = hydrated(api);
    c.update("kyc.pep", "yes").unwrap();
    c.replace_errors(BTreeMap::from([("kyc.pep".to_string(), "check".to_string())]));

    assert!(tokio_test::block_on(c.submit()).is_err());
    assert_eq!(c.state(), WizardState::Failed { step: 0 });
    assert_eq!(c.failure_message(), Some("502 bad gateway"));
    assert_eq!(c.error_for("kyc.pep"), Some("check"));

    // A new edit returns to editing; a retry may also go straight from Failed.
    c.update("kyc.pep", "no").unwrap();
    assert_eq!(c.state(), WizardState::Editing { step: 0 });
    assert_eq!(c.failure_message(), None);
    assert!(tokio_test::block_on(c.submit()).is_ok());
}

#[test]
fn validation_without_fields_reports_a_message() {
    let api = ScriptedApi::new().on_submit(Err(SubmitError::Validation(BTreeMap::new())));
    let mut c = hydrated(api);
    c.replace_errors(BTreeMap::from([("kyc.pep".to_string(), "check".to_string())]));

    let err = tokio_test::block_on(c.submit()).unwrap_err();
    assert!(matches!(err, WizardError::Submit(SubmitError::Failure(_))));
    assert_eq!(c.state(), WizardState::Failed { step: 0 });
    assert_eq!(c.failure_message(), Some("submission rejected without field errors"));
    assert_eq!(c.error_for("kyc.pep"), Some("check"));
}

#[test]
fn edit_mode_hydrates_remotely_and_never_touches_drafts() {
    let bundle = EditBundle { region: "local".into(),
                              applicant_type: "individual".into(),
                              document: Node::from(json!({
                                  "clientRegistration": {"principal": {"namesByInitials": "A"}, "hasJoint": false},
                                  "kyc": {"pep": "no"},
                                  "iWeDeclaration": {"name": "A"}
                              })),
                              attachments: BTreeMap::from([("nicFront".to_string(),
                                                            StoredFile { filename: "nic.jpg".into(),
                                                                         location: "/files/1".into() })]) };
    let api = ScriptedApi::new().on_fetch(Ok(bundle)).on_update(Ok(()));
    let mut storage = InMemoryDraftStorage::default();
    storage.put_raw(DRAFT_KEY, "{\"kyc\": {\"pep\": \"draft\"}}");
    let mut c = WizardController::new(sample_flow(), DraftStore::new(storage), api, Some("app-9".into()));

    assert!(matches!(c.hydrate_local(), Err(WizardError::InvalidState { .. })));
    let source = tokio_test::block_on(c.hydrate()).unwrap();
    assert_eq!(source, HydrationSource::Remote { id: "app-9".into() });
    assert!(c.attachments().get("nicFront").map_or(false, |a| a.is_stored()));

    let outcome = c.update("clientRegistration.principal.namesByInitials", "B").unwrap();
    assert!(!outcome.saved);
    assert_eq!(text(&c, "iWeDeclaration.name"), Some("B"));

    let done = tokio_test::block_on(c.submit()).unwrap();
    assert_eq!(done, SubmitOutcome::Updated { id: "app-9".into() });
    assert_eq!(c.drafts().storage().get_raw(DRAFT_KEY), Some("{\"kyc\": {\"pep\": \"draft\"}}"));
    match &c.api().calls()[1] {
        Call::Update { id, files, .. } => {
            assert_eq!(id, "app-9");
            assert!(files.is_empty());
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn edit_bundle_for_another_flow_is_rejected() {
    let bundle = EditBundle { region: "foreign".into(),
                              applicant_type: "individual".into(),
                              document: Node::object(),
                              attachments: BTreeMap::new() };
    let api = ScriptedApi::new().on_fetch(Ok(bundle));
    let mut c = WizardController::new(sample_flow(), DraftStore::new(InMemoryDraftStorage::default()), api, Some("x".into()));
    let err = tokio_test::block_on(c.hydrate()).unwrap_err();
    assert!(matches!(err, WizardError::FlowMismatch { .. }));
    assert_eq!(c.state(), WizardState::Loading);
}

#[test]
fn discard_restarts_from_template() {
    let mut c = hydrated(ScriptedApi::new());
    c.update("clientRegistration.principal.namesByInitials", "A").unwrap();
    c.go_to(2).unwrap();
    c.discard().unwrap();
    assert_eq!(c.state(), WizardState::Editing { step: 0 });
    assert_eq!(c.document(), c.flow().template());
    assert!(stored_draft(&c).is_none());
    assert_eq!(c.sync_engine().last_auto("iWeDeclaration.name"), None);
}

#[test]
fn reselecting_identical_file_is_a_new_revision() {
    let mut c = hydrated(ScriptedApi::new());
    let first = c.set_attachment("signature", Some(FileHandle::new("sig.png", b"same".to_vec()))).unwrap();
    let second = c.set_attachment("signature", Some(FileHandle::new("sig.png", b"same".to_vec()))).unwrap();
    assert!(second.revision > first.revision);
    let changes = c.events()
                   .kinds()
                   .filter(|k| matches!(k, WizardEventKind::AttachmentChanged { .. }))
                   .count();
    assert_eq!(changes, 2);
}
