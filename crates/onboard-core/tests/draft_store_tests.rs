use onboard_core::{DraftStore, FlowId, InMemoryDraftStorage, Node};
use serde_json::json;

fn flow_id() -> FlowId {
    FlowId::new("local", "individual")
}

#[test]
fn key_layout_includes_namespace_and_flow() {
    let store = DraftStore::with_namespace(InMemoryDraftStorage::default(), "broker");
    assert_eq!(store.key_for(&flow_id()), "broker:draft:local:individual");
    assert_eq!(DraftStore::new(InMemoryDraftStorage::default()).key_for(&flow_id()),
               "onboard:draft:local:individual");
}

#[test]
fn save_then_load_round_trips() {
    let doc = Node::from(json!({
        "clientRegistration": {"principal": {"namesByInitials": "A.B. Silva", "age": 41, "resident": true}},
        "beneficialOwnership": {"beneficialOwners": [{"pep": null}, {"pep": "no"}]},
        "kyc": {"ratio": 0.25, "notes": ""}
    }));
    let mut store = DraftStore::new(InMemoryDraftStorage::default());
    store.save(&flow_id(), &doc);
    assert_eq!(store.load(&flow_id()), Some(doc));
}

#[test]
fn drafts_are_isolated_per_flow() {
    let mut store = DraftStore::new(InMemoryDraftStorage::default());
    store.save(&flow_id(), &Node::from(json!({"a": "1"})));
    assert_eq!(store.load(&FlowId::new("local", "corporate")), None);
}

#[test]
fn corrupted_json_loads_as_none() {
    let mut storage = InMemoryDraftStorage::default();
    storage.put_raw("onboard:draft:local:individual", "{\"kyc\": {");
    let store = DraftStore::new(storage);
    assert_eq!(store.load(&flow_id()), None);
}

#[test]
fn non_object_draft_loads_as_none() {
    let mut storage = InMemoryDraftStorage::default();
    storage.put_raw("onboard:draft:local:individual", "[1, 2, 3]");
    assert_eq!(DraftStore::new(storage).load(&flow_id()), None);
}

#[test]
fn read_failure_loads_as_none() {
    let mut storage = InMemoryDraftStorage::default();
    storage.put_raw("onboard:draft:local:individual", "{}");
    storage.set_fail_reads(true);
    assert_eq!(DraftStore::new(storage).load(&flow_id()), None);
}

#[test]
fn write_failure_is_swallowed() {
    let mut storage = InMemoryDraftStorage::default();
    storage.set_fail_writes(true);
    let mut store = DraftStore::new(storage);
    store.save(&flow_id(), &Node::from(json!({"a": "1"})));
    store.clear(&flow_id());
    assert_eq!(store.load(&flow_id()), None);
}

#[test]
fn clear_removes_the_draft() {
    let mut store = DraftStore::new(InMemoryDraftStorage::default());
    store.save(&flow_id(), &Node::from(json!({"a": "1"})));
    store.clear(&flow_id());
    assert_eq!(store.load(&flow_id()), None);
    assert!(store.storage().get_raw("onboard:draft:local:individual").is_none());
}
