use std::sync::Arc;

use onboard_adapters::{ClientConfig, HttpSubmissionClient};
use onboard_core::{Node, PackagedFile, SubmissionApi, SubmitError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpSubmissionClient {
    HttpSubmissionClient::new(ClientConfig::new(server.uri()).with_token("secret")).unwrap()
}

fn document() -> Node {
    Node::from(json!({"kyc": {"pep": "no"}}))
}

fn signature() -> PackagedFile {
    PackagedFile { field_name: "principalSignature".into(),
                   filename: "Signature of Principal Applicant.png".into(),
                   content_type: "image/png".into(),
                   sha256: String::new(),
                   bytes: Arc::from(&b"png"[..]) }
}

#[tokio::test]
async fn test_submit_returns_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).and(path("/applications"))
                               .and(header("authorization", "Bearer secret"))
                               .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                                   "id": "app-1",
                                   "editToken": "tok",
                                   "editUntil": "2030-01-01T00:00:00Z"
                               })))
                               .expect(1)
                               .mount(&server)
                               .await;

    let receipt = client(&server).submit(&document(), &[signature()]).await.unwrap();
    assert_eq!(receipt.id, "app-1");
    assert_eq!(receipt.edit_token, "tok");
}

#[tokio::test]
async fn test_unprocessable_maps_to_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).and(path("/applications"))
                               .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                                   "message": "Validation failed",
                                   "errors": {
                                       "beneficialOwnership.beneficialOwners.0.pep": { "message": "required" }
                                   }
                               })))
                               .mount(&server)
                               .await;

    let err = client(&server).submit(&document(), &[]).await.unwrap_err();
    match err {
        SubmitError::Validation(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields["beneficialOwnership.beneficialOwners.0.pep"], "required");
        }
        other => panic!("expected validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_a_plain_failure() {
    let server = MockServer::start().await;
    Mock::given(method("PUT")).and(path("/applications/app-9"))
                              .respond_with(ResponseTemplate::new(503))
                              .mount(&server)
                              .await;

    let err = client(&server).update("app-9", &document(), &[]).await.unwrap_err();
    assert!(matches!(err, SubmitError::Failure(ref m) if m.starts_with("503")));
}

#[tokio::test]
async fn test_fetch_for_edit_decodes_bundle() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/applications/app-9/edit"))
                              .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                                  "region": "local",
                                  "applicantType": "individual",
                                  "document": {"kyc": {"pep": "no"}},
                                  "attachments": {"nicFront": {"filename": "nic.jpg", "location": "/files/1"}}
                              })))
                              .mount(&server)
                              .await;

    let bundle = client(&server).fetch_for_edit("app-9").await.unwrap();
    assert_eq!(bundle.applicant_type, "individual");
    assert_eq!(bundle.document, document());
    assert_eq!(bundle.attachments["nicFront"].filename, "nic.jpg");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_failure() {
    let config = ClientConfig::new("http://127.0.0.1:9");
    let err = HttpSubmissionClient::new(config).unwrap().fetch_for_edit("x").await.unwrap_err();
    assert!(matches!(err, SubmitError::Failure(_)));
}
