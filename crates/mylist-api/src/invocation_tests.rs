use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;

use super::*;
use crate::testing::{numbered, FakeRegistrar, TestServices};

fn register_body(services: &TestServices, action: &str) -> Value {
    json!({
        "action": action,
        "email": "user@example.com",
        "password": services.encrypt("hunter2"),
        "id_list": ["sm1", "sm2", "sm3"],
        "subscription": {"endpoint": "https://push.example.com"},
        "uuid": "job-1",
        "chunk_index": 0,
    })
}

#[tokio::test]
async fn test_health_check() {
    let services = TestServices::new();
    let resp = handle_event(&services.state(), Some(json!({"health_check": true}))).await;

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.message(), Some("Lambda is ready"));
    assert!(resp.body["timestamp"].is_i64());
}

#[tokio::test]
async fn test_missing_body() {
    let services = TestServices::new();
    let resp = handle_event(&services.state(), None).await;
    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some(MISSING_FIELDS));
}

#[tokio::test]
async fn test_missing_fields() {
    let services = TestServices::new();
    let resp = handle_event(
        &services.state(),
        Some(json!({"action": "register", "email": "user@example.com", "id_list": ["sm1"]})),
    )
    .await;
    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some(MISSING_FIELDS));
}

#[tokio::test]
async fn test_empty_id_list_is_missing() {
    let services = TestServices::new();
    let mut body = register_body(&services, "register");
    body["id_list"] = json!([]);
    let resp = handle_event(&services.state(), Some(body)).await;
    assert_eq!(resp.error_message(), Some(MISSING_FIELDS));
}

#[tokio::test]
async fn test_flipped_tag_byte_is_bad_request() {
    let services = TestServices::new();
    let mut bytes = BASE64.decode(services.encrypt("hunter2")).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let mut body = register_body(&services, "register");
    body["password"] = json!(BASE64.encode(bytes));

    let resp = handle_event(&services.state(), Some(body)).await;

    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some("Failed to decrypt password"));
    assert!(resp.body["detail"].is_string());
    assert!(services.registrar.batches.lock().is_empty());
}

#[tokio::test]
async fn test_register_tracked_chunk() {
    let services = TestServices::with_registrar(FakeRegistrar {
        failing: ["sm2".to_string()].into_iter().collect(),
        ..FakeRegistrar::default()
    });
    let body = register_body(&services, "register");

    let resp = handle_event(&services.state(), Some(body)).await;

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.message(), Some("Registration completed"));
    assert_eq!(resp.body["failed_id_list"], json!(["sm2"]));
    assert!(services.tracker.in_flight.lock().is_empty());

    let sent = services.notifier.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, r#"{"endpoint":"https://push.example.com"}"#);
}

#[tokio::test]
async fn test_delete_and_create() {
    let services = TestServices::new();
    let mut body = register_body(&services, "delete_and_create");
    body["title"] = json!("Mine");

    let resp = handle_event(&services.state(), Some(body)).await;

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.message(), Some("Mylist deleted and created successfully"));
    let prepared = services.registrar.prepared.lock();
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].0.password, "hunter2");
    assert_eq!(prepared[0].1.as_deref(), Some("Mine"));
}

#[tokio::test]
async fn test_delete_and_create_failure_is_server_error() {
    let services = TestServices::with_registrar(FakeRegistrar {
        fail_prepare: true,
        ..FakeRegistrar::default()
    });
    let body = register_body(&services, "delete_and_create");

    let resp = handle_event(&services.state(), Some(body)).await;

    assert_eq!(resp.status_code, 500);
    assert!(resp.error_message().unwrap().contains("Authentication failed"));
    assert!(resp.body.get("detail").is_none());
}

#[tokio::test]
async fn test_unknown_action() {
    let services = TestServices::new();
    let body = register_body(&services, "explode");
    let resp = handle_event(&services.state(), Some(body)).await;
    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some("Unknown action: explode"));
}

#[tokio::test]
async fn test_chain_first_request() {
    let services = TestServices::new();
    let body = json!({
        "action": "chain_register",
        "email": "user@example.com",
        "password": services.encrypt("hunter2"),
        "id_list": numbered(100),
        "subscription": {"endpoint": "https://push.example.com"},
    });

    let resp = handle_event(&services.state(), Some(body)).await;

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.message(), Some("Registration process started"));
    assert_eq!(resp.body["total_videos"], 100);
    assert!(resp.body["user_message"].is_string());
    let setup = services.transport.requests.lock().pop_front().unwrap();
    assert!(setup.is_delete_and_create_request);
}

#[tokio::test]
async fn test_chain_runs_to_completion() {
    let services = TestServices::new();
    let state = services.state();
    let body = json!({
        "action": "chain_register",
        "email": "user@example.com",
        "password": services.encrypt("hunter2"),
        "id_list": numbered(100),
        "subscription": "{}",
    });
    handle_event(&state, Some(body)).await;

    let mut processed = Vec::new();
    loop {
        let next = services.transport.requests.lock().pop_front();
        let Some(next) = next else { break };
        let resp = handle_event(&state, Some(serde_json::to_value(&next).unwrap())).await;
        assert_eq!(resp.message(), Some("Chain registration step completed"));
        processed.push(resp.body["processed_count"].as_u64().unwrap());
    }

    assert_eq!(processed, vec![30, 30, 30, 10]);
    assert_eq!(services.registrar.prepared.lock().len(), 1);
    assert_eq!(services.notifier.sent.lock().len(), 1);
}

#[tokio::test]
async fn test_chain_bad_password() {
    let services = TestServices::new();
    let body = json!({
        "action": "chain_register",
        "email": "user@example.com",
        "password": "not-a-payload",
        "id_list": ["sm1"],
    });

    let resp = handle_event(&services.state(), Some(body)).await;

    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some("Failed to decrypt password"));
    assert!(services.transport.requests.lock().is_empty());
}

#[tokio::test]
async fn test_chain_invalid_request() {
    let services = TestServices::new();
    let resp = handle_event(
        &services.state(),
        Some(json!({"action": "chain_register", "id_list": ["sm1"]})),
    )
    .await;
    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some("Invalid chain request"));
}

#[tokio::test]
async fn test_chain_null_fields_fall_back_to_defaults() {
    let services = TestServices::new();
    let state = services.state();
    let body = json!({
        "action": "chain_register",
        "email": "user@example.com",
        "password": services.encrypt("hunter2"),
        "id_list": ["sm1", "sm2"],
        "title": null,
        "failed_ids": null,
        "subscription": null,
    });

    let resp = handle_event(&state, Some(body)).await;
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.message(), Some("Registration process started"));

    let setup = services.transport.requests.lock().pop_front().unwrap();
    let resp = handle_event(&state, Some(serde_json::to_value(&setup).unwrap())).await;
    assert_eq!(resp.status_code, 200);

    let prepared = services.registrar.prepared.lock();
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].1.as_deref(), Some(""));
}

#[test]
fn test_normalize_drops_null_defaults() {
    let body = normalize(json!({
        "title": null,
        "failed_ids": null,
        "id_list": ["sm1"],
        "is_first_request": null,
    }));
    assert!(body.get("title").is_none());
    assert!(body.get("failed_ids").is_none());
    assert!(body.get("is_first_request").is_none());
    assert_eq!(body["id_list"], json!(["sm1"]));
}

#[tokio::test]
async fn test_envelope_body_string() {
    let services = TestServices::new();
    let inner = json!({"health_check": true}).to_string();
    let resp = handle_event(&services.state(), Some(json!({ "body": inner }))).await;
    assert_eq!(resp.message(), Some("Lambda is ready"));
}

#[tokio::test]
async fn test_envelope_invalid_json() {
    let services = TestServices::new();
    let resp = handle_event(&services.state(), Some(json!({"body": "{nope"}))).await;
    assert_eq!(resp.status_code, 400);
    assert_eq!(resp.error_message(), Some("Invalid JSON body"));
}

#[test]
fn test_normalize_stringifies_opaque_fields() {
    let body = normalize(json!({
        "subscription": {"keys": {"auth": "x"}},
        "chunk_index": 2,
        "uuid": null,
    }));
    assert_eq!(body["subscription"], json!(r#"{"keys":{"auth":"x"}}"#));
    assert_eq!(body["chunk_index"], json!("2"));
    assert!(body.get("uuid").is_none());
}

#[test]
fn test_is_truthy() {
    assert!(is_truthy(Some(&json!(true))));
    assert!(is_truthy(Some(&json!(1))));
    assert!(is_truthy(Some(&json!("yes"))));
    assert!(!is_truthy(Some(&json!(false))));
    assert!(!is_truthy(Some(&json!(0))));
    assert!(!is_truthy(Some(&json!(""))));
    assert!(!is_truthy(None));
}

#[tokio::test]
async fn test_request_count_increments() {
    let services = TestServices::new();
    let state = services.state();
    handle_event(&state, None).await;
    handle_event(&state, Some(json!({"health_check": true}))).await;
    assert_eq!(state.request_count(), 2);
}
