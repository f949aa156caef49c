//! End-to-end tests of the proposal API over real HTTP.

use chrono::{DateTime, Utc};
use serde_json::json;

use valentine_server_integration::spawn_server;

fn romeo() -> serde_json::Value {
    json!({
        "yourName": "Romeo",
        "partnerName": "Juliet",
        "phoneNumber": "919876543210"
    })
}

fn timestamp(value: &serde_json::Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| panic!("not a timestamp: {value}"))
}

#[tokio::test]
async fn test_full_lifecycle() {
    let server = spawn_server().await;

    // Create
    let resp = server.create(&romeo()).await;
    assert_eq!(resp.status(), 201);
    let created: serde_json::Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 8);
    assert_eq!(created["yourName"], "Romeo");
    assert_eq!(created["partnerName"], "Juliet");
    assert_eq!(created["phoneNumber"], "919876543210");
    assert_eq!(created["accepted"], false);
    assert!(created["acceptedAt"].is_null());
    let created_at = timestamp(&created["createdAt"]);

    // Get returns the same record
    let resp = server.get(&id).await;
    assert_eq!(resp.status(), 200);
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    // Accept
    let resp = server.accept(&id).await;
    assert_eq!(resp.status(), 200);
    let accepted: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        accepted,
        json!({
            "success": true,
            "phoneNumber": "919876543210",
            "partnerName": "Juliet"
        })
    );

    // Get now shows the accepted state
    let resp = server.get(&id).await;
    let after: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(after["accepted"], true);
    assert!(timestamp(&after["acceptedAt"]) >= created_at);
}

#[tokio::test]
async fn test_short_phone_number_rejected() {
    let server = spawn_server().await;
    let resp = server
        .create(&json!({
            "yourName": "Romeo",
            "partnerName": "Juliet",
            "phoneNumber": "12"
        }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "phoneNumber");
    assert_eq!(body["message"], "Phone number must be between 10 and 15 digits");
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let server = spawn_server().await;
    let resp = server
        .create(&json!({
            "yourName": "Romeo",
            "partnerName": "Juliet"
        }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("phoneNumber"));
}

#[tokio::test]
async fn test_custom_message_round_trip() {
    let server = spawn_server().await;

    let mut input = romeo();
    input["customMessage"] = json!("Meet me at the balcony");
    let created: serde_json::Value = server.create(&input).await.json().await.unwrap();
    assert_eq!(created["customMessage"], "Meet me at the balcony");

    // Omitted message falls back to the fixed default
    let defaulted: serde_json::Value = server.create(&romeo()).await.json().await.unwrap();
    assert_eq!(
        defaulted["customMessage"],
        valentine_common::proposal::DEFAULT_MESSAGE
    );
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let server = spawn_server().await;

    for resp in [server.get("nope1234").await, server.accept("nope1234").await] {
        assert_eq!(resp.status(), 404);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "message": "Proposal not found" }));
    }
}

#[tokio::test]
async fn test_reaccept_keeps_original_timestamp() {
    let server = spawn_server().await;
    let created: serde_json::Value = server.create(&romeo()).await.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    assert_eq!(server.accept(id).await.status(), 200);
    let first: serde_json::Value = server.get(id).await.json().await.unwrap();

    // Accepting again succeeds but does not move acceptedAt.
    assert_eq!(server.accept(id).await.status(), 200);
    let second: serde_json::Value = server.get(id).await.json().await.unwrap();
    assert_eq!(second["acceptedAt"], first["acceptedAt"]);
}

#[tokio::test]
async fn test_health() {
    let server = spawn_server().await;
    let resp = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
