//! Warm transfer and disconnect endpoint integration tests.

use wt_test_utils::{RoomTokenAssertions, TestWtServer, TEST_LIVEKIT_URL};

fn transfer_body() -> serde_json::Value {
    serde_json::json!({
        "caller_id": "caller-1",
        "agent_a_id": "agent-a",
        "agent_b_id": "agent-b",
        "current_room": "support-42",
        "conversation_context": "Customer wants to upgrade their plan."
    })
}

#[tokio::test]
async fn test_warm_transfer_returns_tokens_for_new_room() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/livekit/warm-transfer", server.url()))
        .json(&transfer_body())
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    let new_room = body["new_room"].as_str().expect("new_room should be a string");
    assert!(new_room.starts_with("transfer-"));
    assert_ne!(new_room, "support-42");
    assert_eq!(body["livekit_url"], TEST_LIVEKIT_URL);

    body["caller_token"]
        .as_str()
        .expect("caller_token should be a string")
        .assert_valid_room_token()
        .assert_for_identity("caller-1")
        .assert_for_room(new_room);

    body["agent_b_token"]
        .as_str()
        .expect("agent_b_token should be a string")
        .assert_valid_room_token()
        .assert_for_identity("agent-b")
        .assert_for_room(new_room);

    Ok(())
}

#[tokio::test]
async fn test_warm_transfers_get_distinct_rooms() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/livekit/warm-transfer", server.url());

    let first: serde_json::Value = client
        .post(&url)
        .json(&transfer_body())
        .send()
        .await?
        .json()
        .await?;
    let second: serde_json::Value = client
        .post(&url)
        .json(&transfer_body())
        .send()
        .await?
        .json()
        .await?;

    assert_ne!(first["new_room"], second["new_room"]);

    Ok(())
}

#[tokio::test]
async fn test_warm_transfer_missing_field_returns_400() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn().await?;
    let client = reqwest::Client::new();

    let mut body = transfer_body();
    body.as_object_mut()
        .expect("body should be an object")
        .remove("agent_b_id");

    let response = client
        .post(format!("{}/livekit/warm-transfer", server.url()))
        .json(&body)
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("agent_b_id")));

    Ok(())
}

#[tokio::test]
async fn test_warm_transfer_without_credentials_returns_500() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn_unconfigured().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/livekit/warm-transfer", server.url()))
        .json(&transfer_body())
        .send()
        .await?;
    assert_eq!(response.status(), 500);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    assert!(body.get("caller_token").is_none());

    Ok(())
}

#[tokio::test]
async fn test_disconnect_acknowledges() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn_unconfigured().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/livekit/disconnect", server.url()))
        .json(&serde_json::json!({"room_name": "support-42", "participant_id": "agent-a"}))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["message"],
        "Participant agent-a disconnected from room support-42"
    );

    Ok(())
}

#[tokio::test]
async fn test_disconnect_message_uses_trimmed_values() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn_unconfigured().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/livekit/disconnect", server.url()))
        .json(&serde_json::json!({"room_name": "  support-42\n", "participant_id": " agent-a "}))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["message"],
        "Participant agent-a disconnected from room support-42"
    );

    Ok(())
}

#[tokio::test]
async fn test_disconnect_missing_participant_returns_400() -> Result<(), anyhow::Error> {
    let server = TestWtServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/livekit/disconnect", server.url()))
        .json(&serde_json::json!({"room_name": "support-42"}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    Ok(())
}
