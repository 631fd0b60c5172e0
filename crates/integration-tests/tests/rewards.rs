//! Integration tests for the reward catalog and redemption flow.
//!
//! Each test boots the full API in-process with a freshly seeded store and
//! talks to it over HTTP. No external services are required.
//!
//! Run with: cargo test -p levelup-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use levelup_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestServer};

/// Log the seeded admin in and return the account.
async fn login_admin(server: &TestServer) -> Value {
    let resp = server
        .client()
        .post(server.url("/api/users/login"))
        .json(&json!({ "loginIdentifier": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to log the admin in");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse admin account")
}

/// Register a customer and return the created account.
async fn register_user(server: &TestServer, email: &str) -> Value {
    let resp = server
        .client()
        .post(server.url("/api/users/register"))
        .json(&json!({
            "name": "Lucas Soto",
            "email": email,
            "password": "password123",
            "address": {
                "street": "Calle Falsa 123",
                "city": "Santiago",
                "region": "Metropolitana"
            }
        }))
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse created account")
}

/// The redeemable catalog.
async fn active_rewards(server: &TestServer) -> Vec<Value> {
    let resp = server
        .client()
        .get(server.url("/api/rewards"))
        .send()
        .await
        .expect("Failed to list rewards");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse rewards")
}

/// One seeded reward, looked up by name.
async fn seeded_reward(server: &TestServer, name: &str) -> Value {
    active_rewards(server)
        .await
        .into_iter()
        .find(|r| r.get("name").and_then(Value::as_str) == Some(name))
        .expect("seeded reward present")
}

/// Redeem a reward for a user and return the raw response.
async fn redeem(server: &TestServer, reward_id: &str, body: Value) -> reqwest::Response {
    server
        .client()
        .post(server.url(&format!("/api/rewards/{reward_id}/redeem")))
        .json(&body)
        .send()
        .await
        .expect("Failed to call redeem")
}

fn id_of(entity: &Value) -> String {
    entity
        .get("id")
        .and_then(Value::as_str)
        .expect("entity has an id")
        .to_owned()
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[tokio::test]
async fn test_seeded_catalog_is_fully_active() {
    let server = TestServer::spawn().await;

    let rewards = active_rewards(&server).await;
    assert_eq!(rewards.len(), 7);
    assert!(
        rewards
            .iter()
            .all(|r| r.get("isActive").and_then(Value::as_bool) == Some(true))
    );

    let taza = rewards.first().expect("seeded rewards");
    assert_eq!(
        taza.get("name").and_then(Value::as_str),
        Some("Taza Gamer Edición Limitada")
    );
    assert_eq!(taza.get("type").and_then(Value::as_str), Some("Producto"));
    assert_eq!(taza.get("pointsCost").and_then(Value::as_i64), Some(2_800));
}

#[tokio::test]
async fn test_create_applies_defaults_and_validations() {
    let server = TestServer::spawn().await;

    // Two-character name.
    let resp = server
        .client()
        .post(server.url("/api/rewards/admin"))
        .json(&json!({ "name": "Ta", "pointsCost": 100, "imageUrl": "/images/t.png" }))
        .send()
        .await
        .expect("Failed to call create");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing image.
    let resp = server
        .client()
        .post(server.url("/api/rewards/admin"))
        .json(&json!({ "name": "Poster Holográfico", "pointsCost": 100 }))
        .send()
        .await
        .expect("Failed to call create");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client()
        .post(server.url("/api/rewards/admin"))
        .json(&json!({
            "name": "Poster Holográfico",
            "pointsCost": 500,
            "imageUrl": "/images/poster.png"
        }))
        .send()
        .await
        .expect("Failed to create reward");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let reward: Value = resp.json().await.expect("Failed to parse reward");
    assert_eq!(reward.get("type").and_then(Value::as_str), Some("Producto"));
    assert_eq!(reward.get("season").and_then(Value::as_str), Some("Standard"));
    assert_eq!(reward.get("isActive").and_then(Value::as_bool), Some(true));
}

#[tokio::test]
async fn test_update_delete_and_admin_listing() {
    let server = TestServer::spawn().await;
    let taza = seeded_reward(&server, "Taza Gamer Edición Limitada").await;
    let id = id_of(&taza);

    // A zero cost is rejected without touching the reward.
    let resp = server
        .client()
        .put(server.url(&format!("/api/rewards/{id}/admin")))
        .json(&json!({ "pointsCost": 0 }))
        .send()
        .await
        .expect("Failed to call update");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Disabling hides it from the public catalog but not from the admin one.
    let resp = server
        .client()
        .put(server.url(&format!("/api/rewards/{id}/admin")))
        .json(&json!({ "isActive": false }))
        .send()
        .await
        .expect("Failed to disable reward");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(active_rewards(&server).await.len(), 6);
    let resp = server
        .client()
        .get(server.url("/api/rewards/admin"))
        .send()
        .await
        .expect("Failed to list rewards");
    let all: Vec<Value> = resp.json().await.expect("Failed to parse rewards");
    assert_eq!(all.len(), 7);

    let resp = server
        .client()
        .delete(server.url(&format!("/api/rewards/{id}/admin")))
        .send()
        .await
        .expect("Failed to delete reward");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server
        .client()
        .delete(server.url(&format!("/api/rewards/{id}/admin")))
        .send()
        .await
        .expect("Failed to call delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Redemption Tests
// ============================================================================

#[tokio::test]
async fn test_redeem_debits_and_records() {
    let server = TestServer::spawn().await;
    let admin = login_admin(&server).await;
    let admin_id = id_of(&admin);
    let taza = seeded_reward(&server, "Taza Gamer Edición Limitada").await;

    let resp = redeem(&server, &id_of(&taza), json!({ "userId": admin_id })).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse redemption");
    let balance = body
        .get("user")
        .and_then(|u| u.get("points"))
        .and_then(Value::as_i64);
    assert_eq!(balance, Some(97_200));
    let cost = body
        .get("redemption")
        .and_then(|r| r.get("reward"))
        .and_then(|r| r.get("pointsCost"))
        .and_then(Value::as_i64);
    assert_eq!(cost, Some(2_800));

    // The redemption shows up in the account history.
    let resp = server
        .client()
        .get(server.url(&format!("/api/users/{admin_id}/redemptions")))
        .send()
        .await
        .expect("Failed to list redemptions");
    assert_eq!(resp.status(), StatusCode::OK);
    let redemptions: Vec<Value> = resp.json().await.expect("Failed to parse redemptions");
    assert_eq!(redemptions.len(), 1);

    // And in the ledger, as a debit.
    let resp = server
        .client()
        .get(server.url(&format!("/api/users/{admin_id}/points/history")))
        .send()
        .await
        .expect("Failed to fetch history");
    let history: Vec<Value> = resp.json().await.expect("Failed to parse history");
    assert_eq!(history.len(), 1);
    let entry = history.first().expect("one entry");
    assert_eq!(entry.get("delta").and_then(Value::as_i64), Some(-2_800));
    assert_eq!(
        entry
            .get("source")
            .and_then(|s| s.get("type"))
            .and_then(Value::as_str),
        Some("redemptionDebit")
    );
}

#[tokio::test]
async fn test_redeem_without_identity_is_unauthorized() {
    let server = TestServer::spawn().await;
    let taza = seeded_reward(&server, "Taza Gamer Edición Limitada").await;

    let resp = redeem(&server, &id_of(&taza), json!({})).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_redeem_with_insufficient_points_changes_nothing() {
    let server = TestServer::spawn().await;
    let user = register_user(&server, "lucas@gmail.com").await;
    let user_id = id_of(&user);
    let mousepad = seeded_reward(&server, "Mousepad RGB Extendido").await;

    // A fresh registration holds 100 points; the mousepad costs 18.000.
    let resp = redeem(&server, &id_of(&mousepad), json!({ "userId": user_id })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client()
        .get(server.url(&format!("/api/users/{user_id}/redemptions")))
        .send()
        .await
        .expect("Failed to list redemptions");
    let redemptions: Vec<Value> = resp.json().await.expect("Failed to parse redemptions");
    assert!(redemptions.is_empty());

    let resp = server
        .client()
        .get(server.url(&format!("/api/users/{user_id}/points/history")))
        .send()
        .await
        .expect("Failed to fetch history");
    let history: Vec<Value> = resp.json().await.expect("Failed to parse history");
    // Only the registration bonus; the failed debit left no entry.
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_redeem_inactive_reward_conflicts_regardless_of_balance() {
    let server = TestServer::spawn().await;
    let admin = login_admin(&server).await;
    let taza = seeded_reward(&server, "Taza Gamer Edición Limitada").await;
    let id = id_of(&taza);

    let resp = server
        .client()
        .put(server.url(&format!("/api/rewards/{id}/admin")))
        .json(&json!({ "isActive": false }))
        .send()
        .await
        .expect("Failed to disable reward");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = redeem(&server, &id, json!({ "userId": id_of(&admin) })).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_redeem_unknown_reward_is_not_found() {
    let server = TestServer::spawn().await;
    let admin = login_admin(&server).await;

    let resp = redeem(
        &server,
        &Uuid::new_v4().to_string(),
        json!({ "userId": id_of(&admin) }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_redemption_list_unknown_user_is_not_found() {
    let server = TestServer::spawn().await;

    let resp = server
        .client()
        .get(server.url(&format!("/api/users/{}/redemptions", Uuid::new_v4())))
        .send()
        .await
        .expect("Failed to call redemptions");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
