//! HTTP-level tests for the `/slots` and `/swappable-slots` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_slot, delete, get, post_json, put_json, token_for};
use serde_json::json;

const ALICE: i64 = 1;
const BOB: i64 = 2;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/slots/mine", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/slots/mine", Some("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Create / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_slot_defaults_to_busy() {
    let app = build_test_app();
    let alice = token_for(ALICE);

    let response = post_json(
        &app.router,
        "/api/v1/slots",
        Some(&alice),
        common::slot_body("Team sync", 1, None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Team sync");
    assert_eq!(json["status"], "BUSY");
    assert_eq!(json["owner_id"], ALICE);
}

#[tokio::test]
async fn create_slot_rejects_inverted_window() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    let mut body = common::slot_body("Backwards", 1, None);
    let start = body["start_time"].clone();
    body["start_time"] = body["end_time"].clone();
    body["end_time"] = start;

    let response = post_json(&app.router, "/api/v1/slots", Some(&alice), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_slot_rejects_pending_status() {
    let app = build_test_app();
    let alice = token_for(ALICE);

    let response = post_json(
        &app.router,
        "/api/v1/slots",
        Some(&alice),
        common::slot_body("Sneaky", 1, Some("SWAP_PENDING")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_mine_is_sorted_and_enveloped() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    for (title, days) in [("later", 3), ("sooner", 1)] {
        let response = post_json(
            &app.router,
            "/api/v1/slots",
            Some(&alice),
            common::slot_body(title, days, None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    create_slot(&app.router, &token_for(BOB), "not mine", None).await;

    let response = get(&app.router, "/api/v1/slots/mine", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "later"]);
}

#[tokio::test]
async fn swappable_slots_exclude_own_and_busy() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    let bob = token_for(BOB);
    create_slot(&app.router, &alice, "Alice offers", Some("SWAPPABLE")).await;
    create_slot(&app.router, &bob, "Bob offers", Some("SWAPPABLE")).await;
    create_slot(&app.router, &bob, "Bob busy", None).await;

    let response = get(&app.router, "/api/v1/swappable-slots", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Bob offers");
}

// ---------------------------------------------------------------------------
// Update / status / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_slot_edits_title() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    let id = create_slot(&app.router, &alice, "Old", None).await;

    let response = put_json(
        &app.router,
        &format!("/api/v1/slots/{id}"),
        Some(&alice),
        json!({ "title": "New" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "New");
}

#[tokio::test]
async fn update_foreign_slot_is_not_found() {
    let app = build_test_app();
    let id = create_slot(&app.router, &token_for(ALICE), "Mine", None).await;

    let response = put_json(
        &app.router,
        &format!("/api/v1/slots/{id}"),
        Some(&token_for(BOB)),
        json!({ "title": "Stolen" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn set_status_toggles_and_guards() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    let id = create_slot(&app.router, &alice, "Mine", None).await;
    let uri = format!("/api/v1/slots/{id}/status");

    let response = put_json(&app.router, &uri, Some(&alice), json!({ "status": "SWAPPABLE" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "SWAPPABLE");

    let response =
        put_json(&app.router, &uri, Some(&alice), json!({ "status": "SWAP_PENDING" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");

    let response = put_json(
        &app.router,
        &uri,
        Some(&token_for(BOB)),
        json!({ "status": "BUSY" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_slot_returns_ok() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    let id = create_slot(&app.router, &alice, "Doomed", None).await;

    let response = delete(&app.router, &format!("/api/v1/slots/{id}"), Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true }));

    let again = delete(&app.router, &format!("/api/v1/slots/{id}"), Some(&alice)).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_request_id() {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/slots/mine", Some(&token_for(ALICE))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(&app.router, "/this-route-does-not-exist", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
