//! HTTP-level tests for the `/swap-requests` endpoints.
//!
//! Walks the propose / accept / reject flow end to end and checks each
//! precondition failure maps to the right status and error code.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_slot, delete, get, post_json, token_for, TestApp};
use serde_json::json;
use slotswap_core::notification::{KIND_SWAP_ACCEPTED, KIND_SWAP_REQUEST};

const ALICE: i64 = 1;
const BOB: i64 = 2;
const CAROL: i64 = 3;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Alice and Bob each offer one slot. Returns `(alice_slot, bob_slot)`.
async fn offered_pair(app: &TestApp) -> (i64, i64) {
    let a = create_slot(&app.router, &token_for(ALICE), "Alice's slot", Some("SWAPPABLE")).await;
    let b = create_slot(&app.router, &token_for(BOB), "Bob's slot", Some("SWAPPABLE")).await;
    (a, b)
}

async fn propose(app: &TestApp, requester: i64, mine: i64, theirs: i64) -> axum::response::Response {
    post_json(
        &app.router,
        "/api/v1/swap-requests",
        Some(&token_for(requester)),
        json!({ "my_slot_id": mine, "their_slot_id": theirs }),
    )
    .await
}

async fn respond(app: &TestApp, responder: i64, request_id: i64, accept: bool) -> axum::response::Response {
    post_json(
        &app.router,
        &format!("/api/v1/swap-requests/{request_id}/response"),
        Some(&token_for(responder)),
        json!({ "accept": accept }),
    )
    .await
}

async fn slot_statuses(app: &TestApp, user: i64) -> Vec<(i64, String)> {
    let json = body_json(get(&app.router, "/api/v1/slots/mine", Some(&token_for(user))).await).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["id"].as_i64().unwrap(), s["status"].as_str().unwrap().to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn propose_returns_pending_request() {
    let mut app = build_test_app();
    let (a, b) = offered_pair(&app).await;

    let response = propose(&app, ALICE, a, b).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["requester_id"], ALICE);
    assert_eq!(json["responder_id"], BOB);

    assert_eq!(slot_statuses(&app, ALICE).await, vec![(a, "SWAP_PENDING".to_string())]);
    assert_eq!(slot_statuses(&app, BOB).await, vec![(b, "SWAP_PENDING".to_string())]);

    let event = app.next_event().expect("responder should be notified");
    assert_eq!(event.event_type, KIND_SWAP_REQUEST);
    assert_eq!(event.recipient_user_id, Some(BOB));
}

#[tokio::test]
async fn accept_swaps_owners() {
    let mut app = build_test_app();
    let (a, b) = offered_pair(&app).await;
    let request = body_json(propose(&app, ALICE, a, b).await).await;
    let request_id = request["id"].as_i64().unwrap();

    let response = respond(&app, BOB, request_id, true).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ACCEPTED" }));

    assert_eq!(slot_statuses(&app, ALICE).await, vec![(b, "BUSY".to_string())]);
    assert_eq!(slot_statuses(&app, BOB).await, vec![(a, "BUSY".to_string())]);

    app.next_event();
    let event = app.next_event().expect("requester should be notified");
    assert_eq!(event.event_type, KIND_SWAP_ACCEPTED);
    assert_eq!(event.recipient_user_id, Some(ALICE));
}

#[tokio::test]
async fn reject_reoffers_both_slots() {
    let app = build_test_app();
    let (a, b) = offered_pair(&app).await;
    let request_id = body_json(propose(&app, ALICE, a, b).await).await["id"]
        .as_i64()
        .unwrap();

    let response = respond(&app, BOB, request_id, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "REJECTED");

    assert_eq!(slot_statuses(&app, ALICE).await, vec![(a, "SWAPPABLE".to_string())]);
    assert_eq!(slot_statuses(&app, BOB).await, vec![(b, "SWAPPABLE".to_string())]);
}

#[tokio::test]
async fn second_resolution_is_invalid_state() {
    let app = build_test_app();
    let (a, b) = offered_pair(&app).await;
    let request_id = body_json(propose(&app, ALICE, a, b).await).await["id"]
        .as_i64()
        .unwrap();
    respond(&app, BOB, request_id, false).await;

    let response = respond(&app, BOB, request_id, true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");
    assert_eq!(slot_statuses(&app, ALICE).await, vec![(a, "SWAPPABLE".to_string())]);
}

#[tokio::test]
async fn list_requests_shows_both_directions_with_slots() {
    let app = build_test_app();
    let (a, b) = offered_pair(&app).await;
    let request_id = body_json(propose(&app, ALICE, a, b).await).await["id"]
        .as_i64()
        .unwrap();

    let bob = body_json(get(&app.router, "/api/v1/swap-requests", Some(&token_for(BOB))).await).await;
    assert_eq!(bob["outgoing"], json!([]));
    let incoming = &bob["incoming"][0];
    assert_eq!(incoming["id"], request_id);
    assert_eq!(incoming["status"], "PENDING");
    assert_eq!(incoming["my_slot"]["title"], "Alice's slot");
    assert_eq!(incoming["their_slot"]["id"], b);

    let alice =
        body_json(get(&app.router, "/api/v1/swap-requests", Some(&token_for(ALICE))).await).await;
    assert_eq!(alice["incoming"], json!([]));
    assert_eq!(alice["outgoing"][0]["id"], request_id);
}

// ---------------------------------------------------------------------------
// Precondition failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proposing_with_foreign_slot_is_forbidden() {
    let app = build_test_app();
    let (a, b) = offered_pair(&app).await;

    let response = propose(&app, CAROL, a, b).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn proposing_with_self_is_invalid_request() {
    let app = build_test_app();
    let alice = token_for(ALICE);
    let a1 = create_slot(&app.router, &alice, "One", Some("SWAPPABLE")).await;
    let a2 = create_slot(&app.router, &alice, "Two", Some("SWAPPABLE")).await;

    let response = propose(&app, ALICE, a1, a2).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn proposing_busy_slot_is_invalid_state() {
    let app = build_test_app();
    let a = create_slot(&app.router, &token_for(ALICE), "Offered", Some("SWAPPABLE")).await;
    let b = create_slot(&app.router, &token_for(BOB), "Busy", None).await;

    let response = propose(&app, ALICE, a, b).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");
}

#[tokio::test]
async fn proposing_missing_slot_is_not_found() {
    let app = build_test_app();
    let a = create_slot(&app.router, &token_for(ALICE), "Offered", Some("SWAPPABLE")).await;

    let response = propose(&app, ALICE, a, 9_999).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_responder_can_resolve() {
    let app = build_test_app();
    let (a, b) = offered_pair(&app).await;
    let request_id = body_json(propose(&app, ALICE, a, b).await).await["id"]
        .as_i64()
        .unwrap();

    let response = respond(&app, ALICE, request_id, true).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_slot_in_negotiation_conflicts() {
    let app = build_test_app();
    let (a, b) = offered_pair(&app).await;
    assert_eq!(propose(&app, ALICE, a, b).await.status(), StatusCode::CREATED);

    let response = delete(&app.router, &format!("/api/v1/slots/{a}"), Some(&token_for(ALICE))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}
