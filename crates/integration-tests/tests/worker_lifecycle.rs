//! Integration tests for worker self-service and moderation.
//!
//! Covers registration, the admin approve/publish cycle, and how a worker's
//! own edits interact with moderation.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use seva_sangam_integration_tests::{Call, TestContext, edit_form, registration};

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_registration_starts_pending_and_hidden() {
    let ctx = TestContext::new();

    let response = Call::post("/api/me/worker")
        .principal("worker-1")
        .json(registration("Anil Das", "plumber", "Guwahati", "full-time"))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["profile"]["status"], "pending");
    assert_eq!(response.body["profile"]["published"], false);
    assert_eq!(response.body["publicly_visible"], false);
    assert_eq!(response.body["category_label"], "Plumber");
}

#[tokio::test]
async fn test_second_registration_conflicts() {
    let ctx = TestContext::new();
    ctx.register_worker(
        "worker-1",
        registration("Anil Das", "plumber", "Guwahati", "full-time"),
    )
    .await;

    let response = Call::post("/api/me/worker")
        .principal("worker-1")
        .json(registration("Anil Das", "plumber", "Guwahati", "full-time"))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_registration_requires_identity() {
    let ctx = TestContext::new();

    let response = Call::post("/api/me/worker")
        .json(registration("Anil Das", "plumber", "Guwahati", "full-time"))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_rejects_bad_phone() {
    let ctx = TestContext::new();
    let mut form = registration("Anil Das", "plumber", "Guwahati", "full-time");
    form["phone_number"] = json!("12");

    let response = Call::post("/api/me/worker")
        .principal("worker-1")
        .json(form)
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_without_profile_is_not_found() {
    let ctx = TestContext::new();

    let response = Call::get("/api/me/worker")
        .principal("stranger")
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Moderation
// ============================================================================

#[tokio::test]
async fn test_approved_and_published_worker_becomes_visible() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;

    ctx.approve_and_publish(&cookie, &id).await;

    let page = Call::get(format!("/api/workers/{id}"))
        .send(&ctx.storefront)
        .await;
    assert_eq!(page.status, StatusCode::OK);

    let dashboard = Call::get("/api/me/worker")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(dashboard.body["profile"]["status"], "approved");
    assert_eq!(dashboard.body["publicly_visible"], true);
}

#[tokio::test]
async fn test_publishing_pending_worker_conflicts() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;

    let response = Call::post(format!("/api/workers/{id}/publish"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rejected_worker_is_unpublished() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;
    ctx.approve_and_publish(&cookie, &id).await;

    let response = Call::post(format!("/api/workers/{id}/reject"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "rejected");
    assert_eq!(response.body["published"], false);
    assert_eq!(response.body["publicly_visible"], false);
}

#[tokio::test]
async fn test_admin_lists_workers_by_status() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let approved = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;
    ctx.register_worker(
        "worker-2",
        registration("Bina Roy", "electrician", "Jorhat", "part-time"),
    )
    .await;
    ctx.approve_and_publish(&cookie, &approved).await;

    let pending = Call::get("/api/workers?status=pending")
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(pending.status, StatusCode::OK);
    let pending = pending.body.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["full_name"], "Bina Roy");

    let bad = Call::get("/api/workers?status=sleeping")
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_removed_worker_is_gone_for_admin() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;

    let removed = Call::delete(format!("/api/workers/{id}"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let show = Call::get(format!("/api/workers/{id}"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(show.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Self-service edits
// ============================================================================

#[tokio::test]
async fn test_major_edit_sends_profile_back_to_review() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;
    ctx.approve_and_publish(&cookie, &id).await;

    let response = Call::put("/api/me/worker")
        .principal("worker-1")
        .json(edit_form("Anil Das", "Dibrugarh", "full-time", 3))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["profile"]["status"], "pending");
    assert_eq!(response.body["profile"]["published"], false);
    assert_eq!(response.body["profile"]["location"]["city"], "Dibrugarh");
    assert!(response.body["notice"].is_string());

    let page = Call::get(format!("/api/workers/{id}"))
        .send(&ctx.storefront)
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_minor_edit_keeps_approval() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;
    ctx.approve_and_publish(&cookie, &id).await;

    let response = Call::put("/api/me/worker")
        .principal("worker-1")
        .json(edit_form("Anil Das", "Guwahati", "full-time", 9))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["profile"]["status"], "approved");
    assert_eq!(response.body["profile"]["published"], true);
    assert_eq!(response.body["profile"]["years_experience"], 9);
    assert!(response.body.get("notice").is_none_or(serde_json::Value::is_null));
}

#[tokio::test]
async fn test_minor_edit_after_viewing_pending_dashboard_keeps_approval() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;

    // Seen while pending, before the admin acts.
    let before = Call::get("/api/me/worker")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(before.body["profile"]["status"], "pending");

    ctx.approve_and_publish(&cookie, &id).await;

    let after = Call::get("/api/me/worker")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(after.body["profile"]["status"], "approved");
    assert_eq!(after.body["publicly_visible"], true);

    let response = Call::put("/api/me/worker")
        .principal("worker-1")
        .json(edit_form("Anil Das", "Guwahati", "full-time", 9))
        .send(&ctx.storefront)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["profile"]["status"], "approved");
    assert_eq!(response.body["profile"]["published"], true);

    let stored = Call::get(format!("/api/workers/{id}"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(stored.body["status"], "approved");
    assert_eq!(stored.body["published"], true);
}

#[tokio::test]
async fn test_edit_without_profile_is_not_found() {
    let ctx = TestContext::new();

    let response = Call::put("/api/me/worker")
        .principal("stranger")
        .json(edit_form("Nobody", "Guwahati", "full-time", 1))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Account profile
// ============================================================================

#[tokio::test]
async fn test_account_profile_setup_then_rename() {
    let ctx = TestContext::new();

    let missing = Call::get("/api/me/profile")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let saved = Call::put("/api/me/profile")
        .principal("worker-1")
        .json(json!({ "name": "  Meena Devi " }))
        .send(&ctx.storefront)
        .await;
    assert_eq!(saved.status, StatusCode::OK, "{:?}", saved.body);
    assert_eq!(saved.body["name"], "Meena Devi");
    assert_eq!(saved.body["role"], "worker");

    // The first read was cached as absent; saving must replace it.
    let shown = Call::get("/api/me/profile")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(shown.status, StatusCode::OK);
    assert_eq!(shown.body["name"], "Meena Devi");

    Call::put("/api/me/profile")
        .principal("worker-1")
        .json(json!({ "name": "Meena", "role": "worker" }))
        .send(&ctx.storefront)
        .await;
    let renamed = Call::get("/api/me/profile")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(renamed.body["name"], "Meena");

    let other = Call::get("/api/me/profile")
        .principal("worker-2")
        .send(&ctx.storefront)
        .await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_profile_requires_identity_and_name() {
    let ctx = TestContext::new();

    let anonymous = Call::put("/api/me/profile")
        .json(json!({ "name": "Meena" }))
        .send(&ctx.storefront)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let blank = Call::put("/api/me/profile")
        .principal("worker-1")
        .json(json!({ "name": "   " }))
        .send(&ctx.storefront)
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}
