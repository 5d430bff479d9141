//! Integration tests for customer inquiries and the post-call prompt.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use seva_sangam_integration_tests::{Call, TestContext, registration};

/// A context with one visible worker, plus the admin cookie.
async fn with_visible_worker() -> (TestContext, String, String) {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;
    ctx.approve_and_publish(&cookie, &id).await;
    (ctx, cookie, id)
}

async fn send_inquiry(ctx: &TestContext, worker_id: &str, text: &str) -> String {
    let response = Call::post("/api/inquiries")
        .json(json!({
            "worker_id": worker_id,
            "inquiry_text": text,
            "inquiry_type": "booking",
            "customer_name": "Rupa",
        }))
        .send(&ctx.storefront)
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Submitting inquiries
// ============================================================================

#[tokio::test]
async fn test_inquiry_reaches_worker_jobs() {
    let (ctx, _, id) = with_visible_worker().await;

    send_inquiry(&ctx, &id, "Kitchen tap is leaking").await;

    let jobs = Call::get("/api/me/jobs")
        .principal("worker-1")
        .send(&ctx.storefront)
        .await;
    assert_eq!(jobs.status, StatusCode::OK);
    let inquiries = jobs.body["inquiries"].as_array().unwrap();
    assert_eq!(inquiries.len(), 1);
    assert_eq!(inquiries[0]["status"], "new");
    assert_eq!(inquiries[0]["inquiry_text"], "Kitchen tap is leaking");
}

#[tokio::test]
async fn test_inquiry_for_hidden_worker_is_not_found() {
    let ctx = TestContext::new();
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;

    let response = Call::post("/api/inquiries")
        .json(json!({ "worker_id": id, "inquiry_text": "Hello" }))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_inquiry_is_bad_request() {
    let (ctx, _, id) = with_visible_worker().await;

    let response = Call::post("/api/inquiries")
        .json(json!({ "worker_id": id, "inquiry_text": "   " }))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Admin handling
// ============================================================================

#[tokio::test]
async fn test_admin_completes_and_filters_inquiries() {
    let (ctx, cookie, id) = with_visible_worker().await;
    let first = send_inquiry(&ctx, &id, "Fix the geyser").await;
    send_inquiry(&ctx, &id, "Replace a pipe").await;

    let completed = Call::post(format!("/api/inquiries/{first}/complete"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.body["status"], "completed");

    let open = Call::get("/api/inquiries?status=new")
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    let open = open.body.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["inquiry_text"], "Replace a pipe");

    let for_worker = Call::get(format!("/api/workers/{id}/inquiries"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(for_worker.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_records_response() {
    let (ctx, cookie, id) = with_visible_worker().await;
    let inquiry = send_inquiry(&ctx, &id, "Are you free on Sunday?").await;

    let response = Call::put(format!("/api/inquiries/{inquiry}"))
        .cookie(&cookie)
        .json(json!({ "status": "pending", "response_text": "Worker will call back" }))
        .send(&ctx.admin)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["response_given"], true);
    assert_eq!(response.body["response_text"], "Worker will call back");
}

#[tokio::test]
async fn test_admin_deletes_inquiry() {
    let (ctx, cookie, id) = with_visible_worker().await;
    let inquiry = send_inquiry(&ctx, &id, "Wrong number").await;

    let deleted = Call::delete(format!("/api/inquiries/{inquiry}"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = Call::post(format!("/api/inquiries/{inquiry}/complete"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_removing_worker_drops_their_inquiries() {
    let (ctx, cookie, id) = with_visible_worker().await;
    let other = ctx
        .register_worker(
            "worker-2",
            registration("Bina Roy", "electrician", "Jorhat", "part-time"),
        )
        .await;
    ctx.approve_and_publish(&cookie, &other).await;
    send_inquiry(&ctx, &id, "Fix the geyser").await;
    send_inquiry(&ctx, &other, "Wire the new room").await;

    let removed = Call::delete(format!("/api/workers/{id}"))
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let all = Call::get("/api/inquiries").cookie(&cookie).send(&ctx.admin).await;
    let all = all.body.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["worker_id"], other.as_str());
}

// ============================================================================
// Call alarm
// ============================================================================

#[tokio::test]
async fn test_call_alarm_fires_once() {
    let (ctx, _, id) = with_visible_worker().await;

    let call = Call::post(format!("/api/workers/{id}/call"))
        .send(&ctx.storefront)
        .await;
    assert_eq!(call.status, StatusCode::OK);
    assert!(call.body["tel"].as_str().unwrap().starts_with("tel:"));
    let cookie = call.cookie().unwrap();

    let first = Call::get("/api/call-alarm").cookie(&cookie).send(&ctx.storefront).await;
    assert_eq!(first.body["show_alarm"], true);
    assert_eq!(first.body["worker_id"], id.as_str());

    let second = Call::get("/api/call-alarm").cookie(&cookie).send(&ctx.storefront).await;
    assert_eq!(second.body["show_alarm"], false);
}

#[tokio::test]
async fn test_cleared_call_alarm_stays_quiet() {
    let (ctx, _, id) = with_visible_worker().await;
    let call = Call::post(format!("/api/workers/{id}/call"))
        .send(&ctx.storefront)
        .await;
    let cookie = call.cookie().unwrap();

    let cleared = Call::delete("/api/call-alarm")
        .cookie(&cookie)
        .send(&ctx.storefront)
        .await;
    assert_eq!(cleared.status, StatusCode::NO_CONTENT);

    let check = Call::get("/api/call-alarm").cookie(&cookie).send(&ctx.storefront).await;
    assert_eq!(check.body["show_alarm"], false);
}

#[tokio::test]
async fn test_call_alarm_without_session_is_quiet() {
    let ctx = TestContext::new();

    let response = Call::get("/api/call-alarm").send(&ctx.storefront).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["show_alarm"], false);
}

#[tokio::test]
async fn test_call_to_hidden_worker_is_not_found() {
    let ctx = TestContext::new();
    let id = ctx
        .register_worker(
            "worker-1",
            registration("Anil Das", "plumber", "Guwahati", "full-time"),
        )
        .await;

    let response = Call::post(format!("/api/workers/{id}/call"))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
