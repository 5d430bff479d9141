//! Integration tests for public browsing and search.
//!
//! Workers are registered through the storefront and moderated through the
//! admin API before any storefront list is read, so the storefront cache
//! never holds a pre-moderation snapshot.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use seva_sangam_integration_tests::{Call, TestContext, registration};

/// Three visible workers and one still pending.
async fn seeded() -> (TestContext, Vec<String>) {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;

    let visible = [
        ("worker-a", registration("Anil Das", "plumber", "Guwahati", "full-time")),
        ("worker-b", registration("Bina Roy", "electrician", "Jorhat", "part-time")),
        ("worker-c", registration("Chandan Kalita", "plumber", "North Guwahati", "part-time")),
    ];
    let mut ids = Vec::new();
    for (principal, form) in visible {
        let id = ctx.register_worker(principal, form).await;
        ctx.approve_and_publish(&cookie, &id).await;
        ids.push(id);
    }

    let pending = ctx
        .register_worker(
            "worker-d",
            registration("Dipen Bora", "plumber", "Guwahati", "full-time"),
        )
        .await;
    ids.push(pending);

    (ctx, ids)
}

fn names(body: &serde_json::Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|w| w["full_name"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_categories_fall_back_to_catalog_when_backend_has_none() {
    let ctx = TestContext::new();

    let response = Call::get("/api/categories").send(&ctx.storefront).await;

    assert_eq!(response.status, StatusCode::OK);
    let categories = response.body.as_array().unwrap();
    assert!(!categories.is_empty());
    assert!(categories.iter().any(|c| c["id"] == "plumber" && c["name"] == "Plumber"));
}

#[tokio::test]
async fn test_category_page_lists_only_visible_workers() {
    let (ctx, _) = seeded().await;

    let response = Call::get("/api/categories/plumber").send(&ctx.storefront).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category"]["name"], "Plumber");
    let mut found = names(&response.body["workers"]);
    found.sort_unstable();
    assert_eq!(found, ["Anil Das", "Chandan Kalita"]);
}

#[tokio::test]
async fn test_unknown_category_page_uses_raw_id() {
    let ctx = TestContext::new();

    let response = Call::get("/api/categories/tiffin-service")
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category"]["name"], "tiffin-service");
    assert_eq!(response.body["workers"], json!([]));
}

#[tokio::test]
async fn test_deleted_custom_category_label_shows_raw_id() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;

    let created = Call::post("/api/categories")
        .cookie(&cookie)
        .json(json!({ "name": "Tiffin Service" }))
        .send(&ctx.admin)
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["id"], "tiffin-service");

    let id = ctx
        .register_worker(
            "cook-1",
            registration("Mala Devi", "tiffin-service", "Tezpur", "full-time"),
        )
        .await;
    ctx.approve_and_publish(&cookie, &id).await;

    let deleted = Call::delete("/api/categories/tiffin-service")
        .cookie(&cookie)
        .send(&ctx.admin)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let response = Call::get(format!("/api/workers/{id}"))
        .send(&ctx.storefront)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category_label"], "tiffin-service");
}

// ============================================================================
// Workers
// ============================================================================

#[tokio::test]
async fn test_worker_list_hides_pending_profiles() {
    let (ctx, _) = seeded().await;

    let response = Call::get("/api/workers").send(&ctx.storefront).await;

    assert_eq!(response.status, StatusCode::OK);
    let found = names(&response.body);
    assert_eq!(found.len(), 3);
    assert!(!found.contains(&"Dipen Bora"));
}

#[tokio::test]
async fn test_pending_worker_page_is_not_found() {
    let (ctx, ids) = seeded().await;

    let response = Call::get(format!("/api/workers/{}", ids[3]))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_worker_page_carries_contact_links() {
    let (ctx, ids) = seeded().await;

    let response = Call::get(format!("/api/workers/{}", ids[0]))
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category_label"], "Plumber");
    assert_eq!(response.body["availability_bucket"], "full-time");
    assert!(
        response.body["contact"]["tel"]
            .as_str()
            .unwrap()
            .starts_with("tel:")
    );
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_without_filters_returns_everyone_visible() {
    let (ctx, _) = seeded().await;

    let response = Call::get("/api/search").send(&ctx.storefront).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["filtered"], false);
    assert_eq!(response.body["count"], 3);
}

#[tokio::test]
async fn test_search_location_is_case_insensitive_substring() {
    let (ctx, _) = seeded().await;

    let response = Call::get("/api/search?location=GUWA")
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["filtered"], true);
    let mut found = names(&response.body["workers"]);
    found.sort_unstable();
    assert_eq!(found, ["Anil Das", "Chandan Kalita"]);
}

#[tokio::test]
async fn test_search_combines_category_and_availability() {
    let (ctx, _) = seeded().await;

    let response = Call::get("/api/search?category=plumber&availability=part-time")
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(names(&response.body["workers"]), ["Chandan Kalita"]);
}

#[tokio::test]
async fn test_search_blank_values_are_ignored() {
    let (ctx, _) = seeded().await;

    let response = Call::get("/api/search?category=&location=%20&availability=")
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["filtered"], false);
    assert_eq!(response.body["count"], 3);
}

#[tokio::test]
async fn test_search_rejects_unknown_availability() {
    let ctx = TestContext::new();

    let response = Call::get("/api/search?availability=weekends")
        .send(&ctx.storefront)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backend_outage_is_retryable() {
    let ctx = TestContext::new();
    ctx.memory.set_offline(true);

    let response = Call::get("/api/workers").send(&ctx.storefront).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["retryable"], true);
}
