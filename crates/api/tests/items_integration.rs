//! Integration tests for item report endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn create_item_returns_full_payload() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Reporter").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/items",
            Some(&user.token),
            &json!({
                "name": "Blue backpack",
                "description": "Navy blue backpack with a laptop sleeve",
                "category": "bags",
                "status": "lost",
                "location": "Main library, second floor",
                "date": "2024-03-01",
                "imageUrl": "https://example.com/backpack.jpg",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Blue backpack");
    assert_eq!(body["data"]["category"], "bags");
    assert_eq!(body["data"]["claimStatus"], "unclaimed");
    assert_eq!(body["data"]["reporter"]["id"], user.id.to_string());
    assert_eq!(body["data"]["imageUrl"], "https://example.com/backpack.jpg");
}

#[tokio::test]
async fn create_item_rejects_short_description() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Terse").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/items",
            Some(&user.token),
            &json!({
                "name": "Umbrella",
                "description": "short",
                "category": "other",
                "status": "found",
                "location": "Gym entrance",
                "date": "2024-03-01",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_browsing_is_public() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "PublicReporter").await;
    let item_id = create_test_item(&app, &user.token, "Publicly visible item", "found").await;

    // Listing needs no token.
    let listing = app
        .clone()
        .oneshot(bare_request("GET", "/api/items", None))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    let body = parse_response_body(listing).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["id"] == item_id.to_string()));

    // Neither does a single item lookup.
    let lookup = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/items/{}", item_id),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::OK);
    let body = parse_response_body(lookup).await;
    assert_eq!(body["data"]["name"], "Publicly visible item");
}

#[tokio::test]
async fn create_item_requires_auth() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/items", None, &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_items_filters_by_report_type() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Filterer").await;
    let lost_id = create_test_item(&app, &user.token, "Filter lost item", "lost").await;
    create_test_item(&app, &user.token, "Filter found item", "found").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            "/api/items?status=lost&search=Filter%20lost",
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert!(data
        .iter()
        .any(|item| item["id"] == lost_id.to_string()));
    assert!(data.iter().all(|item| item["status"] == "lost"));
}

#[tokio::test]
async fn list_items_has_pagination_fields() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Pager").await;
    create_test_item(&app, &user.token, "Paged item one", "lost").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/items?page=1&limit=1", &user.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["count"], 1);
    assert!(body["total"].as_i64().unwrap() >= 1);
    assert!(body["totalPages"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn get_item_returns_404_for_unknown_id() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Seeker").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            "/api/items/00000000-0000-0000-0000-000000000000",
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn update_item_rejected_for_non_owner() {
    let (app, _pool) = create_test_app().await;
    let owner = create_authenticated_user(&app, "Owner").await;
    let stranger = create_authenticated_user(&app, "Stranger").await;
    let item_id = create_test_item(&app, &owner.token, "Guarded item", "lost").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/items/{}", item_id),
            Some(&stranger.token),
            &json!({ "location": "Somewhere else entirely" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_item_applies_partial_changes() {
    let (app, _pool) = create_test_app().await;
    let owner = create_authenticated_user(&app, "Editor").await;
    let item_id = create_test_item(&app, &owner.token, "Editable item", "lost").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/items/{}", item_id),
            Some(&owner.token),
            &json!({ "location": "Cafeteria lost and found desk" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["data"]["location"], "Cafeteria lost and found desk");
    // Untouched fields keep their values.
    assert_eq!(body["data"]["name"], "Editable item");
}

#[tokio::test]
async fn update_item_rejects_empty_body() {
    let (app, _pool) = create_test_app().await;
    let owner = create_authenticated_user(&app, "Noop").await;
    let item_id = create_test_item(&app, &owner.token, "Unchanged item", "lost").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/items/{}", item_id),
            Some(&owner.token),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_item_removes_it() {
    let (app, _pool) = create_test_app().await;
    let owner = create_authenticated_user(&app, "Deleter").await;
    let item_id = create_test_item(&app, &owner.token, "Doomed item", "found").await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/items/{}", item_id),
            &owner.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let lookup = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/items/{}", item_id),
            &owner.token,
        ))
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn my_items_lists_only_own_reports() {
    let (app, _pool) = create_test_app().await;
    let alice = create_authenticated_user(&app, "Alice").await;
    let bob = create_authenticated_user(&app, "Bob").await;
    let alice_item = create_test_item(&app, &alice.token, "Alice's item", "lost").await;
    create_test_item(&app, &bob.token, "Bob's item", "lost").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/items/mine", &alice.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], alice_item.to_string());
}
