//! Integration tests for registration, login, and profile endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn register_creates_account_and_returns_token() {
    let (app, _pool) = create_test_app().await;
    let email = unique_test_email("register");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            &json!({ "name": "Alice", "email": email, "password": "Secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], email.to_lowercase());
    assert_eq!(body["data"]["user"]["role"], "student");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Dupe").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            &json!({ "name": "Copycat", "email": user.email.to_uppercase(), "password": "Secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn register_rejects_weak_password() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            &json!({ "name": "Bob", "email": unique_test_email("weak"), "password": "password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "LoginUser").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            &json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "WrongPass").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            &json!({ "email": user.email, "password": "NotTheRight1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_token() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/users/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_returns_current_user() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "ProfileUser").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/users/me", &user.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["data"]["email"], user.email);
    assert_eq!(body["data"]["name"], "ProfileUser");
}

#[tokio::test]
async fn update_profile_changes_name() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "OldName").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&user.token),
            &json!({ "name": "NewName" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["data"]["name"], "NewName");
}

#[tokio::test]
async fn update_profile_rejects_taken_email() {
    let (app, _pool) = create_test_app().await;
    let first = create_authenticated_user(&app, "First").await;
    let second = create_authenticated_user(&app, "Second").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&second.token),
            &json!({ "email": first.email }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_profile_rejects_empty_body() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "NoFields").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&user.token),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "PassUser").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me/password",
            Some(&user.token),
            &json!({ "currentPassword": "WrongOne1", "newPassword": "Fresh1234" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_rejects_reusing_current_password() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Reuser").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me/password",
            Some(&user.token),
            &json!({ "currentPassword": user.password, "newPassword": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn change_password_allows_login_with_new_password() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "Rotator").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me/password",
            Some(&user.token),
            &json!({ "currentPassword": user.password, "newPassword": "Fresh1234" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            &json!({ "email": user.email, "password": "Fresh1234" }),
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);

    let stale = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            &json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_stats_counts_reports_and_claims() {
    let (app, _pool) = create_test_app().await;
    let user = create_authenticated_user(&app, "StatsUser").await;
    create_test_item(&app, &user.token, "Stats item", "lost").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/users/me/stats", &user.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["data"]["reportsCount"], 1);
    assert_eq!(body["data"]["claimsCount"], 0);
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/users/me", "not.a.token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
