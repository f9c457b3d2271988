//! HTTP-level integration tests for the auth endpoints.
//!
//! Covers registration, login, token refresh with rotation, logout, and the
//! expired-vs-invalid token distinction.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user_with_token, get, post_json, TEST_PASSWORD};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

use logievents_api::auth::jwt::Claims;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration returns 201 with the envelope and no password material.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": "newuser",
            "email": "newuser@test.com",
            "password": "a-decent-password"
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["username"], "newuser");
    // Self-registration always lands on the least privileged role.
    assert_eq!(json["data"]["role"], "lider");
    assert!(json["data"].get("password_hash").is_none());
}

/// Registering a taken username returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    create_user_with_token(&pool, "taken", "lider").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": "taken",
            "email": "other@test.com",
            "password": "a-decent-password"
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "CONFLICT");
}

/// A password below the strength floor is rejected with a field message.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": "weakling",
            "email": "weak@test.com",
            "password": "short"
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// A malformed email is rejected with a field-level message.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": "bademail",
            "email": "not-an-email",
            "password": "a-decent-password"
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(
        json["error"].as_str().unwrap().contains("email"),
        "error should name the failing field: {json}"
    );
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns tokens and public user info in the envelope.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (user, _token) = create_user_with_token(&pool, "loginuser", "coordinador").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": "loginuser", "password": TEST_PASSWORD }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert!(json["data"]["expires_in"].is_number());
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["role"], "coordinador");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_user_with_token(&pool, "wrongpw", "lider").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": "wrongpw", "password": "incorrect" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login to a deactivated account returns 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let (user, _token) = create_user_with_token(&pool, "inactive", "lider").await;
    logievents_db::repositories::UserRepo::deactivate(&pool, user.id)
        .await
        .expect("deactivation should succeed");

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": "inactive", "password": TEST_PASSWORD }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

/// A refresh token can be exchanged once; rotation revokes the old session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_user_with_token(&pool, "refresher", "coordinador").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": "refresher", "password": TEST_PASSWORD }),
        None,
    )
    .await;
    let login_json = body_json(login).await;
    let refresh_token = login_json["data"]["refresh_token"].as_str().unwrap().to_string();

    // First exchange succeeds.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());

    // Replaying the consumed token fails.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every session the user holds.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool, "leaver", "lider").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": "leaver", "password": TEST_PASSWORD }),
        None,
    )
    .await;
    let login_json = body_json(login).await;
    let refresh_token = login_json["data"]["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/auth/logout", serde_json::json!({}), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Token failure modes
// ---------------------------------------------------------------------------

/// Requests without a token are rejected with 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/auth/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// An expired token is reported with the dedicated `TOKEN_EXPIRED` code so
/// clients can run the refresh flow; garbage tokens get a plain 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_expired_token_is_distinct_from_invalid(pool: PgPool) {
    let (user, _token) = create_user_with_token(&pool, "expired", "lider").await;

    // Hand-craft a token that expired well past the validation leeway.
    let config = common::test_jwt_config();
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        role: "lider".to_string(),
        exp: now - 300,
        iat: now - 600,
        jti: "test-jti".to_string(),
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/auth/me", Some(&expired)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "TOKEN_EXPIRED");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/auth/me", Some("garbage-token")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// The legacy `x-auth-token` header is accepted as a fallback.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_legacy_token_header(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool, "legacy", "lider").await;

    let app = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .method(axum::http::Method::GET)
        .uri("/api/v1/auth/me")
        .header("x-auth-token", &token)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
