//! HTTP-level integration tests for the events CRUD endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_catalog_entry, create_user_with_token, get, patch_json, post_json, put_json};
use sqlx::PgPool;

async fn setup(pool: &PgPool) -> (String, i64) {
    let (_admin, admin_token) = create_user_with_token(pool, "admin", "admin").await;
    let type_id =
        create_catalog_entry(pool, "/api/v1/event-types", "Conferencia", &admin_token).await;
    (admin_token, type_id)
}

/// Creating an event returns 201 with the envelope and the default status.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_event(pool: PgPool) {
    let (token, type_id) = setup(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({
            "name": "Lanzamiento",
            "location": "Bogota",
            "starts_at": "2025-03-01T09:00:00Z",
            "ends_at": "2025-03-01T17:00:00Z",
            "event_type_id": type_id,
        }),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["name"], "Lanzamiento");
    assert_eq!(json["data"]["status"], "planeacion");
    assert!(json["data"]["id"].is_number());
}

/// An inverted time window is rejected even when everything else is valid.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_event_rejects_inverted_window(pool: PgPool) {
    let (_admin_token, type_id) = setup(&pool).await;
    // The check applies regardless of role; use a coordinador like the
    // canonical failing request.
    let (_coord, coord_token) = create_user_with_token(&pool, "coord", "coordinador").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({
            "name": "Launch",
            "starts_at": "2025-03-01T00:00:00Z",
            "ends_at": "2025-02-01T00:00:00Z",
            "event_type_id": type_id,
        }),
        Some(&coord_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("ends_at"));
}

/// A nonexistent event type id fails validation and writes nothing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_event_rejects_unknown_type(pool: PgPool) {
    let (token, _type_id) = setup(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({
            "name": "Sin tipo",
            "starts_at": "2025-03-01T09:00:00Z",
            "ends_at": "2025-03-01T17:00:00Z",
            "event_type_id": 999_999,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/events", Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 0, "failed create must not write");
}

/// Fetching a missing id returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_event(pool: PgPool) {
    let (token, _type_id) = setup(&pool).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/events/424242", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Updating only one bound of the window re-validates against the stored
/// other bound.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_revalidates_merged_window(pool: PgPool) {
    let (token, type_id) = setup(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({
            "name": "Ventana",
            "starts_at": "2025-03-01T09:00:00Z",
            "ends_at": "2025-03-01T17:00:00Z",
            "event_type_id": type_id,
        }),
        Some(&token),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Moving ends_at before the stored starts_at must fail.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/events/{id}"),
        serde_json::json!({ "ends_at": "2025-03-01T08:00:00Z" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A consistent update passes.
    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/events/{id}"),
        serde_json::json!({ "ends_at": "2025-03-02T17:00:00Z", "name": "Ventana larga" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ventana larga");
}

/// The workflow rejects skipped transitions with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_status_cannot_skip_forward(pool: PgPool) {
    let (token, type_id) = setup(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({
            "name": "Saltarin",
            "starts_at": "2025-03-01T09:00:00Z",
            "ends_at": "2025-03-01T17:00:00Z",
            "event_type_id": type_id,
        }),
        Some(&token),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // planeacion -> completado skips two states.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/events/{id}/status"),
        serde_json::json!({ "status": "completado" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // An unknown status string is a validation error, not a conflict.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/events/{id}/status"),
        serde_json::json!({ "status": "confirmed" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The legal first step works.
    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/events/{id}/status"),
        serde_json::json!({ "status": "confirmado" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// List responses carry total / page / pages and respect the limit.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_pagination_envelope(pool: PgPool) {
    let (token, type_id) = setup(&pool).await;

    for i in 0..3 {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/events",
            serde_json::json!({
                "name": format!("Evento {i}"),
                "starts_at": "2025-03-01T09:00:00Z",
                "ends_at": "2025-03-01T17:00:00Z",
                "event_type_id": type_id,
            }),
            Some(&token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/events?page=1&limit=2", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["pages"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
