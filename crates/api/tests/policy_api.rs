//! HTTP-level integration tests for role-based authorization.
//!
//! Exercises the central decision table through real routes: per-role
//! allow-lists, ownership narrowing for lider and coordinador, and the
//! admin self-delete exception.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_catalog_entry, create_user_with_token, delete, get, patch_json, post_json,
};
use sqlx::PgPool;

/// Create an event through the API as `token`, optionally assigning a
/// responsible user, and return its id.
async fn create_event(
    pool: &PgPool,
    token: &str,
    event_type_id: i64,
    responsable_id: Option<i64>,
) -> i64 {
    let mut body = serde_json::json!({
        "name": "Fixture event",
        "starts_at": "2025-06-01T10:00:00Z",
        "ends_at": "2025-06-01T18:00:00Z",
        "event_type_id": event_type_id,
    });
    if let Some(responsable_id) = responsable_id {
        body["responsable_id"] = serde_json::json!(responsable_id);
    }
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/events", body, Some(token)).await;
    assert_eq!(response.status(), StatusCode::CREATED, "fixture event failed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create allow-lists
// ---------------------------------------------------------------------------

/// A lider may not create events (read-only role).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lider_cannot_create_events(pool: PgPool) {
    let (_admin, admin_token) = create_user_with_token(&pool, "admin1", "admin").await;
    let (_lider, lider_token) = create_user_with_token(&pool, "lider1", "lider").await;
    let type_id =
        create_catalog_entry(&pool, "/api/v1/event-types", "Conferencia", &admin_token).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({
            "name": "Nope",
            "starts_at": "2025-06-01T10:00:00Z",
            "ends_at": "2025-06-01T18:00:00Z",
            "event_type_id": type_id,
        }),
        Some(&lider_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

/// Type catalogs are admin-only to mutate; coordinador creates are denied.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_coordinador_cannot_mutate_catalogs(pool: PgPool) {
    let (_coord, coord_token) = create_user_with_token(&pool, "coord1", "coordinador").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/resource-types",
        serde_json::json!({ "name": "Sonido" }),
        Some(&coord_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reading the catalog is still allowed.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/resource-types", Some(&coord_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// User management is admin territory.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_management_is_admin_only(pool: PgPool) {
    let (_coord, coord_token) = create_user_with_token(&pool, "coord2", "coordinador").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users", Some(&coord_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Ownership narrowing
// ---------------------------------------------------------------------------

/// A lider listing events sees only those where it is the responsible user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lider_event_listing_is_narrowed(pool: PgPool) {
    let (_admin, admin_token) = create_user_with_token(&pool, "admin2", "admin").await;
    let (lider, lider_token) = create_user_with_token(&pool, "lider2", "lider").await;
    let (other, _other_token) = create_user_with_token(&pool, "lider3", "lider").await;
    let type_id =
        create_catalog_entry(&pool, "/api/v1/event-types", "Concierto", &admin_token).await;

    let mine = create_event(&pool, &admin_token, type_id, Some(lider.id)).await;
    let _theirs = create_event(&pool, &admin_token, type_id, Some(other.id)).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/events", Some(&lider_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], mine);
    assert_eq!(data[0]["responsable_id"], lider.id);
}

/// A lider fetching someone else's event by id is refused.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lider_cannot_read_foreign_event(pool: PgPool) {
    let (_admin, admin_token) = create_user_with_token(&pool, "admin3", "admin").await;
    let (_lider, lider_token) = create_user_with_token(&pool, "lider4", "lider").await;
    let (other, _t) = create_user_with_token(&pool, "lider5", "lider").await;
    let type_id = create_catalog_entry(&pool, "/api/v1/event-types", "Feria", &admin_token).await;

    let theirs = create_event(&pool, &admin_token, type_id, Some(other.id)).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/events/{theirs}"), Some(&lider_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A coordinador may delete its own events but not a colleague's.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_coordinador_delete_is_ownership_scoped(pool: PgPool) {
    let (_admin, admin_token) = create_user_with_token(&pool, "admin4", "admin").await;
    let (_coord, coord_token) = create_user_with_token(&pool, "coord3", "coordinador").await;
    let type_id = create_catalog_entry(&pool, "/api/v1/event-types", "Gala", &admin_token).await;

    let admins_event = create_event(&pool, &admin_token, type_id, None).await;
    let own_event = create_event(&pool, &coord_token, type_id, None).await;

    // Someone else's record: denied.
    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/v1/events/{admins_event}"),
        Some(&coord_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Own record: allowed.
    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/events/{own_event}"), Some(&coord_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Lider status transitions
// ---------------------------------------------------------------------------

/// A lider may move its own confirmed event to `en_curso`, but nowhere else.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lider_status_transition_allow_list(pool: PgPool) {
    let (_admin, admin_token) = create_user_with_token(&pool, "admin5", "admin").await;
    let (lider, lider_token) = create_user_with_token(&pool, "lider6", "lider").await;
    let type_id = create_catalog_entry(&pool, "/api/v1/event-types", "Boda", &admin_token).await;

    let event_id = create_event(&pool, &admin_token, type_id, Some(lider.id)).await;

    // Admin confirms the event first.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/events/{event_id}/status"),
        serde_json::json!({ "status": "confirmado" }),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Cancellation is a legal workflow step but outside the lider allow-list.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/events/{event_id}/status"),
        serde_json::json!({ "status": "cancelado" }),
        Some(&lider_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Moving its own event into en_curso is allowed.
    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/events/{event_id}/status"),
        serde_json::json!({ "status": "en_curso" }),
        Some(&lider_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "en_curso");
}

/// A lider cannot transition an event it is not responsible for.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lider_cannot_transition_foreign_event(pool: PgPool) {
    let (_admin, admin_token) = create_user_with_token(&pool, "admin6", "admin").await;
    let (_lider, lider_token) = create_user_with_token(&pool, "lider7", "lider").await;
    let type_id = create_catalog_entry(&pool, "/api/v1/event-types", "Expo", &admin_token).await;

    let event_id = create_event(&pool, &admin_token, type_id, None).await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/events/{event_id}/status"),
        serde_json::json!({ "status": "en_curso" }),
        Some(&lider_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Admin self-delete
// ---------------------------------------------------------------------------

/// Admins may delete other users but never themselves.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_self_delete_is_blocked(pool: PgPool) {
    let (admin, admin_token) = create_user_with_token(&pool, "admin7", "admin").await;
    let (victim, _victim_token) = create_user_with_token(&pool, "victim", "lider").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/users/{}", admin.id), Some(&admin_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete(
        app,
        &format!("/api/v1/users/{}", victim.id),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
