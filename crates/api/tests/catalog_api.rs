//! HTTP-level integration tests for the type-catalog endpoints.
//!
//! All four catalogs share one implementation; the tests drive two of them
//! and exercise the referenced-delete guard through resources.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_catalog_entry, create_user_with_token, delete, get, post_json, put_json};
use sqlx::PgPool;

/// Full CRUD pass over a catalog as admin.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_catalog_crud(pool: PgPool) {
    let (_admin, token) = create_user_with_token(&pool, "admin", "admin").await;

    // Create.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/event-types",
        serde_json::json!({ "name": "Corporativo", "description": "Eventos de empresa" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Read.
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/event-types/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Corporativo");

    // Update.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/event-types/{id}"),
        serde_json::json!({ "description": "Actualizado" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["description"], "Actualizado");
    assert_eq!(json["data"]["name"], "Corporativo");

    // Delete (nothing references it).
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/event-types/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/event-types/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Catalog names are unique per table.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_catalog_duplicate_name_conflicts(pool: PgPool) {
    let (_admin, token) = create_user_with_token(&pool, "admin", "admin").await;
    create_catalog_entry(&pool, "/api/v1/provider-types", "Catering", &token).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/provider-types",
        serde_json::json!({ "name": "Catering" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Deleting a type still referenced by instances returns 409 and leaves the
/// type intact.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_referenced_type_is_blocked(pool: PgPool) {
    let (_admin, token) = create_user_with_token(&pool, "admin", "admin").await;
    let type_id = create_catalog_entry(&pool, "/api/v1/resource-types", "Carpas", &token).await;

    // Create a resource pointing at the type.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/resources",
        serde_json::json!({ "name": "Carpa 6x6", "resource_type_id": type_id }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Delete is blocked.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/resource-types/{type_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    // The type is still there.
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/resource-types/{type_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// An empty name is rejected with a field message.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_catalog_empty_name_rejected(pool: PgPool) {
    let (_admin, token) = create_user_with_token(&pool, "admin", "admin").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/personnel-types",
        serde_json::json!({ "name": "   " }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("name"));
}
