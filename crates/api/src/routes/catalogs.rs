//! Route builder for the four type-catalog resources.
//!
//! One builder serves all catalogs; each mount binds the shared handlers in
//! [`crate::handlers::catalogs`] to a concrete [`CatalogRepo`] and
//! [`ResourceKind`].

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use logievents_core::policy::ResourceKind;
use logievents_core::types::DbId;
use logievents_db::models::catalog::{CreateCatalogEntry, UpdateCatalogEntry};
use logievents_db::repositories::CatalogRepo;

use crate::handlers::catalogs;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::PaginationParams;

/// Routes mounted at `/event-types`, `/resource-types`, `/provider-types`,
/// and `/personnel-types`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create (admin only)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update (admin only)
/// DELETE /{id}   -> delete (admin only; blocked while referenced)
/// ```
pub fn router(repo: &'static CatalogRepo, kind: ResourceKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(
                move |state: State<AppState>, user: AuthUser, params: Query<PaginationParams>| {
                    catalogs::list(state, user, params, repo, kind)
                },
            )
            .post(
                move |state: State<AppState>, user: AuthUser, body: Json<CreateCatalogEntry>| {
                    catalogs::create(state, user, body, repo, kind)
                },
            ),
        )
        .route(
            "/{id}",
            get(
                move |state: State<AppState>, user: AuthUser, path: Path<DbId>| {
                    catalogs::get_by_id(state, user, path, repo, kind)
                },
            )
            .put(
                move |state: State<AppState>,
                      user: AuthUser,
                      path: Path<DbId>,
                      body: Json<UpdateCatalogEntry>| {
                    catalogs::update(state, user, path, body, repo, kind)
                },
            )
            .delete(
                move |state: State<AppState>, user: AuthUser, path: Path<DbId>| {
                    catalogs::delete(state, user, path, repo, kind)
                },
            ),
        )
}
