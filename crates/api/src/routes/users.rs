//! Route definitions for `/users` (admin-only user management).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update
/// DELETE /{id}                 -> delete (deactivate; self-delete rejected)
/// POST   /{id}/reset-password  -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/{id}",
            get(users::get_by_id).put(users::update).delete(users::delete),
        )
        .route("/{id}/reset-password", post(users::reset_password))
}
