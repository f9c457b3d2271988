//! Route definitions for `/reports`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete (coordinador: own records only)
/// PATCH  /{id}/status   -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list).post(reports::create))
        .route(
            "/{id}",
            get(reports::get_by_id)
                .put(reports::update)
                .delete(reports::delete),
        )
        .route("/{id}/status", patch(reports::set_status))
}
