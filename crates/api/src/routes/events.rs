//! Route definitions for `/events`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /              -> list (lider narrowed to own events)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete (coordinador: own records only)
/// PATCH  /{id}/status   -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route(
            "/{id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        )
        .route("/{id}/status", patch(events::set_status))
}
