//! Route definitions for `/resources`.

use axum::routing::get;
use axum::Router;

use crate::handlers::resources;
use crate::state::AppState;

/// Routes mounted at `/resources`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(resources::list).post(resources::create))
        .route(
            "/{id}",
            get(resources::get_by_id)
                .put(resources::update)
                .delete(resources::delete),
        )
}
