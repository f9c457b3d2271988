//! Route definitions for `/providers`.

use axum::routing::get;
use axum::Router;

use crate::handlers::providers;
use crate::state::AppState;

/// Routes mounted at `/providers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(providers::list).post(providers::create))
        .route(
            "/{id}",
            get(providers::get_by_id)
                .put(providers::update)
                .delete(providers::delete),
        )
}
