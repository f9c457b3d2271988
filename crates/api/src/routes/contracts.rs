//! Route definitions for `/contracts` and their line items.

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::handlers::contracts;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete (coordinador: own records only)
/// PATCH  /{id}/status            -> set_status
/// GET    /{id}/items             -> list_items
/// POST   /{id}/items             -> add_item
/// DELETE /{id}/items/{item_id}   -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contracts::list).post(contracts::create))
        .route(
            "/{id}",
            get(contracts::get_by_id)
                .put(contracts::update)
                .delete(contracts::delete),
        )
        .route("/{id}/status", patch(contracts::set_status))
        .route(
            "/{id}/items",
            get(contracts::list_items).post(contracts::add_item),
        )
        .route("/{id}/items/{item_id}", delete(contracts::delete_item))
}
