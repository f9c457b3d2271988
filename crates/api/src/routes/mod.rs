//! Route definitions.
//!
//! Route hierarchy (mounted under `/api/v1`; health lives at the root):
//!
//! ```text
//! /auth/register                       register (public)
//! /auth/login                          login (public)
//! /auth/refresh                        refresh (public)
//! /auth/logout                         logout (requires auth)
//! /auth/me                             own profile (requires auth)
//!
//! /users                               list, create (admin only)
//! /users/{id}                          get, update, deactivate
//! /users/{id}/reset-password           reset password
//!
//! /events                              list, create
//! /events/{id}                         get, update, delete
//! /events/{id}/status                  status transition (PATCH)
//!
//! /contracts                           list, create
//! /contracts/{id}                      get, update, delete
//! /contracts/{id}/status               status transition (PATCH)
//! /contracts/{id}/items                list, add line items
//! /contracts/{id}/items/{item_id}      remove line item
//!
//! /event-types, /resource-types,
//! /provider-types, /personnel-types    type catalogs (mutations admin only)
//!
//! /resources, /providers, /personnel   logistics masters
//!
//! /reports                             list, create
//! /reports/{id}                        get, update, delete
//! /reports/{id}/status                 status transition (PATCH)
//!
//! /stats/overview                      status counts + totals
//! ```

pub mod auth;
pub mod catalogs;
pub mod contracts;
pub mod events;
pub mod health;
pub mod personnel;
pub mod providers;
pub mod reports;
pub mod resources;
pub mod stats;
pub mod users;

use axum::Router;

use logievents_core::policy::ResourceKind;
use logievents_db::repositories::CatalogRepo;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/events", events::router())
        .nest("/contracts", contracts::router())
        .nest(
            "/event-types",
            catalogs::router(&CatalogRepo::EVENT_TYPES, ResourceKind::EventTypes),
        )
        .nest(
            "/resource-types",
            catalogs::router(&CatalogRepo::RESOURCE_TYPES, ResourceKind::ResourceTypes),
        )
        .nest(
            "/provider-types",
            catalogs::router(&CatalogRepo::PROVIDER_TYPES, ResourceKind::ProviderTypes),
        )
        .nest(
            "/personnel-types",
            catalogs::router(&CatalogRepo::PERSONNEL_TYPES, ResourceKind::PersonnelTypes),
        )
        .nest("/resources", resources::router())
        .nest("/providers", providers::router())
        .nest("/personnel", personnel::router())
        .nest("/reports", reports::router())
        .nest("/stats", stats::router())
}
