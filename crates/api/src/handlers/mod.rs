//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers authorize through [`crate::middleware::policy::authorize`],
//! delegate to the corresponding repository in `logievents_db`, and map
//! errors via [`crate::error::AppError`].

pub mod auth;
pub mod catalogs;
pub mod contracts;
pub mod events;
pub mod personnel;
pub mod providers;
pub mod reports;
pub mod resources;
pub mod stats;
pub mod users;
