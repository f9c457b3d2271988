//! Authentication and authorization middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a bearer
//!   token (standard `Authorization` header or legacy `x-auth-token`).
//! - [`policy::authorize`] -- Consults the central decision table and
//!   returns the ownership narrowing, if any.

pub mod auth;
pub mod policy;
