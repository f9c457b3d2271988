//! Bridge between the HTTP layer and the core policy table.
//!
//! Handlers call [`authorize`] with the verb and resource they serve; the
//! returned [`Scope`] carries the ownership narrowing, if any, which list
//! handlers feed into query filters and single-record handlers check with
//! [`Scope::ensure_owns`].

use logievents_core::error::CoreError;
use logievents_core::policy::{decide, Decision, ResourceKind, Verb};
use logievents_core::types::DbId;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Query narrowing produced by a policy lookup.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    /// When set, the caller may only touch records owned by this user id.
    pub owner_only: Option<DbId>,
}

impl Scope {
    /// Verify the caller owns a specific record. `owner` is the value of the
    /// resource's ownership column.
    pub fn ensure_owns(&self, owner: DbId, resource: ResourceKind) -> Result<(), AppError> {
        match self.owner_only {
            Some(caller) if caller != owner => Err(AppError::Core(CoreError::Forbidden(format!(
                "Not the owner of this record in {}",
                resource.name()
            )))),
            _ => Ok(()),
        }
    }
}

/// Consult the decision table for `user` performing `verb` on `resource`.
///
/// Returns the ownership scope on success, or `Forbidden` on denial.
pub fn authorize(user: &AuthUser, verb: Verb, resource: ResourceKind) -> Result<Scope, AppError> {
    match decide(user.role, verb, resource) {
        Decision::Allow => Ok(Scope { owner_only: None }),
        Decision::AllowOwn => Ok(Scope {
            owner_only: Some(user.user_id),
        }),
        Decision::Deny => Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' is not allowed to perform this operation on {}",
            user.role.as_str(),
            resource.name()
        )))),
    }
}
