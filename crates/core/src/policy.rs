//! Central authorization decision table.
//!
//! Every route consults this single table instead of carrying its own ad-hoc
//! role check, so the per-resource allow-lists cannot drift apart. Rules are
//! evaluated top-down, first match wins:
//!
//! 1. Requests without an identity never reach this table (the extractor
//!    rejects them with 401).
//! 2. `admin` may do everything. The single exception, self-deletion of the
//!    admin's own user row, is a record-level check in the users handler.
//! 3. `coordinador` may read everything and create/update business entities,
//!    but may only DELETE records it created, and may not touch the type
//!    catalogs or user management at all.
//! 4. `lider` is read-only. Its event reads are narrowed to events where it
//!    is the responsible user, and its only write is a status transition on
//!    such an event (the handler further restricts the target status).
//! 5. Everything else is denied.

use crate::roles::Role;

/// HTTP verb classes the table distinguishes.
///
/// `Patch` is the status-transition verb; full updates go through `Put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Resource classes exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Users,
    Events,
    EventTypes,
    Contracts,
    Resources,
    ResourceTypes,
    Providers,
    ProviderTypes,
    Personnel,
    PersonnelTypes,
    Reports,
}

impl ResourceKind {
    /// Type catalogs are reference data: readable by everyone, mutable only
    /// by admins.
    pub fn is_catalog(self) -> bool {
        matches!(
            self,
            ResourceKind::EventTypes
                | ResourceKind::ResourceTypes
                | ResourceKind::ProviderTypes
                | ResourceKind::PersonnelTypes
        )
    }

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Events => "events",
            ResourceKind::EventTypes => "event types",
            ResourceKind::Contracts => "contracts",
            ResourceKind::Resources => "resources",
            ResourceKind::ResourceTypes => "resource types",
            ResourceKind::Providers => "providers",
            ResourceKind::ProviderTypes => "provider types",
            ResourceKind::Personnel => "personnel",
            ResourceKind::PersonnelTypes => "personnel types",
            ResourceKind::Reports => "reports",
        }
    }
}

/// Outcome of a policy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Permitted on any record.
    Allow,
    /// Permitted only on records owned by the caller. List queries must be
    /// narrowed to the caller's records; single-record operations must
    /// verify ownership against the resource's ownership column
    /// (`responsable_id` for event reads, `created_by` elsewhere).
    AllowOwn,
    Deny,
}

/// Resolve whether `role` may perform `verb` on `resource`.
pub fn decide(role: Role, verb: Verb, resource: ResourceKind) -> Decision {
    match role {
        Role::Admin => Decision::Allow,

        Role::Coordinador => {
            // User management is admin territory.
            if resource == ResourceKind::Users {
                return Decision::Deny;
            }
            if resource.is_catalog() {
                return match verb {
                    Verb::Get => Decision::Allow,
                    _ => Decision::Deny,
                };
            }
            match verb {
                Verb::Get | Verb::Post | Verb::Put | Verb::Patch => Decision::Allow,
                Verb::Delete => Decision::AllowOwn,
            }
        }

        Role::Lider => {
            if resource == ResourceKind::Users {
                return Decision::Deny;
            }
            match (resource, verb) {
                // Own events only, both for reading and for the status
                // transition allow-list.
                (ResourceKind::Events, Verb::Get) => Decision::AllowOwn,
                (ResourceKind::Events, Verb::Patch) => Decision::AllowOwn,
                (_, Verb::Get) => Decision::Allow,
                _ => Decision::Deny,
            }
        }
    }
}
