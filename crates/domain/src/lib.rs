//! Domain entities and invariants for RBAC seed compilation.

#![forbid(unsafe_code)]

mod declaration;
mod identity;
mod seed;

pub use declaration::{PermissionDeclaration, RoleDeclaration, SeedDeclaration};
pub use identity::{DEFAULT_OWNER_ID, GrantId, OwnerId, RoleId};
pub use seed::{
    AssignedEntityType, GrantScope, RbacPermissionGrant, RbacRole, RoleType,
    SEED_TIMESTAMP_FORMAT, format_seed_timestamp,
};
