use chrono::{DateTime, Utc};

use crate::{GrantId, OwnerId, RoleId};

/// Timestamp layout of seed rows: ISO-8601, UTC, no zone suffix.
pub const SEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Formats an instant the way seed relations store it.
#[must_use]
pub fn format_seed_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(SEED_TIMESTAMP_FORMAT).to_string()
}

/// Origin of a role row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleType {
    /// Role defined by the platform rather than by a user.
    System,
}

impl RoleType {
    /// Returns the stored tag value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "System",
        }
    }
}

/// Kind of subject a grant is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignedEntityType {
    /// Grant belongs to a role.
    Role,
}

impl AssignedEntityType {
    /// Returns the stored tag value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "Role",
        }
    }
}

/// Reach of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantScope {
    /// Grant applies everywhere, not to one resource.
    Global,
}

impl GrantScope {
    /// Returns the stored tag value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "Global",
        }
    }
}

/// One row of the role relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacRole {
    id: RoleId,
    owner_id: OwnerId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    name: String,
    description: String,
    role_type: RoleType,
}

impl RbacRole {
    /// Creates a system role row stamped with the compilation instant.
    #[must_use]
    pub fn system(
        id: RoleId,
        owner_id: OwnerId,
        name: impl Into<String>,
        description: impl Into<String>,
        compiled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            created_at: compiled_at,
            updated_at: compiled_at,
            name: name.into(),
            description: description.into(),
            role_type: RoleType::System,
        }
    }

    /// Returns the role identity.
    #[must_use]
    pub fn id(&self) -> &RoleId {
        &self.id
    }

    /// Returns the owner placeholder.
    #[must_use]
    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Returns the creation instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update instant.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the role type tag.
    #[must_use]
    pub fn role_type(&self) -> RoleType {
        self.role_type
    }
}

/// One row of the permission grant relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacPermissionGrant {
    id: GrantId,
    created_at: DateTime<Utc>,
    assigned_entity_type: AssignedEntityType,
    assigned_entity_id: RoleId,
    namespace: String,
    permission: String,
    scope: GrantScope,
    resource: Option<String>,
}

impl RbacPermissionGrant {
    /// Creates a global grant of one namespaced permission to a role.
    #[must_use]
    pub fn global_for_role(
        id: GrantId,
        role_id: RoleId,
        namespace: impl Into<String>,
        permission: impl Into<String>,
        compiled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            created_at: compiled_at,
            assigned_entity_type: AssignedEntityType::Role,
            assigned_entity_id: role_id,
            namespace: namespace.into(),
            permission: permission.into(),
            scope: GrantScope::Global,
            resource: None,
        }
    }

    /// Returns the grant identity.
    #[must_use]
    pub fn id(&self) -> &GrantId {
        &self.id
    }

    /// Returns the creation instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the grantee kind.
    #[must_use]
    pub fn assigned_entity_type(&self) -> AssignedEntityType {
        self.assigned_entity_type
    }

    /// Returns the grantee identity.
    #[must_use]
    pub fn assigned_entity_id(&self) -> &RoleId {
        &self.assigned_entity_id
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// Returns the permission action.
    #[must_use]
    pub fn permission(&self) -> &str {
        self.permission.as_str()
    }

    /// Returns the scope tag.
    #[must_use]
    pub fn scope(&self) -> GrantScope {
        self.scope
    }

    /// Returns the resource discriminator, reserved for resource-scoped grants.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }
}
