use indexmap::IndexMap;
use rbac_seed_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::RoleId;

/// Declared role, optionally pinned to a pre-existing identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoleDeclarationDocument")]
pub struct RoleDeclaration {
    name: NonEmptyString,
    #[serde(rename = "existing-id", skip_serializing_if = "Option::is_none")]
    existing_id: Option<RoleId>,
    description: String,
}

impl RoleDeclaration {
    /// Creates a role declaration with a validated name.
    pub fn new(
        name: impl Into<String>,
        existing_id: Option<RoleId>,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            existing_id,
            description: description.into(),
        })
    }

    /// Returns the role name used to resolve grants.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the pre-existing identity, if one was declared.
    #[must_use]
    pub fn existing_id(&self) -> Option<&RoleId> {
        self.existing_id.as_ref()
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RoleDeclarationDocument {
    name: String,
    #[serde(default, rename = "existing-id", alias = "existing_id")]
    existing_id: Option<String>,
    #[serde(default)]
    description: String,
}

impl TryFrom<RoleDeclarationDocument> for RoleDeclaration {
    type Error = AppError;

    fn try_from(document: RoleDeclarationDocument) -> Result<Self, Self::Error> {
        // An empty identity means "mint one", same as an absent key.
        let existing_id = document
            .existing_id
            .filter(|value| !value.trim().is_empty())
            .map(RoleId::parse)
            .transpose()?;

        Self::new(document.name, existing_id, document.description)
    }
}

/// Ordered permission table: role name, then namespace, then actions.
///
/// Iteration order is the declaration order at every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionDeclaration(IndexMap<String, IndexMap<String, Vec<String>>>);

impl PermissionDeclaration {
    /// Creates an empty permission declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends permissions for a role and namespace, keeping first-seen order.
    #[must_use]
    pub fn grant<I, S>(mut self, role_name: &str, namespace: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(role_name.to_owned())
            .or_default()
            .entry(namespace.to_owned())
            .or_default()
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Iterates roles with their namespace tables in declaration order.
    pub fn roles(&self) -> impl Iterator<Item = (&str, &IndexMap<String, Vec<String>>)> {
        self.0
            .iter()
            .map(|(role_name, namespaces)| (role_name.as_str(), namespaces))
    }

    /// Returns the number of (role, namespace, permission) triples.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.0
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Returns true when no role carries any namespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Complete declaration injected into one compilation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedDeclaration {
    roles: Vec<RoleDeclaration>,
    #[serde(default)]
    permissions: PermissionDeclaration,
}

impl SeedDeclaration {
    /// Creates a declaration from ordered roles and their permission table.
    #[must_use]
    pub fn new(roles: Vec<RoleDeclaration>, permissions: PermissionDeclaration) -> Self {
        Self { roles, permissions }
    }

    /// Returns declared roles in declaration order.
    #[must_use]
    pub fn roles(&self) -> &[RoleDeclaration] {
        self.roles.as_slice()
    }

    /// Returns the permission table.
    #[must_use]
    pub fn permissions(&self) -> &PermissionDeclaration {
        &self.permissions
    }
}
