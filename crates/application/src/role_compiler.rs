use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use rbac_seed_core::{AppError, AppResult};
use rbac_seed_domain::{OwnerId, RbacRole, RoleDeclaration, RoleId};

use crate::IdGenerator;

#[cfg(test)]
mod tests;

/// Handling of role names declared more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateRolePolicy {
    /// Every row is emitted; the last declaration wins name resolution.
    #[default]
    LaterWins,
    /// The run fails before any row is produced.
    Reject,
}

/// Role name to identity mapping produced by the role compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleIdentityMap(HashMap<String, RoleId>);

impl RoleIdentityMap {
    /// Resolves a role name to its identity for this run.
    pub fn resolve(&self, role_name: &str) -> AppResult<&RoleId> {
        self.0
            .get(role_name)
            .ok_or_else(|| AppError::UnresolvedRoleReference(role_name.to_owned()))
    }

    /// Returns the number of distinct role names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no role was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn record(&mut self, role_name: &str, role_id: RoleId) -> Option<RoleId> {
        self.0.insert(role_name.to_owned(), role_id)
    }
}

/// Output of one role compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRoles {
    /// Role rows in declaration order.
    pub rows: Vec<RbacRole>,
    /// Resolution map handed to the grant compiler.
    pub identities: RoleIdentityMap,
}

/// Turns role declarations into role rows with durable identities.
#[derive(Clone)]
pub struct RoleCompiler {
    id_generator: Arc<dyn IdGenerator>,
    owner_id: OwnerId,
    duplicate_policy: DuplicateRolePolicy,
}

impl RoleCompiler {
    /// Creates a role compiler stamping rows with the given owner placeholder.
    #[must_use]
    pub fn new(id_generator: Arc<dyn IdGenerator>, owner_id: OwnerId) -> Self {
        Self {
            id_generator,
            owner_id,
            duplicate_policy: DuplicateRolePolicy::default(),
        }
    }

    /// Overrides how repeated role names are handled.
    #[must_use]
    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicateRolePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Compiles declared roles in order.
    ///
    /// A declared identity is reused verbatim; otherwise a fresh one is minted.
    pub fn compile(
        &self,
        roles: &[RoleDeclaration],
        compiled_at: DateTime<Utc>,
    ) -> AppResult<CompiledRoles> {
        if self.duplicate_policy == DuplicateRolePolicy::Reject {
            reject_duplicate_names(roles)?;
        }

        let mut rows = Vec::with_capacity(roles.len());
        let mut identities = RoleIdentityMap::default();

        for role in roles {
            let role_id = role
                .existing_id()
                .cloned()
                .unwrap_or_else(|| RoleId::from_uuid(self.id_generator.new_id()));

            if let Some(replaced) = identities.record(role.name().as_str(), role_id.clone()) {
                warn!(
                    role_name = %role.name(),
                    replaced_role_id = %replaced,
                    role_id = %role_id,
                    "role declared more than once; later declaration wins grant resolution"
                );
            }

            rows.push(RbacRole::system(
                role_id,
                self.owner_id.clone(),
                role.name().as_str(),
                role.description(),
                compiled_at,
            ));
        }

        Ok(CompiledRoles { rows, identities })
    }
}

fn reject_duplicate_names(roles: &[RoleDeclaration]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(roles.len());
    for role in roles {
        if !seen.insert(role.name().as_str()) {
            return Err(AppError::Conflict(format!(
                "role '{}' is declared more than once",
                role.name()
            )));
        }
    }

    Ok(())
}
