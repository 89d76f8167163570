use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use rbac_seed_core::AppResult;
use rbac_seed_domain::{OwnerId, RbacPermissionGrant, RbacRole, RoleId, SeedDeclaration};

use crate::{
    Clock, DuplicateRolePolicy, GrantCompiler, IdGenerator, RoleCompiler, SeedArtifacts,
    SeedWriter,
};


/// Both relations of one compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSeed {
    /// Instant stamped on every row.
    pub compiled_at: DateTime<Utc>,
    /// Role rows in declaration order.
    pub roles: Vec<RbacRole>,
    /// Grant rows in declaration order.
    pub grants: Vec<RbacPermissionGrant>,
}

impl CompiledSeed {
    /// Iterates grants assigned to one role identity.
    pub fn grants_for<'a>(
        &'a self,
        role_id: &'a RoleId,
    ) -> impl Iterator<Item = &'a RbacPermissionGrant> + 'a {
        self.grants
            .iter()
            .filter(move |grant| grant.assigned_entity_id() == role_id)
    }

    /// Returns `(role name, grant count)` for every role row, in row order.
    ///
    /// When several rows carry the same identity, its grants are counted
    /// once, on the last such row, so the counts always sum to the number
    /// of grant rows.
    #[must_use]
    pub fn grant_counts_by_role(&self) -> Vec<(&str, usize)> {
        let mut grant_counts: HashMap<&RoleId, usize> = HashMap::new();
        for grant in &self.grants {
            *grant_counts.entry(grant.assigned_entity_id()).or_default() += 1;
        }
        let last_row_by_id: HashMap<&RoleId, usize> = self
            .roles
            .iter()
            .enumerate()
            .map(|(row, role)| (role.id(), row))
            .collect();

        self.roles
            .iter()
            .enumerate()
            .map(|(row, role)| {
                let grant_count = if last_row_by_id.get(role.id()) == Some(&row) {
                    grant_counts.get(role.id()).copied().unwrap_or_default()
                } else {
                    0
                };
                (role.name(), grant_count)
            })
            .collect()
    }
}

/// Summary of a written compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Number of role rows written.
    pub role_count: usize,
    /// Number of grant rows written.
    pub grant_count: usize,
    /// Where the relations landed.
    pub artifacts: SeedArtifacts,
}

/// Knobs applied to every run of a [`SeedCompilationService`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedCompilationOptions {
    /// Placeholder stamped on role rows.
    pub owner_id: OwnerId,
    /// Handling of repeated role names.
    pub duplicate_policy: DuplicateRolePolicy,
}

/// Application service running role and grant compilation as one unit.
#[derive(Clone)]
pub struct SeedCompilationService {
    clock: Arc<dyn Clock>,
    role_compiler: RoleCompiler,
    grant_compiler: GrantCompiler,
    writer: Arc<dyn SeedWriter>,
}

impl SeedCompilationService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        id_generator: Arc<dyn IdGenerator>,
        writer: Arc<dyn SeedWriter>,
        options: SeedCompilationOptions,
    ) -> Self {
        Self {
            clock,
            role_compiler: RoleCompiler::new(id_generator.clone(), options.owner_id)
                .with_duplicate_policy(options.duplicate_policy),
            grant_compiler: GrantCompiler::new(id_generator),
            writer,
        }
    }

    /// Compiles both relations without persisting them.
    pub fn compile(&self, declaration: &SeedDeclaration) -> AppResult<CompiledSeed> {
        let compiled_at = self.clock.now();
        let compiled_roles = self.role_compiler.compile(declaration.roles(), compiled_at)?;
        let grants = self.grant_compiler.compile(
            &compiled_roles.identities,
            declaration.permissions(),
            compiled_at,
        )?;

        Ok(CompiledSeed {
            compiled_at,
            roles: compiled_roles.rows,
            grants,
        })
    }

    /// Compiles both relations and hands them to the writer.
    ///
    /// The writer is only reached once compilation has fully succeeded.
    pub fn compile_and_write(&self, declaration: &SeedDeclaration) -> AppResult<SeedReport> {
        let seed = self.compile(declaration)?;
        let artifacts = self.writer.write(&seed)?;

        info!(
            role_count = seed.roles.len(),
            grant_count = seed.grants.len(),
            role_location = %artifacts.role_location,
            grant_location = %artifacts.grant_location,
            "seed relations written"
        );

        Ok(SeedReport {
            role_count: seed.roles.len(),
            grant_count: seed.grants.len(),
            artifacts,
        })
    }
}
