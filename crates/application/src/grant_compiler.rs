use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use rbac_seed_core::AppResult;
use rbac_seed_domain::{GrantId, PermissionDeclaration, RbacPermissionGrant};

use crate::{IdGenerator, RoleIdentityMap};


/// Expands the permission table into one grant row per declared action.
#[derive(Clone)]
pub struct GrantCompiler {
    id_generator: Arc<dyn IdGenerator>,
}

impl GrantCompiler {
    /// Creates a grant compiler minting grant identities from the generator.
    #[must_use]
    pub fn new(id_generator: Arc<dyn IdGenerator>) -> Self {
        Self { id_generator }
    }

    /// Compiles grants in role, namespace, permission declaration order.
    ///
    /// Every role named in `permissions` must resolve through `identities`;
    /// the first one that does not aborts compilation with
    /// [`rbac_seed_core::AppError::UnresolvedRoleReference`].
    pub fn compile(
        &self,
        identities: &RoleIdentityMap,
        permissions: &PermissionDeclaration,
        compiled_at: DateTime<Utc>,
    ) -> AppResult<Vec<RbacPermissionGrant>> {
        let mut grants = Vec::with_capacity(permissions.triple_count());

        for (role_name, namespaces) in permissions.roles() {
            let role_id = identities.resolve(role_name)?;
            let first_row = grants.len();

            for (namespace, actions) in namespaces {
                for action in actions {
                    grants.push(RbacPermissionGrant::global_for_role(
                        GrantId::from_uuid(self.id_generator.new_id()),
                        role_id.clone(),
                        namespace.as_str(),
                        action.as_str(),
                        compiled_at,
                    ));
                }
            }

            debug!(
                role_name = role_name,
                role_id = %role_id,
                grant_count = grants.len() - first_row,
                "compiled role grants"
            );
        }

        Ok(grants)
    }
}
