use chrono::{DateTime, Utc};
use uuid::Uuid;

use rbac_seed_core::AppResult;
use rbac_seed_domain::SeedDeclaration;

use crate::CompiledSeed;

/// Source of the compilation instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier never handed out before.
    fn new_id(&self) -> Uuid;
}

/// Locations of the relations produced by a [`SeedWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedArtifacts {
    /// Where the role relation was written.
    pub role_location: String,
    /// Where the permission grant relation was written.
    pub grant_location: String,
}

/// Output port persisting both seed relations as one unit.
pub trait SeedWriter: Send + Sync {
    /// Writes both relations; either both are finalized or neither is.
    fn write(&self, seed: &CompiledSeed) -> AppResult<SeedArtifacts>;
}

/// Input port supplying the declaration for one run.
pub trait DeclarationSource: Send + Sync {
    /// Human-readable origin used in logs.
    fn origin(&self) -> String;

    /// Loads and validates the declaration.
    fn load(&self) -> AppResult<SeedDeclaration>;
}
