use rbac_seed_application::IdGenerator;
use uuid::Uuid;

/// Identifier generator producing random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4IdGenerator;

impl IdGenerator for UuidV4IdGenerator {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
