//! Identity tokens carried by seed rows.
//!
//! Identities are kept as the exact text they were created from. Declared
//! role identities in particular must survive regeneration byte-for-byte,
//! including their letter case, so the text is never re-rendered through
//! [`Uuid`].

use rbac_seed_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner placeholder emitted on every role row.
pub const DEFAULT_OWNER_ID: &str = "0000DFD5-0000-0000-0000-00000000000A";

const HYPHENATED_UUID_LENGTH: usize = 36;

fn canonical_uuid_text(value: String, label: &str) -> AppResult<String> {
    if value.len() != HYPHENATED_UUID_LENGTH {
        return Err(AppError::Validation(format!(
            "{label} '{value}' must be a hyphenated UUID"
        )));
    }

    Uuid::try_parse(value.as_str()).map_err(|error| {
        AppError::Validation(format!("{label} '{value}' is not a valid UUID: {error}"))
    })?;

    Ok(value)
}

/// Durable identifier of a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
    /// Validates a declared role identifier and keeps its text verbatim.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        canonical_uuid_text(value.into(), "role id").map(Self)
    }

    /// Creates a role identifier from a freshly minted UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RoleId> for String {
    fn from(value: RoleId) -> Self {
        value.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Per-run identifier of a permission grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantId(String);

impl GrantId {
    /// Creates a grant identifier from a freshly minted UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for GrantId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Owner placeholder carried through to role rows without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Validates an owner identifier and keeps its text verbatim.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        canonical_uuid_text(value.into(), "owner id").map(Self)
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self(DEFAULT_OWNER_ID.to_owned())
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{DEFAULT_OWNER_ID, OwnerId, RoleId};

    #[test]
    fn declared_role_id_keeps_letter_case() {
        let role_id = RoleId::parse("36202DFB-D106-440D-8B99-F11BC8D77C9C");
        assert!(role_id.is_ok());
        assert_eq!(
            role_id.unwrap_or_else(|_| unreachable!()).as_str(),
            "36202DFB-D106-440D-8B99-F11BC8D77C9C"
        );
    }

    #[test]
    fn role_id_rejects_non_uuid_text() {
        assert!(RoleId::parse("owner").is_err());
        assert!(RoleId::parse("36202DFB-D106-440D-8B99-F11BC8D77C9Z").is_err());
    }

    #[test]
    fn role_id_rejects_simple_uuid_form() {
        assert!(RoleId::parse("36202dfbd106440d8b99f11bc8d77c9c").is_err());
    }

    #[test]
    fn minted_role_id_is_hyphenated() {
        let role_id = RoleId::from_uuid(Uuid::new_v4());
        assert_eq!(role_id.as_str().len(), 36);
        assert_eq!(role_id.as_str().matches('-').count(), 4);
    }

    #[test]
    fn default_owner_is_the_placeholder() {
        assert_eq!(OwnerId::default().as_str(), DEFAULT_OWNER_ID);
        assert!(OwnerId::parse(DEFAULT_OWNER_ID).is_ok());
    }
}
