use std::env;
use std::path::{Component, Path, PathBuf};

use rbac_seed_application::DuplicateRolePolicy;
use rbac_seed_core::{AppError, AppResult};
use rbac_seed_domain::OwnerId;
use rbac_seed_infrastructure::{DEFAULT_GRANT_FILE_NAME, DEFAULT_ROLE_FILE_NAME};

/// What the binary does after compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Write,
    Check,
}

impl RunMode {
    pub fn from_arg(arg: Option<&str>) -> AppResult<Self> {
        match arg {
            None | Some("write") => Ok(Self::Write),
            Some("check") => Ok(Self::Check),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'write' or 'check'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub declaration_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub role_file_name: String,
    pub grant_file_name: String,
    pub owner_id: OwnerId,
    pub duplicate_policy: DuplicateRolePolicy,
}

impl SeedConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let declaration_path = non_blank("RBAC_SEED_DECLARATION_PATH").map(PathBuf::from);
        let output_dir = non_blank("RBAC_SEED_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let role_file_name = non_blank("RBAC_SEED_ROLE_FILE")
            .unwrap_or_else(|| DEFAULT_ROLE_FILE_NAME.to_owned());
        let grant_file_name = non_blank("RBAC_SEED_GRANT_FILE")
            .unwrap_or_else(|| DEFAULT_GRANT_FILE_NAME.to_owned());

        require_plain_file_name("RBAC_SEED_ROLE_FILE", role_file_name.as_str())?;
        require_plain_file_name("RBAC_SEED_GRANT_FILE", grant_file_name.as_str())?;
        if role_file_name.eq_ignore_ascii_case(grant_file_name.as_str()) {
            return Err(AppError::Validation(
                "RBAC_SEED_ROLE_FILE and RBAC_SEED_GRANT_FILE must differ".to_owned(),
            ));
        }

        let owner_id = non_blank("RBAC_SEED_OWNER_ID")
            .map(|value| {
                OwnerId::parse(value).map_err(|error| {
                    AppError::Validation(format!("invalid RBAC_SEED_OWNER_ID: {error}"))
                })
            })
            .transpose()?
            .unwrap_or_default();

        let duplicate_policy = match non_blank("RBAC_SEED_REJECT_DUPLICATE_ROLES") {
            None => DuplicateRolePolicy::LaterWins,
            Some(value) if value.eq_ignore_ascii_case("true") => DuplicateRolePolicy::Reject,
            Some(value) if value.eq_ignore_ascii_case("false") => DuplicateRolePolicy::LaterWins,
            Some(value) => {
                return Err(AppError::Validation(format!(
                    "invalid RBAC_SEED_REJECT_DUPLICATE_ROLES value '{value}', expected true or false"
                )));
            }
        };

        Ok(Self {
            declaration_path,
            output_dir,
            role_file_name,
            grant_file_name,
            owner_id,
            duplicate_policy,
        })
    }
}

fn require_plain_file_name(variable: &str, file_name: &str) -> AppResult<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::Validation(format!(
            "{variable} must be a plain file name inside RBAC_SEED_OUTPUT_DIR, got '{file_name}'"
        ))),
    }
}
