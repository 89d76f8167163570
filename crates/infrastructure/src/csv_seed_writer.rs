//! Seed relation writer producing the `;`-delimited CSV dialect expected by
//! the access-control store.
//!
//! Both relations are staged as temporary files next to their targets and
//! only renamed into place after both have been written and synced. The
//! previous role relation is kept aside until the grant relation has landed
//! and is put back when that rename fails, so a failed run never replaces one
//! relation without the other.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};
use rbac_seed_application::{CompiledSeed, SeedArtifacts, SeedWriter};
use rbac_seed_core::{AppError, AppResult};
use rbac_seed_domain::{RbacPermissionGrant, RbacRole, format_seed_timestamp};
use tempfile::NamedTempFile;
use tracing::{info, warn};


/// Default file name of the role relation.
pub const DEFAULT_ROLE_FILE_NAME: &str = "RbacRole.csv";
/// Default file name of the permission grant relation.
pub const DEFAULT_GRANT_FILE_NAME: &str = "RbacPermissionGrants.csv";

const ROLE_HEADER: [&str; 7] = [
    "Id",
    "OwnerId",
    "CreatedAt",
    "UpdatedAt",
    "Name",
    "Description",
    "Type",
];

const GRANT_HEADER: [&str; 8] = [
    "Id",
    "CreatedAt",
    "AssignedEntityType",
    "AssignedEntityId",
    "Namespace",
    "Permission",
    "Type",
    "Resource",
];

/// Writes both seed relations into one output directory.
#[derive(Debug, Clone)]
pub struct CsvSeedWriter {
    output_dir: PathBuf,
    role_file_name: String,
    grant_file_name: String,
}

impl CsvSeedWriter {
    /// Creates a writer using the default relation file names.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            role_file_name: DEFAULT_ROLE_FILE_NAME.to_owned(),
            grant_file_name: DEFAULT_GRANT_FILE_NAME.to_owned(),
        }
    }

    /// Overrides the relation file names.
    #[must_use]
    pub fn with_file_names(
        mut self,
        role_file_name: impl Into<String>,
        grant_file_name: impl Into<String>,
    ) -> Self {
        self.role_file_name = role_file_name.into();
        self.grant_file_name = grant_file_name.into();
        self
    }

    /// Returns the target path of the role relation.
    #[must_use]
    pub fn role_path(&self) -> PathBuf {
        self.output_dir.join(self.role_file_name.as_str())
    }

    /// Returns the target path of the permission grant relation.
    #[must_use]
    pub fn grant_path(&self) -> PathBuf {
        self.output_dir.join(self.grant_file_name.as_str())
    }

    fn stage<const N: usize>(
        target: &Path,
        relation: &str,
        header: [&str; N],
        records: impl Iterator<Item = [String; N]>,
    ) -> AppResult<NamedTempFile> {
        let mut staged = NamedTempFile::new_in(staging_dir(target)).map_err(|error| {
            output_error(relation, "failed to create staging file", &error)
        })?;

        {
            let mut writer = WriterBuilder::new()
                .delimiter(b';')
                .terminator(Terminator::CRLF)
                .from_writer(staged.as_file_mut());

            writer
                .write_record(header)
                .map_err(|error| output_error(relation, "failed to write header", &error))?;
            for record in records {
                writer
                    .write_record(&record)
                    .map_err(|error| output_error(relation, "failed to write row", &error))?;
            }
            writer
                .flush()
                .map_err(|error| output_error(relation, "failed to flush rows", &error))?;
        }

        staged
            .as_file()
            .sync_all()
            .map_err(|error| output_error(relation, "failed to sync staging file", &error))?;

        Ok(staged)
    }
}

impl SeedWriter for CsvSeedWriter {
    fn write(&self, seed: &CompiledSeed) -> AppResult<SeedArtifacts> {
        fs::create_dir_all(self.output_dir.as_path()).map_err(|error| {
            AppError::Output(format!(
                "failed to create output directory '{}': {error}",
                self.output_dir.display()
            ))
        })?;

        let role_path = self.role_path();
        let grant_path = self.grant_path();

        let staged_roles = Self::stage(
            role_path.as_path(),
            "role",
            ROLE_HEADER,
            seed.roles.iter().map(role_record),
        )?;
        let staged_grants = Self::stage(
            grant_path.as_path(),
            "grant",
            GRANT_HEADER,
            seed.grants.iter().map(grant_record),
        )?;

        let previous_roles = back_up(role_path.as_path())?;
        persist(staged_roles, role_path.as_path())?;
        if let Err(error) = persist(staged_grants, grant_path.as_path()) {
            restore(previous_roles, role_path.as_path())?;
            warn!(
                role_path = %role_path.display(),
                "grant relation could not be replaced; role relation restored"
            );
            return Err(error);
        }

        sync_dir(staging_dir(role_path.as_path()))?;
        if staging_dir(grant_path.as_path()) != staging_dir(role_path.as_path()) {
            sync_dir(staging_dir(grant_path.as_path()))?;
        }

        info!(
            role_path = %role_path.display(),
            role_rows = seed.roles.len(),
            grant_path = %grant_path.display(),
            grant_rows = seed.grants.len(),
            "seed relations persisted"
        );

        Ok(SeedArtifacts {
            role_location: role_path.display().to_string(),
            grant_location: grant_path.display().to_string(),
        })
    }
}

fn role_record(role: &RbacRole) -> [String; 7] {
    [
        role.id().to_string(),
        role.owner_id().to_string(),
        format_seed_timestamp(&role.created_at()),
        format_seed_timestamp(&role.updated_at()),
        role.name().to_owned(),
        role.description().to_owned(),
        role.role_type().as_str().to_owned(),
    ]
}

fn grant_record(grant: &RbacPermissionGrant) -> [String; 8] {
    [
        grant.id().to_string(),
        format_seed_timestamp(&grant.created_at()),
        grant.assigned_entity_type().as_str().to_owned(),
        grant.assigned_entity_id().to_string(),
        grant.namespace().to_owned(),
        grant.permission().to_owned(),
        grant.scope().as_str().to_owned(),
        grant.resource().unwrap_or_default().to_owned(),
    ]
}

fn staging_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn back_up(target: &Path) -> AppResult<Option<NamedTempFile>> {
    if !target.is_file() {
        return Ok(None);
    }

    let backup_error = |error: &dyn std::fmt::Display| {
        AppError::Output(format!("failed to back up '{}': {error}", target.display()))
    };
    let backup =
        NamedTempFile::new_in(staging_dir(target)).map_err(|error| backup_error(&error))?;
    fs::copy(target, backup.path()).map_err(|error| backup_error(&error))?;
    backup
        .as_file()
        .sync_all()
        .map_err(|error| backup_error(&error))?;

    Ok(Some(backup))
}

fn restore(previous: Option<NamedTempFile>, target: &Path) -> AppResult<()> {
    let restored = match previous {
        Some(backup) => backup.persist(target).map(|_| ()).map_err(|error| error.error),
        None => fs::remove_file(target),
    };

    restored.map_err(|error| {
        AppError::Output(format!(
            "failed to restore previous relation '{}': {error}",
            target.display()
        ))
    })
}

fn sync_dir(path: &Path) -> AppResult<()> {
    fs::File::open(path)
        .and_then(|directory| directory.sync_all())
        .map_err(|error| {
            AppError::Output(format!(
                "failed to sync output directory '{}': {error}",
                path.display()
            ))
        })
}

fn persist(staged: NamedTempFile, target: &Path) -> AppResult<()> {
    staged.persist(target).map(|_| ()).map_err(|error| {
        AppError::Output(format!(
            "failed to move relation into '{}': {}",
            target.display(),
            error.error
        ))
    })
}

fn output_error(relation: &str, action: &str, error: &dyn std::fmt::Display) -> AppError {
    AppError::Output(format!("{action} for {relation} relation: {error}"))
}
