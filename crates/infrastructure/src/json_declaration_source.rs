use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use rbac_seed_application::DeclarationSource;
use rbac_seed_core::{AppError, AppResult};
use rbac_seed_domain::SeedDeclaration;
use tracing::info;

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Embedded {
        name: &'static str,
        document: &'static str,
    },
}

/// Declaration source reading the JSON document format.
#[derive(Debug, Clone)]
pub struct JsonDeclarationSource {
    origin: Origin,
}

impl JsonDeclarationSource {
    /// Reads the declaration from a file on disk.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(path.into()),
        }
    }

    /// Uses a declaration compiled into the binary.
    #[must_use]
    pub fn embedded(name: &'static str, document: &'static str) -> Self {
        Self {
            origin: Origin::Embedded { name, document },
        }
    }

    fn parse(&self, document: &str) -> AppResult<SeedDeclaration> {
        serde_json::from_str(document).map_err(|error| {
            AppError::Validation(format!(
                "invalid seed declaration in {}: {error}",
                self.origin()
            ))
        })
    }
}

impl DeclarationSource for JsonDeclarationSource {
    fn origin(&self) -> String {
        match &self.origin {
            Origin::File(path) => path.display().to_string(),
            Origin::Embedded { name, .. } => format!("built-in:{name}"),
        }
    }

    fn load(&self) -> AppResult<SeedDeclaration> {
        let declaration = match &self.origin {
            Origin::File(path) => {
                let document = fs::read_to_string(path).map_err(|error| match error.kind() {
                    ErrorKind::NotFound => AppError::NotFound(format!(
                        "seed declaration file '{}'",
                        path.display()
                    )),
                    _ => AppError::Internal(format!(
                        "failed to read seed declaration '{}': {error}",
                        path.display()
                    )),
                })?;
                self.parse(document.as_str())?
            }
            Origin::Embedded { document, .. } => self.parse(document)?,
        };

        info!(
            origin = %self.origin(),
            role_count = declaration.roles().len(),
            grant_count = declaration.permissions().triple_count(),
            "seed declaration loaded"
        );

        Ok(declaration)
    }
}
