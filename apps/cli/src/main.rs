//! RBAC seed generator: compiles the role and permission declaration into the
//! role and permission grant relations loaded by the access-control store.

#![forbid(unsafe_code)]

mod seed_config;

use std::env;
use std::sync::Arc;

use rbac_seed_application::{
    CompiledSeed, DeclarationSource, SeedCompilationOptions, SeedCompilationService,
};
use rbac_seed_core::AppError;
use rbac_seed_infrastructure::{
    CsvSeedWriter, JsonDeclarationSource, SystemClock, UuidV4IdGenerator,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::seed_config::{RunMode, SeedConfig};

const BASELINE_DECLARATION: &str = include_str!("../seeds/baseline.json");

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let run_mode = RunMode::from_arg(env::args().nth(1).as_deref())?;
    let config = SeedConfig::load()?;

    let declaration_source = build_declaration_source(&config);
    let declaration = declaration_source.load()?;

    let service = SeedCompilationService::new(
        Arc::new(SystemClock),
        Arc::new(UuidV4IdGenerator),
        Arc::new(
            CsvSeedWriter::new(config.output_dir.as_path())
                .with_file_names(config.role_file_name.as_str(), config.grant_file_name.as_str()),
        ),
        SeedCompilationOptions {
            owner_id: config.owner_id.clone(),
            duplicate_policy: config.duplicate_policy,
        },
    );

    match run_mode {
        RunMode::Check => {
            let seed = service.compile(&declaration)?;
            log_summary(&seed);
            info!(
                role_count = seed.roles.len(),
                grant_count = seed.grants.len(),
                "seed declaration compiles; nothing written"
            );
        }
        RunMode::Write => {
            let report = service.compile_and_write(&declaration)?;
            info!(
                role_count = report.role_count,
                grant_count = report.grant_count,
                role_file = %report.artifacts.role_location,
                grant_file = %report.artifacts.grant_location,
                "rbac seed generated"
            );
        }
    }

    Ok(())
}

fn build_declaration_source(config: &SeedConfig) -> Box<dyn DeclarationSource> {
    match &config.declaration_path {
        Some(path) => Box::new(JsonDeclarationSource::from_path(path.as_path())),
        None => Box::new(JsonDeclarationSource::embedded(
            "baseline",
            BASELINE_DECLARATION,
        )),
    }
}

fn log_summary(seed: &CompiledSeed) {
    for (role_name, grant_count) in seed.grant_counts_by_role() {
        debug!(role_name = role_name, grant_count = grant_count, "role summary");
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
