//! Application services and ports.

#![forbid(unsafe_code)]

mod grant_compiler;
mod role_compiler;
mod seed_compilation_service;
mod seed_ports;

#[cfg(test)]
mod test_support;

pub use grant_compiler::GrantCompiler;
pub use role_compiler::{CompiledRoles, DuplicateRolePolicy, RoleCompiler, RoleIdentityMap};
pub use seed_compilation_service::{
    CompiledSeed, SeedCompilationOptions, SeedCompilationService, SeedReport,
};
pub use seed_ports::{Clock, DeclarationSource, IdGenerator, SeedArtifacts, SeedWriter};
