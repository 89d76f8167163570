//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod csv_seed_writer;
mod json_declaration_source;
mod system_clock;
mod uuid_id_generator;

pub use csv_seed_writer::{CsvSeedWriter, DEFAULT_GRANT_FILE_NAME, DEFAULT_ROLE_FILE_NAME};
pub use json_declaration_source::JsonDeclarationSource;
pub use system_clock::SystemClock;
pub use uuid_id_generator::UuidV4IdGenerator;
