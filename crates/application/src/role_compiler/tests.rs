use std::sync::Arc;

use rbac_seed_core::AppError;
use rbac_seed_domain::{OwnerId, RoleDeclaration, RoleId};

use crate::test_support::{FixedClock, RandomIdGenerator, SequentialIdGenerator};
use crate::{Clock, DuplicateRolePolicy};

use super::RoleCompiler;

const READER_ID: &str = "22DAB91B-C2D8-4840-A173-1416EF1B882D";

fn declared(name: &str, existing_id: Option<&str>, description: &str) -> RoleDeclaration {
    let existing_id =
        existing_id.map(|value| RoleId::parse(value).unwrap_or_else(|_| unreachable!()));
    RoleDeclaration::new(name, existing_id, description).unwrap_or_else(|_| unreachable!())
}

fn sequential_compiler() -> RoleCompiler {
    RoleCompiler::new(
        Arc::new(SequentialIdGenerator::default()),
        OwnerId::default(),
    )
}

#[test]
fn declared_identity_is_reused_verbatim() {
    let compiler = sequential_compiler();
    let roles = vec![declared("Reader", Some(READER_ID), "ro")];

    let compiled = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    assert!(compiled.is_ok());
    let compiled = compiled.unwrap_or_else(|_| unreachable!());

    assert_eq!(compiled.rows.len(), 1);
    assert_eq!(compiled.rows[0].id().as_str(), READER_ID);
    assert_eq!(compiled.rows[0].name(), "Reader");
    assert_eq!(compiled.rows[0].description(), "ro");
    assert_eq!(compiled.rows[0].role_type().as_str(), "System");
    assert_eq!(
        compiled.identities.resolve("Reader").map(|id| id.as_str()).ok(),
        Some(READER_ID)
    );
}

#[test]
fn declared_identity_is_stable_across_runs() {
    let compiler = RoleCompiler::new(Arc::new(RandomIdGenerator), OwnerId::default());
    let roles = vec![declared("Reader", Some(READER_ID), "ro")];

    let first = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    let second = compiler.compile(&roles, FixedClock::at_epoch_offset(60).now());
    assert!(first.is_ok());
    assert!(second.is_ok());

    let first = first.unwrap_or_else(|_| unreachable!());
    let second = second.unwrap_or_else(|_| unreachable!());
    assert_eq!(first.rows[0].id(), second.rows[0].id());
}

#[test]
fn missing_identity_is_minted_fresh_per_run() {
    let compiler = RoleCompiler::new(Arc::new(RandomIdGenerator), OwnerId::default());
    let roles = vec![declared("Auditor", None, "audit")];

    let first = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    let second = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    assert!(first.is_ok());
    assert!(second.is_ok());

    let first = first.unwrap_or_else(|_| unreachable!());
    let second = second.unwrap_or_else(|_| unreachable!());
    assert_ne!(first.rows[0].id(), second.rows[0].id());
}

#[test]
fn mints_only_for_roles_without_identity() {
    let id_generator = Arc::new(SequentialIdGenerator::default());
    let compiler = RoleCompiler::new(id_generator.clone(), OwnerId::default());
    let roles = vec![
        declared("Owner", None, "all"),
        declared("Reader", Some(READER_ID), "ro"),
        declared("Guest", None, "limited"),
    ];

    let compiled = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    assert!(compiled.is_ok());
    let compiled = compiled.unwrap_or_else(|_| unreachable!());

    assert_eq!(id_generator.issued(), 2);
    assert_eq!(
        compiled.rows[0].id().as_str(),
        "00000000-0000-0000-0000-000000000001"
    );
    assert_eq!(compiled.rows[1].id().as_str(), READER_ID);
    assert_eq!(
        compiled.rows[2].id().as_str(),
        "00000000-0000-0000-0000-000000000002"
    );
}

#[test]
fn rows_share_owner_and_compilation_instant() {
    let owner_id = OwnerId::parse("0000DFD5-0000-0000-0000-00000000000B")
        .unwrap_or_else(|_| unreachable!());
    let compiler = RoleCompiler::new(
        Arc::new(SequentialIdGenerator::default()),
        owner_id.clone(),
    );
    let instant = FixedClock::at_epoch_offset(42).now();
    let roles = vec![
        declared("Owner", None, "all"),
        declared("Guest", None, "limited"),
    ];

    let compiled = compiler.compile(&roles, instant);
    assert!(compiled.is_ok());

    for row in compiled.unwrap_or_else(|_| unreachable!()).rows {
        assert_eq!(row.owner_id(), &owner_id);
        assert_eq!(row.created_at(), instant);
        assert_eq!(row.updated_at(), instant);
    }
}

#[test]
fn duplicate_names_emit_both_rows_and_later_wins() {
    let compiler = sequential_compiler();
    let roles = vec![
        declared("Reader", Some(READER_ID), "first"),
        declared("Reader", None, "second"),
    ];

    let compiled = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    assert!(compiled.is_ok());
    let compiled = compiled.unwrap_or_else(|_| unreachable!());

    assert_eq!(compiled.rows.len(), 2);
    assert_eq!(compiled.identities.len(), 1);
    assert_eq!(
        compiled.identities.resolve("Reader").ok(),
        Some(compiled.rows[1].id())
    );
}

#[test]
fn reject_policy_fails_on_duplicate_names() {
    let compiler = sequential_compiler().with_duplicate_policy(DuplicateRolePolicy::Reject);
    let roles = vec![
        declared("Reader", None, "first"),
        declared("Reader", None, "second"),
    ];

    let compiled = compiler.compile(&roles, FixedClock::at_epoch_offset(0).now());
    assert!(matches!(compiled, Err(AppError::Conflict(_))));
}

#[test]
fn unknown_name_is_an_unresolved_reference() {
    let compiler = sequential_compiler();
    let compiled = compiler.compile(&[], FixedClock::at_epoch_offset(0).now());
    assert!(compiled.is_ok());
    let compiled = compiled.unwrap_or_else(|_| unreachable!());

    assert!(compiled.identities.is_empty());
    assert!(matches!(
        compiled.identities.resolve("Phantom"),
        Err(AppError::UnresolvedRoleReference(name)) if name == "Phantom"
    ));
}
