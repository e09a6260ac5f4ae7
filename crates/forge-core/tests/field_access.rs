//! Field Access Tests
//!
//! Field reads and writes through the engine:
//! - Private and final fields are writable
//! - Lookup walks the superclass chain, nearest declaration first
//! - Coercion to the declared field type
//!
//! # Running Tests
//! ```bash
//! cargo test --test field_access
//! ```

mod common;

use forge_core::ForgeError;
use forge_types::Value;

// ===== Override Tests =====

#[test]
fn test_private_final_field_is_writable() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Savings").unwrap();
    let savings = value.as_object().unwrap();

    // Assigned by the private Account constructor
    assert_eq!(forge.get_field(savings, "id").unwrap(), Value::Long(1000));

    forge.set_field(savings, "id", Value::Long(7)).unwrap();
    assert_eq!(forge.get_field(savings, "id").unwrap(), Value::Long(7));

    // Repeating the write has the same visible effect
    forge.set_field(savings, "id", Value::Long(7)).unwrap();
    assert_eq!(forge.get_field(savings, "id").unwrap(), Value::Long(7));
}

#[test]
fn test_field_modifiers_are_not_changed() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Savings").unwrap();
    let savings = value.as_object().unwrap();

    forge.set_field(savings, "bonus", Value::Double(2.0)).unwrap();

    let account = forge.registry().get("bank.Account").unwrap();
    let id = account.declared_field("id").unwrap();
    assert!(id.modifiers.is_final);
    assert!(!id.modifiers.is_public());
}

// ===== Hierarchy Tests =====

#[test]
fn test_nearest_declaration_wins() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Savings").unwrap();
    let savings = value.as_object().unwrap();

    // Savings.owner shadows Account.owner, which its initializer set
    assert_eq!(forge.get_field(savings, "owner").unwrap(), Value::Null);
    forge.set_field(savings, "owner", Value::str("ada")).unwrap();
    assert_eq!(forge.get_field(savings, "owner").unwrap(), Value::str("ada"));

    let account = savings.class().superclass().unwrap();
    let hidden = account.declared_field("owner").unwrap();
    assert_eq!(savings.load(hidden.slot), Some(Value::str("nobody")));
}

#[test]
fn test_inherited_field_through_synthetic_type() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Account").unwrap();
    let account = value.as_object().unwrap();

    assert_eq!(forge.get_field(account, "owner").unwrap(), Value::str("nobody"));
    forge.set_field(account, "owner", Value::str("grace")).unwrap();
    assert_eq!(
        forge.invoke(account, "describe", &[]).unwrap(),
        Value::str("account of grace")
    );
}

#[test]
fn test_field_not_found() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Savings").unwrap();
    let savings = value.as_object().unwrap();

    let err = forge.get_field(savings, "overdraft").unwrap_err();
    assert!(matches!(
        err,
        ForgeError::FieldNotFound { ref type_name, ref field }
            if type_name == "bank.Savings" && field == "overdraft"
    ));
}

// ===== Coercion Tests =====

#[test]
fn test_widening_and_mismatch() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Savings").unwrap();
    let savings = value.as_object().unwrap();

    forge.set_field(savings, "id", Value::Int(5)).unwrap();
    assert_eq!(forge.get_field(savings, "id").unwrap(), Value::Long(5));

    forge.set_field(savings, "bonus", Value::Int(2)).unwrap();
    assert_eq!(forge.get_field(savings, "bonus").unwrap(), Value::Double(2.0));

    assert!(matches!(
        forge.set_field(savings, "id", Value::Null),
        Err(ForgeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        forge.set_field(savings, "id", Value::Double(1.0)),
        Err(ForgeError::TypeMismatch { .. })
    ));
    assert_eq!(forge.get_field(savings, "id").unwrap(), Value::Long(5));
}

#[test]
fn test_object_fields_accept_subtypes() {
    use forge_types::{FieldDefinition, TypeBuilder, TypeRef};

    let forge = common::bank_forge();
    forge
        .registry()
        .define(
            TypeBuilder::class("bank.Statement")
                .field(FieldDefinition::new("ledger", TypeRef::class("bank.Ledger")).private())
                .build()
                .unwrap(),
        )
        .unwrap();

    let statement = forge.force_instance("bank.Statement").unwrap();
    let statement = statement.as_object().unwrap();
    let savings = forge.force_instance("bank.Savings").unwrap();
    let vault = forge.force_instance("bank.Vault").unwrap();

    forge.set_field(statement, "ledger", savings.clone()).unwrap();
    assert_eq!(forge.get_field(statement, "ledger").unwrap(), savings);

    let err = forge.set_field(statement, "ledger", vault).unwrap_err();
    assert!(matches!(
        err,
        ForgeError::TypeMismatch { ref expected, ref actual, .. }
            if expected == "bank.Ledger" && actual == "bank.Vault"
    ));

    forge.set_field(statement, "ledger", Value::Null).unwrap();
}
