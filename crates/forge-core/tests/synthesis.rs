//! Synthesis Tests
//!
//! Stub implementations of interfaces and abstract classes:
//! - Naming and registration of synthetic types
//! - Stub bodies return the default of their return type
//! - Concrete behaviour of the original type is inherited
//! - Cache identity and configured naming
//!
//! # Running Tests
//! ```bash
//! cargo test --test synthesis
//! ```

mod common;

use std::sync::Arc;

use forge_core::{ForgeError, ForgeOptions};
use forge_types::{MethodDefinition, TypeBuilder, TypeRef, Value};

// ===== Interface Tests =====

#[test]
fn test_interface_stub_defaults() {
    let forge = common::bank_forge();
    let ledger = forge.registry().get("bank.Ledger").unwrap();
    let synthetic = forge.synthesize(&ledger).unwrap();

    assert_eq!(synthetic.name(), "forge.synthetic.Ledger_implementation");
    assert!(synthetic.is_subtype_of(&ledger));
    assert!(!synthetic.is_abstract());

    let value = forge.force_instance("bank.Ledger").unwrap();
    let instance = value.as_object().unwrap();
    assert!(Arc::ptr_eq(instance.class(), &synthetic));
    assert_eq!(forge.invoke(instance, "balance", &[]).unwrap(), Value::Long(0));
    assert_eq!(forge.invoke(instance, "record", &[Value::Int(3)]).unwrap(), Value::Bool(false));
    // Default bodies are not replaced
    assert_eq!(forge.invoke(instance, "label", &[]).unwrap(), Value::str("ledger"));
}

#[test]
fn test_stub_defaults_for_every_return_type() {
    let forge = common::bank_forge();
    forge
        .registry()
        .define(
            TypeBuilder::interface("bank.Codec")
                .method(MethodDefinition::new("flag").returns(TypeRef::BOOLEAN))
                .method(MethodDefinition::new("tag").returns(TypeRef::CHAR))
                .method(MethodDefinition::new("ratio").returns(TypeRef::FLOAT))
                .method(MethodDefinition::new("name").returns(TypeRef::String))
                .method(MethodDefinition::new("peer").returns(TypeRef::class("bank.Codec")))
                .method(MethodDefinition::new("bytes").returns(TypeRef::array_of(TypeRef::BYTE)))
                .method(MethodDefinition::new("flush"))
                .build()
                .unwrap(),
        )
        .unwrap();

    let value = forge.force_instance("bank.Codec").unwrap();
    let codec = value.as_object().unwrap();
    assert_eq!(forge.invoke(codec, "flag", &[]).unwrap(), Value::Bool(false));
    assert_eq!(forge.invoke(codec, "tag", &[]).unwrap(), Value::Char('\0'));
    assert_eq!(forge.invoke(codec, "ratio", &[]).unwrap(), Value::Float(0.0));
    assert_eq!(forge.invoke(codec, "name", &[]).unwrap(), Value::Null);
    assert_eq!(forge.invoke(codec, "peer", &[]).unwrap(), Value::Null);
    assert_eq!(forge.invoke(codec, "bytes", &[]).unwrap(), Value::Null);
    assert_eq!(forge.invoke(codec, "flush", &[]).unwrap(), Value::Null);
}

#[test]
fn test_overloaded_interface_stubs() {
    let forge = common::bank_forge();
    forge
        .registry()
        .define(
            TypeBuilder::interface("bank.Parser")
                .method(MethodDefinition::new("parse").param(TypeRef::INT).returns(TypeRef::INT))
                .method(MethodDefinition::new("parse").param(TypeRef::String).returns(TypeRef::String))
                .method(MethodDefinition::new("parse").param(TypeRef::LONG).returns(TypeRef::BOOLEAN))
                .build()
                .unwrap(),
        )
        .unwrap();

    let value = forge.force_instance("bank.Parser").unwrap();
    let parser = value.as_object().unwrap();
    assert_eq!(forge.invoke(parser, "parse", &[Value::Int(4)]).unwrap(), Value::Int(0));
    assert_eq!(forge.invoke(parser, "parse", &[Value::str("4")]).unwrap(), Value::Null);
    assert_eq!(forge.invoke(parser, "parse", &[Value::Long(4)]).unwrap(), Value::Bool(false));
    // Widening reaches the first overload that accepts the argument
    assert_eq!(forge.invoke(parser, "parse", &[Value::Short(4)]).unwrap(), Value::Int(0));

    assert!(matches!(
        forge.invoke(parser, "parse", &[Value::Bool(true)]),
        Err(ForgeError::TypeMismatch { ref field, .. }) if field == "arg0"
    ));
}

// ===== Abstract Class Tests =====

#[test]
fn test_abstract_class_inherits_concrete_behaviour() {
    let forge = common::bank_forge();
    let value = forge.force_instance("bank.Account").unwrap();
    let account = value.as_object().unwrap();

    assert_eq!(account.class().name(), "forge.synthetic.Account_implementation");
    assert_eq!(account.class().superclass().unwrap().name(), "bank.Account");

    // Abstract operations, declared or inherited from the interface, are stubbed
    assert_eq!(forge.invoke(account, "rate", &[]).unwrap(), Value::Double(0.0));
    assert_eq!(forge.invoke(account, "balance", &[]).unwrap(), Value::Long(0));
    assert_eq!(
        forge.invoke(account, "describe", &[]).unwrap(),
        Value::str("account of nobody")
    );

    // The original's private constructor ran as part of the chain
    assert_eq!(forge.get_field(account, "id").unwrap(), Value::Long(1000));
}

#[test]
fn test_stubs_are_public() {
    let forge = common::bank_forge();
    let account = forge.registry().get("bank.Account").unwrap();
    let synthetic = forge.synthesize(&account).unwrap();

    assert!(synthetic.modifiers().is_public());
    assert!(synthetic.declared_methods().iter().all(|m| m.modifiers.is_public()));
    assert!(synthetic
        .declared_constructors()
        .iter()
        .all(|c| c.modifiers.is_public()));

    // The original keeps its own modifiers
    let rate = account.declared_methods().iter().find(|m| m.name == "rate").unwrap();
    assert!(!rate.modifiers.is_public());
}

#[test]
fn test_concrete_type_is_rejected() {
    let forge = common::bank_forge();
    let savings = forge.registry().get("bank.Savings").unwrap();
    assert!(matches!(
        forge.synthesize(&savings),
        Err(ForgeError::SynthesisFailure { .. })
    ));
}

// ===== Cache Tests =====

#[test]
fn test_same_type_every_time() {
    let forge = common::bank_forge();
    let ledger = forge.registry().get("bank.Ledger").unwrap();

    let first = forge.synthesize(&ledger).unwrap();
    let second = forge.synthesize(&ledger).unwrap();
    let third = forge.force_instance("bank.Ledger").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, third.as_object().unwrap().class()));
    assert_eq!(forge.cache().len(), 1);

    let stats = forge.stats();
    assert_eq!(stats.syntheses, 1);
    assert_eq!(stats.cache_hits, 2);
}

#[test]
fn test_configured_naming() {
    let options = ForgeOptions::from_toml_str(
        r#"
        [synthesis]
        namespace = "fixtures."
        suffix = "Stub"
        "#,
    )
    .unwrap();
    let forge = common::bank_forge_with(options);

    let value = forge.force_instance("bank.Ledger").unwrap();
    assert_eq!(value.as_object().unwrap().class().name(), "fixtures.LedgerStub");
    assert!(forge.registry().contains("fixtures.LedgerStub"));
}

#[test]
fn test_unnamespaced_synthetic_types() {
    let forge = common::bank_forge_with(ForgeOptions::default().with_synthetic_namespace(""));
    let value = forge.force_instance("bank.Ledger").unwrap();
    assert_eq!(value.as_object().unwrap().class().name(), "Ledger_implementation");
}
