//! Shared fixtures: a small banking domain registered in a fresh registry

#![allow(dead_code)]

use std::sync::Arc;

use forge_core::{Forge, ForgeOptions};
use forge_types::{
    ConstructorDefinition, FieldDefinition, InvokeError, MethodDefinition, TypeBuilder, TypeRef, TypeRegistry, Value,
};

/// Registry with every fixture type defined
pub fn bank_registry() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());

    let ledger = registry
        .define(
            TypeBuilder::interface("bank.Ledger")
                .public()
                .method(MethodDefinition::new("balance").returns(TypeRef::LONG))
                .method(MethodDefinition::new("record").param(TypeRef::LONG).returns(TypeRef::BOOLEAN))
                .method(
                    MethodDefinition::new("label")
                        .returns(TypeRef::String)
                        .body(|_, _| Ok(Value::str("ledger"))),
                )
                .build()
                .unwrap(),
        )
        .unwrap();

    let account = registry
        .define(
            TypeBuilder::class("bank.Account")
                .public()
                .as_abstract()
                .implements(&ledger)
                .field(FieldDefinition::new("id", TypeRef::LONG).private().as_final())
                .field(
                    FieldDefinition::new("owner", TypeRef::String)
                        .protected()
                        .initial_value("nobody"),
                )
                .method(MethodDefinition::new("rate").returns(TypeRef::DOUBLE).protected().as_abstract())
                .method(
                    MethodDefinition::new("describe")
                        .returns(TypeRef::String)
                        .public()
                        .body(|this, _| {
                            let owner = forge_core::get_field(this, "owner")
                                .map_err(|e| InvokeError::new(e.to_string()))?;
                            Ok(Value::str(&format!("account of {}", owner.as_str().unwrap_or("?"))))
                        }),
                )
                .constructor(ConstructorDefinition::new().private().body(|this, _| {
                    forge_core::set_field(this, "id", Value::Long(1000))
                        .map_err(|e| InvokeError::new(e.to_string()))
                }))
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::class("bank.Savings")
                .public()
                .extends(&account)
                .field(FieldDefinition::new("owner", TypeRef::String).private())
                .field(FieldDefinition::new("bonus", TypeRef::DOUBLE).private().initial_value(0.5))
                .method(
                    MethodDefinition::new("rate")
                        .returns(TypeRef::DOUBLE)
                        .protected()
                        .body(|_, _| Ok(Value::Double(1.25))),
                )
                .method(MethodDefinition::new("balance").returns(TypeRef::LONG).public().body(|_, _| Ok(Value::Long(10))))
                .method(
                    MethodDefinition::new("record")
                        .param(TypeRef::LONG)
                        .returns(TypeRef::BOOLEAN)
                        .public()
                        .body(|_, _| Ok(Value::Bool(true))),
                )
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::class("bank.Vault")
                .field(FieldDefinition::new("locked", TypeRef::BOOLEAN).initial_value(true))
                .constructor(ConstructorDefinition::new().public().body(|_, _| panic!("vault alarm")))
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::class("bank.Branch")
                .field(FieldDefinition::new("code", TypeRef::String).private().as_final())
                .constructor(ConstructorDefinition::new().param(TypeRef::String).public())
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::class("bank.Teller")
                .as_abstract()
                .field(FieldDefinition::new("desk", TypeRef::INT).initial_value(7))
                .method(MethodDefinition::new("serve").param(TypeRef::String).as_abstract())
                .constructor(ConstructorDefinition::new().param(TypeRef::INT).protected())
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::class("bank.Terminal")
                .not_allocatable()
                .constructor(
                    ConstructorDefinition::new()
                        .public()
                        .body(|_, _| Err(InvokeError::new("hardware missing"))),
                )
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
}

/// Engine over [`bank_registry`] with default options
pub fn bank_forge() -> Forge {
    Forge::new(bank_registry())
}

/// Engine over [`bank_registry`] with the given options
pub fn bank_forge_with(options: ForgeOptions) -> Forge {
    Forge::with_options(bank_registry(), options).unwrap()
}
