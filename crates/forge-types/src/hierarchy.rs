//! Hierarchy queries over type descriptors
//!
//! Ancestor walks, subtype checks, virtual method resolution and the
//! abstract-operation bookkeeping used to decide whether a type can be
//! instantiated directly.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::descriptor::{FieldInfo, MethodInfo, TypeDescriptor};
use crate::value::Value;

/// Iterator over a type and its superclasses, most derived first
pub struct Ancestors<'a> {
    next: Option<&'a TypeDescriptor>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TypeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.superclass.as_deref();
        Some(current)
    }
}

impl TypeDescriptor {
    /// This type followed by each superclass up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Every instance field of the layout, nearest declaring type first
    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.ancestors().flat_map(|t| t.fields.iter())
    }

    /// Find a field by name, searching this type and then each ancestor
    ///
    /// A field declared on a more derived type shadows one of the same name
    /// further up the chain.
    pub fn find_field(&self, name: &str) -> Option<&FieldInfo> {
        self.ancestors().find_map(|t| t.declared_field(name))
    }

    /// All interfaces implemented directly or indirectly, breadth first
    pub fn all_interfaces(&self) -> Vec<Arc<TypeDescriptor>> {
        let mut seen = FxHashSet::default();
        let mut queue: VecDeque<Arc<TypeDescriptor>> = self
            .ancestors()
            .flat_map(|t| t.interfaces.iter().cloned())
            .collect();
        let mut result = Vec::new();

        while let Some(interface) = queue.pop_front() {
            if !seen.insert(interface.id) {
                continue;
            }
            queue.extend(interface.interfaces.iter().cloned());
            result.push(interface);
        }

        result
    }

    /// Check if `self` is `other` or one of its subtypes
    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self.ancestors().any(|t| t.id == other.id)
            || self.all_interfaces().iter().any(|i| i.id == other.id)
    }

    /// Check if `self` is, extends or implements the type named `name`
    pub fn is_subtype_of_name(&self, name: &str) -> bool {
        self.ancestors().any(|t| t.name == name)
            || self.all_interfaces().iter().any(|i| i.name == name)
    }

    /// Resolve a method the way a virtual call would
    ///
    /// Among the declarations with the right name and arity, the first whose
    /// parameters take every argument unchanged wins, then the first that
    /// takes them after widening or subtyping. When none applies, the first
    /// declaration is returned so that argument coercion reports the
    /// mismatch. The chosen signature is then looked up in the class chain,
    /// most derived first; interface methods are only consulted when no
    /// class declares it, and a default body wins over an abstract
    /// declaration.
    pub fn resolve_method(&self, name: &str, args: &[Value]) -> Option<MethodInfo> {
        let interfaces = self.all_interfaces();
        let declared: Vec<&MethodInfo> = self
            .ancestors()
            .flat_map(|t| t.methods.iter())
            .chain(interfaces.iter().flat_map(|i| i.methods.iter()))
            .filter(|m| m.name == name && m.arity() == args.len())
            .collect();

        let signature: &MethodInfo = [ArgumentFit::Exact, ArgumentFit::Converted]
            .into_iter()
            .find_map(|level| declared.iter().copied().find(|m| argument_fit(m, args) == Some(level)))
            .or_else(|| declared.first().copied())?;

        if let Some(method) = self
            .ancestors()
            .find_map(|t| t.methods.iter().find(|m| m.same_signature(signature)))
        {
            return Some(method.clone());
        }

        let candidates: Vec<&MethodInfo> = interfaces
            .iter()
            .flat_map(|i| i.methods.iter().filter(|m| m.same_signature(signature)))
            .collect();
        candidates
            .iter()
            .find(|m| !m.is_abstract())
            .or_else(|| candidates.first())
            .map(|m| (*m).clone())
    }

    /// Abstract operations that no concrete body in the hierarchy implements
    pub fn unimplemented_methods(&self) -> Vec<MethodInfo> {
        let interfaces = self.all_interfaces();
        let mut seen: Vec<&MethodInfo> = Vec::new();
        let mut pending = Vec::new();

        for method in self.ancestors().flat_map(|t| t.methods.iter()) {
            if seen.iter().any(|s| s.same_signature(method)) {
                continue;
            }
            seen.push(method);
            if method.is_abstract() {
                pending.push(method.clone());
            }
        }

        // Default bodies first so they satisfy abstract declarations from any
        // other interface in the set
        let interface_methods = || interfaces.iter().flat_map(|i| i.methods.iter());
        for method in interface_methods().filter(|m| !m.is_abstract()) {
            if !seen.iter().any(|s| s.same_signature(method)) {
                seen.push(method);
            }
        }
        for method in interface_methods().filter(|m| m.is_abstract()) {
            if seen.iter().any(|s| s.same_signature(method)) {
                continue;
            }
            seen.push(method);
            pending.push(method.clone());
        }

        pending
    }

    /// Whether the type cannot be instantiated as-is
    ///
    /// True for interfaces, classes declared abstract, and classes left with
    /// any abstract operation (declared or inherited) lacking a body.
    pub fn is_abstract(&self) -> bool {
        self.is_interface() || self.modifiers.is_abstract || !self.unimplemented_methods().is_empty()
    }
}

/// How a method's parameters take a set of arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentFit {
    /// Every argument already has its parameter's type
    Exact,
    /// Some argument needs widening or is a subtype
    Converted,
}

fn argument_fit(method: &MethodInfo, args: &[Value]) -> Option<ArgumentFit> {
    let mut fit = ArgumentFit::Exact;
    for (param, arg) in method.params.iter().zip(args) {
        if param.is_exact_type_of(arg) {
            continue;
        }
        param.coerce(arg.clone()).ok()?;
        fit = ArgumentFit::Converted;
    }
    Some(fit)
}
