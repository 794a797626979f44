use garnet_core::{GlobalState, SymbolData, SymbolFlags};
use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::{ClassKind, Loc, NameRef, SymbolRef};

use super::FoundMethod;
use crate::PassPolicy;

/// How found definitions become symbols.
///
/// `kind` is `None` for a class that is only mentioned as a path prefix
/// (`A` in `class A::B`) and so is not being declared.
pub trait SymbolDefiner {
    fn policy(&self) -> PassPolicy;

    fn class(&mut self, owner: SymbolRef, name: NameRef, loc: Loc, kind: Option<ClassKind>) -> SymbolRef;

    fn method(&mut self, owner: SymbolRef, method: &FoundMethod) -> SymbolRef;

    fn field(&mut self, owner: SymbolRef, name: NameRef, loc: Loc) -> SymbolRef;

    fn static_field(&mut self, owner: SymbolRef, name: NameRef, loc: Loc) -> SymbolRef;

    /// The singleton class `def self.x` definitions go on.
    fn singleton(&mut self, class: SymbolRef) -> SymbolRef;
}

/// Enters symbols into a state whose names and symbols are unfrozen.
pub struct EnteringDefiner<'gs> {
    gs: &'gs mut GlobalState,
}

impl<'gs> EnteringDefiner<'gs> {
    pub fn new(gs: &'gs mut GlobalState) -> Self {
        EnteringDefiner { gs }
    }

    fn report(&self, diag: Diagnostic) {
        if self.policy().surface_diagnostics {
            self.gs.push_error(diag);
        }
    }
}

impl SymbolDefiner for EnteringDefiner<'_> {
    fn policy(&self) -> PassPolicy {
        PassPolicy::COMMITTING
    }

    fn class(&mut self, owner: SymbolRef, name: NameRef, loc: Loc, kind: Option<ClassKind>) -> SymbolRef {
        let existing = self.gs.lookup_member(owner, name);
        if existing.exists() && !self.gs.symbol(existing).is_class_or_module() {
            self.report(
                Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!(
                        "Redefining constant `{}` as a class or module",
                        self.gs.show_name(name)
                    ))
                    .at(loc),
            );
        }

        let sym = self.gs.enter_class_symbol(loc, owner, name);
        let Some(kind) = kind else {
            return sym;
        };

        let is_module = kind == ClassKind::Module;
        let data = self.gs.symbol(sym);
        let mismatch = if is_module { data.is_class() } else { data.is_module() };
        if mismatch {
            let previous = if is_module { "class" } else { "module" };
            self.report(
                Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!(
                        "`{}` was previously defined as a {previous}",
                        self.gs.show_symbol(sym)
                    ))
                    .at(loc),
            );
            return sym;
        }
        self.gs.declare_class_or_module(sym, is_module);
        self.gs.static_init_for_class(sym);
        sym
    }

    fn method(&mut self, owner: SymbolRef, method: &FoundMethod) -> SymbolRef {
        let existing = self.gs.lookup_member(owner, method.name);
        if existing.exists() && !method.synthetic {
            let data = self.gs.symbol(existing);
            let redefined_elsewhere = data.locs.iter().any(|l| *l != method.loc);
            if data.is_method() && redefined_elsewhere && data.arity() != method.params.len() {
                self.report(
                    Diagnostic::warning(ErrorCode::E2003)
                        .with_message(format!(
                            "Method `{}` redefined with {} parameter(s), previously {}",
                            self.gs.show_symbol(existing),
                            method.params.len(),
                            data.arity()
                        ))
                        .at(method.loc),
                );
            }
        }

        let sym = self.gs.enter_method_symbol(method.loc, owner, method.name);
        self.gs.set_method_params(sym, method.params.clone());
        if method.synthetic {
            self.gs.add_symbol_flags(sym, SymbolFlags::SYNTHETIC);
        }
        sym
    }

    fn field(&mut self, owner: SymbolRef, name: NameRef, loc: Loc) -> SymbolRef {
        self.gs.enter_field_symbol(loc, owner, name)
    }

    fn static_field(&mut self, owner: SymbolRef, name: NameRef, loc: Loc) -> SymbolRef {
        let existing = self.gs.lookup_member(owner, name);
        if existing.exists() && self.gs.symbol(existing).is_class_or_module() {
            // Entering would rename the class out of the way.
            self.report(
                Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!(
                        "Cannot assign to `{}`, it is a class or module",
                        self.gs.show_symbol(existing)
                    ))
                    .at(loc),
            );
            return SymbolRef::TODO;
        }
        self.gs.enter_static_field_symbol(loc, owner, name)
    }

    fn singleton(&mut self, class: SymbolRef) -> SymbolRef {
        self.gs.singleton_class(class)
    }
}

/// Looks symbols up in a state it cannot mutate.
///
/// Missing definitions become `<todo>` when the policy allows it; otherwise
/// they are an internal invariant violation.
pub struct LookupDefiner<'gs> {
    gs: &'gs GlobalState,
    policy: PassPolicy,
    missing: usize,
}

impl<'gs> LookupDefiner<'gs> {
    pub fn new(gs: &'gs GlobalState, policy: PassPolicy) -> Self {
        LookupDefiner { gs, policy, missing: 0 }
    }

    /// How many definitions were replaced by `<todo>`.
    pub fn missing(&self) -> usize {
        self.missing
    }

    fn found_or_todo(&mut self, sym: SymbolRef, owner: SymbolRef, name: NameRef) -> SymbolRef {
        if sym.exists() {
            return sym;
        }
        assert!(
            self.policy.synthesize_stub_on_missing_owner,
            "internal invariant: `{}` is not a member of {}",
            self.gs.show_name(name),
            self.gs.show_symbol(owner)
        );
        self.missing += 1;
        SymbolRef::TODO
    }

    fn member_with(&self, owner: SymbolRef, name: NameRef, pred: impl Fn(&SymbolData) -> bool) -> SymbolRef {
        let sym = self.gs.lookup_member(owner, name);
        if sym.exists() && pred(self.gs.symbol(sym)) {
            sym
        } else {
            SymbolRef::NONE
        }
    }
}

impl SymbolDefiner for LookupDefiner<'_> {
    fn policy(&self) -> PassPolicy {
        self.policy
    }

    fn class(&mut self, owner: SymbolRef, name: NameRef, _loc: Loc, _kind: Option<ClassKind>) -> SymbolRef {
        let sym = self.member_with(owner, name, |d| d.is_class_or_module());
        self.found_or_todo(sym, owner, name)
    }

    fn method(&mut self, owner: SymbolRef, method: &FoundMethod) -> SymbolRef {
        let sym = self.member_with(owner, method.name, |d| d.is_method());
        self.found_or_todo(sym, owner, method.name)
    }

    fn field(&mut self, owner: SymbolRef, name: NameRef, _loc: Loc) -> SymbolRef {
        let sym = self.member_with(owner, name, |d| d.is_field());
        self.found_or_todo(sym, owner, name)
    }

    fn static_field(&mut self, owner: SymbolRef, name: NameRef, _loc: Loc) -> SymbolRef {
        let sym = self.member_with(owner, name, |d| d.is_static_field());
        self.found_or_todo(sym, owner, name)
    }

    fn singleton(&mut self, class: SymbolRef) -> SymbolRef {
        let sym = self.gs.lookup_singleton_class(class);
        let name = self.gs.symbol(class).name;
        self.found_or_todo(sym, class, name)
    }
}
