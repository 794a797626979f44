//! Phase 7b: definition consistency checks on a flattened tree.

use garnet_core::{core_names, GlobalState};
use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::visitor::{walk_class_def, walk_method_def, Visitor};
use garnet_ir::{ClassDef, FileRef, Loc, MethodDef, ParsedFile, SymbolRef};

/// Check every definition in `tree`, reporting to the state's error channel.
///
/// A definition without an existing symbol means naming went wrong and is
/// fatal.
pub fn validate_file(gs: &GlobalState, tree: &ParsedFile) {
    let mut validator = DefinitionValidator {
        gs,
        file: tree.file,
        is_rbi: gs.file(tree.file).is_rbi(),
    };
    validator.visit_expr(&tree.tree);
}

struct DefinitionValidator<'gs> {
    gs: &'gs GlobalState,
    file: FileRef,
    is_rbi: bool,
}

impl DefinitionValidator<'_> {
    fn check_override(&self, method: &MethodDef) {
        let sym = method.symbol;
        if sym.is_placeholder() || method.synthetic || method.name == core_names::INITIALIZE {
            return;
        }
        let data = self.gs.symbol(sym);
        let parent = self
            .gs
            .ancestors(data.owner)
            .into_iter()
            .skip(1)
            .map(|ancestor| self.gs.lookup_member(ancestor, data.name))
            .find(|&m| m.exists() && self.gs.symbol(m).is_method());
        let Some(parent) = parent else {
            return;
        };

        let expected = self.gs.symbol(parent).arity();
        let found = method.params.len();
        if expected != found {
            self.gs.push_error(
                Diagnostic::error(ErrorCode::E4001)
                    .with_message(format!(
                        "Method `{}` takes {found} parameter(s) but overrides `{}` which takes {expected}",
                        self.gs.show_symbol(sym),
                        self.gs.show_symbol(parent)
                    ))
                    .at(Loc::new(self.file, method.decl_span)),
            );
        }
    }
}

impl<'ast> Visitor<'ast> for DefinitionValidator<'_> {
    fn visit_class_def(&mut self, class: &'ast ClassDef) {
        assert!(
            self.gs.symbol_exists(class.symbol),
            "internal invariant: class definition at {:?} has no symbol",
            Loc::new(self.file, class.decl_span)
        );
        walk_class_def(self, class);
    }

    fn visit_method_def(&mut self, method: &'ast MethodDef) {
        assert!(
            self.gs.symbol_exists(method.symbol),
            "internal invariant: method definition at {:?} has no symbol",
            Loc::new(self.file, method.decl_span)
        );

        if self.is_rbi && !method.synthetic && !method.body.is_empty_tree() {
            self.gs.push_error(
                Diagnostic::error(ErrorCode::E4002)
                    .with_message("Methods in interface files must not have bodies")
                    .at(Loc::new(self.file, method.decl_span)),
            );
        }
        if method.symbol != SymbolRef::TODO {
            self.check_override(method);
        }
        walk_method_def(self, method);
    }
}
