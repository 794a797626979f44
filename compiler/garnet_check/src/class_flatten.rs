//! Phase 7a: move code out of class bodies and the file top level.
//!
//! After flattening, a class body and the file top level hold only
//! definitions. Everything else runs from a synthetic `<static-init>` method:
//! one per class (on its singleton) and one per file (on the root).

use garnet_core::{core_names, GlobalState};
use garnet_ir::{ClassDef, Expr, ExprKind, MethodDef, ParsedFile, Span, SymbolRef};

/// Flatten one resolved tree.
///
/// The file's `<static-init>` must already be entered; a class whose
/// `<static-init>` is missing (possible after a best-effort naming run) gets
/// `<todo>`.
pub fn flatten_file(gs: &GlobalState, tree: ParsedFile) -> ParsedFile {
    let ParsedFile { tree, file } = tree;
    let static_init = gs.lookup_static_init_for_file(file);
    let span = tree.span;

    let (mut defs, code) = partition(gs, statements(tree));
    if !code.is_empty() {
        let name = gs.symbol(static_init).name;
        defs.push(static_init_method(static_init, name, code, false));
    }
    ParsedFile::new(Expr::seq(defs, span), file)
}

fn statements(tree: Expr) -> Vec<Expr> {
    match tree.kind {
        ExprKind::Seq(items) => items,
        ExprKind::Empty => Vec::new(),
        _ => vec![tree],
    }
}

/// Split statements into flattened definitions and everything else.
fn partition(gs: &GlobalState, stmts: Vec<Expr>) -> (Vec<Expr>, Vec<Expr>) {
    let mut defs = Vec::new();
    let mut code = Vec::new();
    for stmt in stmts {
        match stmt.kind {
            ExprKind::ClassDef(class) => {
                let class = flatten_class(gs, *class);
                defs.push(Expr::new(ExprKind::ClassDef(Box::new(class)), stmt.span));
            }
            ExprKind::MethodDef(_) => defs.push(stmt),
            _ => code.push(stmt),
        }
    }
    (defs, code)
}

fn flatten_class(gs: &GlobalState, mut class: ClassDef) -> ClassDef {
    let (mut defs, code) = partition(gs, std::mem::take(&mut class.body));
    if !code.is_empty() {
        let sym = if class.symbol.is_placeholder() || !gs.symbol_exists(class.symbol) {
            SymbolRef::NONE
        } else {
            gs.lookup_static_init_for_class(class.symbol)
        };
        let (sym, name) = if sym.exists() {
            (sym, gs.symbol(sym).name)
        } else {
            (SymbolRef::TODO, core_names::STATIC_INIT)
        };
        defs.push(static_init_method(sym, name, code, true));
    }
    class.body = defs;
    class
}

fn static_init_method(symbol: SymbolRef, name: garnet_ir::NameRef, code: Vec<Expr>, on_class: bool) -> Expr {
    let span = code.iter().fold(Span::NONE, |acc, e| acc.merge(e.span));
    let method = MethodDef {
        // No declaration to point at, so definition queries never land here.
        decl_span: Span::NONE,
        name,
        params: Vec::new(),
        body: Expr::seq(code, span),
        is_self_method: on_class,
        synthetic: true,
        symbol,
    };
    Expr::new(ExprKind::MethodDef(Box::new(method)), span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index, lookup_class, name_and_resolve, only};

    fn methods_of(body: &[Expr]) -> Vec<&MethodDef> {
        body.iter()
            .filter_map(|e| match &e.kind {
                ExprKind::MethodDef(m) => Some(&**m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_top_level_code_moves_to_file_static_init() {
        let (mut gs, trees) = index(&[("a.rb", "x = 1\nclass A\nend\nputs(x)\n")]);
        let trees = name_and_resolve(&mut gs, trees);
        let flat = flatten_file(&gs, only(trees));

        let ExprKind::Seq(items) = &flat.tree.kind else {
            panic!("expected a sequence, got {:?}", flat.tree.kind);
        };
        assert!(items.iter().all(Expr::is_definition));
        let inits = methods_of(items);
        assert_eq!(inits.len(), 1);
        assert_eq!(inits[0].symbol, gs.lookup_static_init_for_file(flat.file));
        assert!(inits[0].synthetic);
        assert!(!inits[0].decl_span.exists());
    }

    #[test]
    fn test_class_body_code_moves_to_class_static_init() {
        let source = "class A\n  X = 1\n  def foo\n  end\nend\n";
        let (mut gs, trees) = index(&[("a.rb", source)]);
        let trees = name_and_resolve(&mut gs, trees);
        let flat = flatten_file(&gs, only(trees));

        let ExprKind::ClassDef(class) = &flat.tree.kind else {
            panic!("expected a class, got {:?}", flat.tree.kind);
        };
        let methods = methods_of(&class.body);
        assert_eq!(methods.len(), 2);
        let init = methods[1];
        assert!(init.is_self_method);
        let a = lookup_class(&gs, "A");
        assert_eq!(init.symbol, gs.lookup_static_init_for_class(a));
    }

    #[test]
    fn test_definitions_only_file_has_no_static_init_method() {
        let (mut gs, trees) = index(&[("a.rb", "class A\nend\n")]);
        let trees = name_and_resolve(&mut gs, trees);
        let flat = flatten_file(&gs, only(trees));
        assert!(matches!(flat.tree.kind, ExprKind::ClassDef(_)));
    }
}
