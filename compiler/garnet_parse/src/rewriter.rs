//! Rewrites of well-known class-body idioms.
//!
//! `attr_reader :a`, `attr_writer :a` and `attr_accessor :a` become synthetic
//! `def a; @a; end` and `def a=(a); @a = a; end`, located at the symbol
//! argument. Calls with any non-symbol argument are left alone.

use garnet_core::{core_names, GlobalState};
use garnet_ir::visitor::{walk_class_def_mut, MutVisitor};
use garnet_ir::{ClassDef, Expr, ExprKind, IdentKind, Literal, MethodDef, NameRef, Param, Span, SymbolRef};

/// Requires the names table unfrozen.
pub fn rewrite(gs: &mut GlobalState, mut tree: Expr) -> Expr {
    Rewriter { gs }.visit_expr_mut(&mut tree);
    tree
}

struct Rewriter<'gs> {
    gs: &'gs mut GlobalState,
}

impl MutVisitor for Rewriter<'_> {
    fn visit_class_def_mut(&mut self, class: &mut ClassDef) {
        walk_class_def_mut(self, class);
        let body = std::mem::take(&mut class.body);
        class.body = body
            .into_iter()
            .flat_map(|stmt| self.rewrite_stmt(stmt))
            .collect();
    }
}

impl Rewriter<'_> {
    fn rewrite_stmt(&mut self, stmt: Expr) -> Vec<Expr> {
        let ExprKind::Send(send) = &stmt.kind else {
            return vec![stmt];
        };
        let (reader, writer) = match send.fun {
            f if f == core_names::ATTR_READER => (true, false),
            f if f == core_names::ATTR_WRITER => (false, true),
            f if f == core_names::ATTR_ACCESSOR => (true, true),
            _ => return vec![stmt],
        };
        if !send.implicit_self || send.args.is_empty() {
            return vec![stmt];
        }
        let Some(attrs) = send
            .args
            .iter()
            .map(|arg| match arg.kind {
                ExprKind::Literal(Literal::Symbol(name)) => Some((name, arg.span)),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
        else {
            return vec![stmt];
        };

        let mut methods = Vec::new();
        for (name, span) in attrs {
            let ivar = self.ivar_name(name);
            if reader {
                methods.push(reader_method(name, ivar, span));
            }
            if writer {
                let setter = self.setter_name(name);
                methods.push(writer_method(setter, name, ivar, span));
            }
        }
        methods
    }

    fn ivar_name(&mut self, name: NameRef) -> NameRef {
        let text = format!("@{}", self.gs.short_name(name));
        self.gs.enter_name_utf8(&text)
    }

    fn setter_name(&mut self, name: NameRef) -> NameRef {
        let text = format!("{}=", self.gs.short_name(name));
        self.gs.enter_name_utf8(&text)
    }
}

fn ivar(name: NameRef, span: Span) -> Expr {
    Expr::new(
        ExprKind::UnresolvedIdent {
            kind: IdentKind::Instance,
            name,
        },
        span,
    )
}

fn synthetic_method(name: NameRef, params: Vec<Param>, body: Expr, span: Span) -> Expr {
    let method = MethodDef {
        decl_span: span,
        name,
        params,
        body,
        is_self_method: false,
        synthetic: true,
        symbol: SymbolRef::NONE,
    };
    Expr::new(ExprKind::MethodDef(Box::new(method)), span)
}

fn reader_method(name: NameRef, ivar_name: NameRef, span: Span) -> Expr {
    synthetic_method(name, Vec::new(), ivar(ivar_name, span), span)
}

fn writer_method(setter: NameRef, param: NameRef, ivar_name: NameRef, span: Span) -> Expr {
    let value = Expr::new(
        ExprKind::UnresolvedIdent {
            kind: IdentKind::Local,
            name: param,
        },
        span,
    );
    let body = Expr::new(
        ExprKind::Assign {
            lhs: Box::new(ivar(ivar_name, span)),
            rhs: Box::new(value),
        },
        span,
    );
    synthetic_method(setter, vec![Param { name: param, span }], body, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_file;
    use garnet_core::File;
    use pretty_assertions::assert_eq;

    fn rewritten(source: &str) -> (GlobalState, Vec<Expr>) {
        let mut gs = GlobalState::new();
        let file = {
            let mut gs = gs.unfreeze_files();
            gs.enter_file(File::from_path("t.rb", source))
        };
        let tree = {
            let mut gs = gs.unfreeze_names();
            let output = parse_file(&mut gs, file);
            rewrite(&mut gs, output.tree)
        };
        let ExprKind::ClassDef(class) = tree.kind else {
            panic!("expected a class");
        };
        (gs, class.body)
    }

    fn method_names(gs: &GlobalState, body: &[Expr]) -> Vec<String> {
        body.iter()
            .filter_map(|stmt| match &stmt.kind {
                ExprKind::MethodDef(m) => Some(gs.show_name(m.name)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_accessor_defines_reader_and_writer() {
        let (gs, body) = rewritten("class A\n  attr_accessor :size\nend\n");
        assert_eq!(method_names(&gs, &body), vec!["size", "size="]);
        let ExprKind::MethodDef(writer) = &body[1].kind else {
            panic!("expected a method");
        };
        assert!(writer.synthetic);
        assert_eq!(writer.params.len(), 1);
        // Located at the `:size` argument.
        assert_eq!(writer.decl_span, Span::new(24, 29));
    }

    #[test]
    fn test_reader_and_writer_with_several_names() {
        let (gs, body) = rewritten("class A\n  attr_reader :a, :b\n  attr_writer :c\nend\n");
        assert_eq!(method_names(&gs, &body), vec!["a", "b", "c="]);
    }

    #[test]
    fn test_non_symbol_arguments_are_left_alone() {
        let (_, body) = rewritten("class A\n  attr_reader name\nend\n");
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0].kind, ExprKind::Send(_)));
    }
}
