//! Local-variable indexing.
//!
//! Within each scope (file top level, class body, method body) a bare
//! identifier is a local when a parameter or an earlier assignment binds it,
//! and otherwise a call on an implicit `self`. An assignment binds its
//! target before the right-hand side is read, and the `if` produced by
//! desugaring `x ||= v` binds `x` before its condition.

use garnet_ir::visitor::{walk_class_def_mut, walk_expr_mut, walk_method_def_mut, MutVisitor};
use garnet_ir::{ClassDef, Expr, ExprKind, IdentKind, MethodDef, NameRef, Send, Span};
use rustc_hash::FxHashSet;

pub fn index_locals(mut tree: Expr) -> Expr {
    let mut indexer = LocalIndexer {
        scopes: vec![FxHashSet::default()],
    };
    indexer.visit_expr_mut(&mut tree);
    tree
}

struct LocalIndexer {
    scopes: Vec<FxHashSet<NameRef>>,
}

impl LocalIndexer {
    fn bind(&mut self, name: NameRef) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name);
        }
    }

    fn is_bound(&self, name: NameRef) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains(&name))
    }

    fn with_scope(&mut self, params: impl IntoIterator<Item = NameRef>, f: impl FnOnce(&mut Self)) {
        self.scopes.push(params.into_iter().collect());
        f(self);
        self.scopes.pop();
    }
}

/// The local an `x ||= v` / `x &&= v` lowering assigns, if `expr` is one.
fn sugar_target(expr: &Expr) -> Option<NameRef> {
    let ExprKind::If {
        cond,
        then_branch,
        else_branch,
    } = &expr.kind
    else {
        return None;
    };
    let ExprKind::UnresolvedIdent {
        kind: IdentKind::Local,
        name,
    } = cond.kind
    else {
        return None;
    };
    let assigns_name = |branch: &Expr| {
        matches!(&branch.kind, ExprKind::Assign { lhs, .. }
            if matches!(lhs.kind, ExprKind::UnresolvedIdent { kind: IdentKind::Local, name: n } if n == name))
    };
    (assigns_name(then_branch) || assigns_name(else_branch)).then_some(name)
}

impl MutVisitor for LocalIndexer {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let ExprKind::UnresolvedIdent {
            kind: IdentKind::Local,
            name,
        } = expr.kind
        {
            if self.is_bound(name) {
                expr.kind = ExprKind::Local { name };
            } else {
                let send = Send {
                    recv: Expr::new(ExprKind::SelfRef, Span::point(expr.span.start)),
                    fun: name,
                    fun_span: expr.span,
                    args: Vec::new(),
                    implicit_self: true,
                };
                expr.kind = ExprKind::Send(Box::new(send));
            }
            return;
        }

        if let Some(name) = sugar_target(expr) {
            self.bind(name);
        }

        if let ExprKind::Assign { lhs, rhs } = &mut expr.kind {
            if let ExprKind::UnresolvedIdent {
                kind: IdentKind::Local,
                name,
            } = lhs.kind
            {
                self.bind(name);
                lhs.kind = ExprKind::Local { name };
                self.visit_expr_mut(rhs);
                return;
            }
        }

        walk_expr_mut(self, expr);
    }

    fn visit_class_def_mut(&mut self, class: &mut ClassDef) {
        self.with_scope(std::iter::empty(), |this| walk_class_def_mut(this, class));
    }

    fn visit_method_def_mut(&mut self, method: &mut MethodDef) {
        let params: Vec<NameRef> = method.params.iter().map(|p| p.name).collect();
        self.with_scope(params, |this| walk_method_def_mut(this, method));
    }
}
