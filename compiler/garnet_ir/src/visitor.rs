//! Tree traversal.
//!
//! `Visitor` walks a tree immutably; `MutVisitor` walks it with mutable
//! access so a pass can rewrite nodes in place (typically by `Expr::take`
//! followed by assigning the replacement).
//!
//! Default implementations call `walk_*` functions that traverse children.
//! Override `visit_*` methods to add behavior at specific nodes and call the
//! matching `walk_*` to keep descending.

use crate::ast::{ClassDef, ConstantLit, Expr, ExprKind, MethodDef, Send};

/// Read-only tree visitor.
pub trait Visitor<'ast> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_class_def(&mut self, class: &'ast ClassDef) {
        walk_class_def(self, class);
    }

    fn visit_method_def(&mut self, method: &'ast MethodDef) {
        walk_method_def(self, method);
    }

    fn visit_send(&mut self, send: &'ast Send) {
        walk_send(self, send);
    }

    fn visit_constant_lit(&mut self, lit: &'ast ConstantLit) {
        walk_constant_lit(self, lit);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Seq(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::ClassDef(class) => v.visit_class_def(class),
        ExprKind::MethodDef(method) => v.visit_method_def(method),
        ExprKind::Assign { lhs, rhs } | ExprKind::OpAssign { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            v.visit_expr(cond);
            v.visit_expr(then_branch);
            v.visit_expr(else_branch);
        }
        ExprKind::Return(value) => v.visit_expr(value),
        ExprKind::Send(send) => v.visit_send(send),
        ExprKind::UnresolvedConstant { scope, .. } => v.visit_expr(scope),
        ExprKind::ConstantLit(lit) => v.visit_constant_lit(lit),
        ExprKind::Empty
        | ExprKind::RootScope
        | ExprKind::UnresolvedIdent { .. }
        | ExprKind::Local { .. }
        | ExprKind::Literal(_)
        | ExprKind::SelfRef => {}
    }
}

pub fn walk_class_def<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, class: &'ast ClassDef) {
    v.visit_expr(&class.name);
    if let Some(superclass) = &class.superclass {
        v.visit_expr(superclass);
    }
    for stmt in &class.body {
        v.visit_expr(stmt);
    }
}

pub fn walk_method_def<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, method: &'ast MethodDef) {
    v.visit_expr(&method.body);
}

pub fn walk_send<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, send: &'ast Send) {
    v.visit_expr(&send.recv);
    for arg in &send.args {
        v.visit_expr(arg);
    }
}

pub fn walk_constant_lit<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, lit: &'ast ConstantLit) {
    if let Some(scope) = &lit.scope {
        v.visit_expr(scope);
    }
}

/// Tree visitor with mutable access to nodes.
pub trait MutVisitor {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_class_def_mut(&mut self, class: &mut ClassDef) {
        walk_class_def_mut(self, class);
    }

    fn visit_method_def_mut(&mut self, method: &mut MethodDef) {
        walk_method_def_mut(self, method);
    }

    fn visit_send_mut(&mut self, send: &mut Send) {
        walk_send_mut(self, send);
    }
}

pub fn walk_expr_mut<V: MutVisitor + ?Sized>(v: &mut V, expr: &mut Expr) {
    match &mut expr.kind {
        ExprKind::Seq(items) => {
            for item in items {
                v.visit_expr_mut(item);
            }
        }
        ExprKind::ClassDef(class) => v.visit_class_def_mut(class),
        ExprKind::MethodDef(method) => v.visit_method_def_mut(method),
        ExprKind::Assign { lhs, rhs } | ExprKind::OpAssign { lhs, rhs, .. } => {
            v.visit_expr_mut(lhs);
            v.visit_expr_mut(rhs);
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            v.visit_expr_mut(cond);
            v.visit_expr_mut(then_branch);
            v.visit_expr_mut(else_branch);
        }
        ExprKind::Return(value) => v.visit_expr_mut(value),
        ExprKind::Send(send) => v.visit_send_mut(send),
        ExprKind::UnresolvedConstant { scope, .. } => v.visit_expr_mut(scope),
        ExprKind::ConstantLit(lit) => {
            if let Some(scope) = &mut lit.scope {
                v.visit_expr_mut(scope);
            }
        }
        ExprKind::Empty
        | ExprKind::RootScope
        | ExprKind::UnresolvedIdent { .. }
        | ExprKind::Local { .. }
        | ExprKind::Literal(_)
        | ExprKind::SelfRef => {}
    }
}

pub fn walk_class_def_mut<V: MutVisitor + ?Sized>(v: &mut V, class: &mut ClassDef) {
    v.visit_expr_mut(&mut class.name);
    if let Some(superclass) = &mut class.superclass {
        v.visit_expr_mut(superclass);
    }
    for stmt in &mut class.body {
        v.visit_expr_mut(stmt);
    }
}

pub fn walk_method_def_mut<V: MutVisitor + ?Sized>(v: &mut V, method: &mut MethodDef) {
    v.visit_expr_mut(&mut method.body);
}

pub fn walk_send_mut<V: MutVisitor + ?Sized>(v: &mut V, send: &mut Send) {
    v.visit_expr_mut(&mut send.recv);
    for arg in &mut send.args {
        v.visit_expr_mut(arg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassKind, Literal};
    use crate::{NameRef, Span, SymbolRef};

    struct CountLiterals {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for CountLiterals {
        fn visit_expr(&mut self, expr: &'ast Expr) {
            if matches!(expr.kind, ExprKind::Literal(_)) {
                self.count += 1;
            }
            walk_expr(self, expr);
        }
    }

    struct ZeroInts;

    impl MutVisitor for ZeroInts {
        fn visit_expr_mut(&mut self, expr: &mut Expr) {
            if let ExprKind::Literal(Literal::Int(n)) = &mut expr.kind {
                *n = 0;
            }
            walk_expr_mut(self, expr);
        }
    }

    fn int(n: i64) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Int(n)), Span::new(0, 1))
    }

    fn sample() -> Expr {
        let send = Send {
            recv: int(1),
            fun: NameRef::new(42),
            fun_span: Span::new(2, 3),
            args: vec![int(2)],
            implicit_self: false,
        };
        let class = ClassDef {
            kind: ClassKind::Class,
            decl_span: Span::new(0, 9),
            name: Expr::new(
                ExprKind::UnresolvedConstant {
                    scope: Box::new(Expr::empty()),
                    name: NameRef::new(7),
                },
                Span::new(6, 9),
            ),
            superclass: None,
            body: vec![Expr::new(ExprKind::Send(Box::new(send)), Span::new(0, 5)), int(3)],
            symbol: SymbolRef::NONE,
        };
        Expr::new(ExprKind::ClassDef(Box::new(class)), Span::new(0, 20))
    }

    #[test]
    fn test_visitor_reaches_nested_nodes() {
        let tree = sample();
        let mut counter = CountLiterals { count: 0 };
        counter.visit_expr(&tree);
        assert_eq!(counter.count, 3);
    }

    #[test]
    fn test_mut_visitor_rewrites_in_place() {
        let mut tree = sample();
        ZeroInts.visit_expr_mut(&mut tree);

        struct SumInts(i64);
        impl<'ast> Visitor<'ast> for SumInts {
            fn visit_expr(&mut self, expr: &'ast Expr) {
                if let ExprKind::Literal(Literal::Int(n)) = expr.kind {
                    self.0 += n;
                }
                walk_expr(self, expr);
            }
        }
        let mut sum = SumInts(0);
        sum.visit_expr(&tree);
        assert_eq!(sum.0, 0);
    }
}
