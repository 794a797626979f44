//! Lowers sugar assignments.
//!
//! - `a ||= b` becomes `if a then a else a = b`
//! - `a &&= b` becomes `if a then a = b else a`
//! - `a += b` becomes `a = a.+(b)`
//!
//! When the target is an attribute (`r.x ||= v`) the write goes through the
//! setter `r.x=(...)`.

use garnet_core::{core_names, GlobalState};
use garnet_ir::visitor::{walk_expr_mut, MutVisitor};
use garnet_ir::{AssignOp, Expr, ExprKind, Send, Span};

/// Requires the names table unfrozen (setter names may be new).
pub fn desugar(gs: &mut GlobalState, mut tree: Expr) -> Expr {
    Desugar { gs }.visit_expr_mut(&mut tree);
    tree
}

struct Desugar<'gs> {
    gs: &'gs mut GlobalState,
}

impl MutVisitor for Desugar<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
        if matches!(expr.kind, ExprKind::OpAssign { .. }) {
            let taken = expr.take();
            *expr = self.lower(taken);
        }
    }
}

impl Desugar<'_> {
    fn lower(&mut self, expr: Expr) -> Expr {
        let span = expr.span;
        let ExprKind::OpAssign { op, lhs, rhs } = expr.kind else {
            return expr;
        };
        let lhs = *lhs;
        let rhs = *rhs;
        match lhs.kind {
            ExprKind::Send(reader) if reader.args.is_empty() => {
                self.lower_attribute(op, *reader, lhs.span, rhs, span)
            }
            kind => lower_variable(op, Expr::new(kind, lhs.span), rhs, span),
        }
    }

    fn lower_attribute(&mut self, op: AssignOp, reader: Send, reader_span: Span, rhs: Expr, span: Span) -> Expr {
        let setter_text = format!("{}=", self.gs.short_name(reader.fun));
        let setter_name = self.gs.enter_name_utf8(&setter_text);
        let setter = |value: Expr| {
            let send = Send {
                recv: reader.recv.clone(),
                fun: setter_name,
                fun_span: reader.fun_span,
                args: vec![value],
                implicit_self: false,
            };
            Expr::new(ExprKind::Send(Box::new(send)), span)
        };
        let read = Expr::new(ExprKind::Send(Box::new(reader.clone())), reader_span);

        match op {
            AssignOp::Or => if_expr(read.clone(), read, setter(rhs), span),
            AssignOp::And => if_expr(read.clone(), setter(rhs), read, span),
            AssignOp::Add => setter(plus(read, rhs, span)),
        }
    }
}

fn lower_variable(op: AssignOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
    match op {
        AssignOp::Or => if_expr(lhs.clone(), lhs.clone(), assign(lhs, rhs, span), span),
        AssignOp::And => if_expr(lhs.clone(), assign(lhs.clone(), rhs, span), lhs, span),
        AssignOp::Add => {
            let sum = plus(lhs.clone(), rhs, span);
            assign(lhs, sum, span)
        }
    }
}

fn assign(lhs: Expr, rhs: Expr, span: Span) -> Expr {
    Expr::new(
        ExprKind::Assign {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}

fn if_expr(cond: Expr, then_branch: Expr, else_branch: Expr, span: Span) -> Expr {
    Expr::new(
        ExprKind::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        },
        span,
    )
}

fn plus(lhs: Expr, rhs: Expr, span: Span) -> Expr {
    let send = Send {
        recv: lhs,
        fun: core_names::PLUS,
        fun_span: span,
        args: vec![rhs],
        implicit_self: false,
    };
    Expr::new(ExprKind::Send(Box::new(send)), span)
}
