use garnet_ir::{Expr, ExprKind, NameRef};

/// A constant written as a path: `A::B::C` or `::A::B`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstPath {
    /// Anchored at the root with a leading `::`.
    pub rooted: bool,
    /// Outermost first.
    pub names: Vec<NameRef>,
}

impl ConstPath {
    /// The last segment.
    pub fn last(&self) -> Option<NameRef> {
        self.names.last().copied()
    }
}

/// Read a constant expression (resolved or not) as a path.
///
/// `None` when some scope is not itself a constant.
pub fn constant_path(expr: &Expr) -> Option<ConstPath> {
    let mut names = Vec::new();
    let mut current = expr;
    let rooted = loop {
        let (scope, name) = match &current.kind {
            ExprKind::UnresolvedConstant { scope, name } => (Some(&**scope), *name),
            ExprKind::ConstantLit(lit) => (lit.scope.as_ref(), lit.name),
            _ => return None,
        };
        names.push(name);
        match scope.map(|s| &s.kind) {
            None | Some(ExprKind::Empty) => break false,
            Some(ExprKind::RootScope) => break true,
            Some(_) => current = scope?,
        }
    };
    names.reverse();
    Some(ConstPath { rooted, names })
}

/// Whether `expr` is a bare constant usable as an assignment target.
pub fn is_static_field_target(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::UnresolvedConstant { scope, .. } => scope.is_empty_tree(),
        ExprKind::ConstantLit(lit) => lit.scope.is_none(),
        _ => false,
    }
}
