//! Tree representation shared by every phase.
//!
//! The parser produces it, each later phase consumes a `ParsedFile` and hands
//! back a transformed one. Some variants only exist between particular
//! phases:
//!
//! - `OpAssign` is removed by desugaring.
//! - `UnresolvedIdent { kind: Local }` is replaced by `Local` or an
//!   implicit-self `Send` during local-variable indexing.
//! - `UnresolvedConstant` is replaced by `ConstantLit` during resolution.
//! - `symbol` fields on definitions are `SymbolRef::NONE` until naming.

use crate::{FileRef, NameRef, Span, SymbolRef};

/// One node of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// Absent expression (missing `else`, empty body).
    Empty,
    /// Statements evaluated in order.
    Seq(Vec<Expr>),
    ClassDef(Box<ClassDef>),
    MethodDef(Box<MethodDef>),
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `lhs ||= rhs`, `lhs &&= rhs`, `lhs += rhs`.
    OpAssign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Return(Box<Expr>),
    Send(Box<Send>),
    /// A constant reference before resolution. `scope` is `Empty` for a bare
    /// name, `RootScope` for `::Name`, or another constant for `A::Name`.
    UnresolvedConstant {
        scope: Box<Expr>,
        name: NameRef,
    },
    ConstantLit(Box<ConstantLit>),
    /// The leading `::` of a root-anchored constant.
    RootScope,
    UnresolvedIdent {
        kind: IdentKind,
        name: NameRef,
    },
    Local {
        name: NameRef,
    },
    Literal(Literal),
    SelfRef,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Module,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub kind: ClassKind,
    /// Span of `class Name < Super`, used for definition queries.
    pub decl_span: Span,
    /// The constant naming the class.
    pub name: Expr,
    pub superclass: Option<Expr>,
    pub body: Vec<Expr>,
    pub symbol: SymbolRef,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: NameRef,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    /// Span of `def name(params)`.
    pub decl_span: Span,
    pub name: NameRef,
    pub params: Vec<Param>,
    pub body: Expr,
    /// `def self.name`.
    pub is_self_method: bool,
    /// Produced by a rewrite rather than written by the user.
    pub synthetic: bool,
    pub symbol: SymbolRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Send {
    pub recv: Expr,
    pub fun: NameRef,
    pub fun_span: Span,
    pub args: Vec<Expr>,
    /// Receiver was not written (`foo(1)` rather than `self.foo(1)`).
    pub implicit_self: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantLit {
    pub symbol: SymbolRef,
    pub name: NameRef,
    /// Resolved form of an explicit `A::` prefix.
    pub scope: Option<Expr>,
    /// False when resolution failed and `symbol` is the stub module.
    pub resolved: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentKind {
    Local,
    Instance,
    Class,
    Global,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Or,
    And,
    Add,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    String(NameRef),
    Symbol(NameRef),
    Nil,
    True,
    False,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// An empty node without a location.
    #[inline]
    pub fn empty() -> Self {
        Expr::new(ExprKind::Empty, Span::NONE)
    }

    #[inline]
    pub fn is_empty_tree(&self) -> bool {
        matches!(self.kind, ExprKind::Empty)
    }

    /// Build a sequence, flattening nested sequences and dropping empty nodes.
    pub fn seq(items: Vec<Expr>, span: Span) -> Self {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match item.kind {
                ExprKind::Empty => {}
                ExprKind::Seq(inner) => flat.extend(inner),
                _ => flat.push(item),
            }
        }
        match flat.len() {
            0 => Expr::new(ExprKind::Empty, span),
            1 => flat.pop().unwrap_or_else(Expr::empty),
            _ => Expr::new(ExprKind::Seq(flat), span),
        }
    }

    /// Whether this node introduces a definition (class, module or method).
    #[inline]
    pub fn is_definition(&self) -> bool {
        matches!(self.kind, ExprKind::ClassDef(_) | ExprKind::MethodDef(_))
    }

    /// Take the node out, leaving an empty tree in its place.
    #[inline]
    pub fn take(&mut self) -> Expr {
        std::mem::take(self)
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::empty()
    }
}

/// A tree paired with the file it came from.
///
/// Each phase owns the `ParsedFile` it is given and owns the one it returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFile {
    pub tree: Expr,
    pub file: FileRef,
}

impl ParsedFile {
    pub fn new(tree: Expr, file: FileRef) -> Self {
        ParsedFile { tree, file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(n: i64, at: u32) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Int(n)), Span::new(at, at + 1))
    }

    #[test]
    fn test_seq_flattens_and_drops_empty() {
        let inner = Expr::seq(vec![lit(1, 0), lit(2, 2)], Span::new(0, 3));
        let outer = Expr::seq(vec![inner, Expr::empty(), lit(3, 4)], Span::new(0, 5));
        match outer.kind {
            ExprKind::Seq(items) => assert_eq!(items.len(), 3),
            other => panic!("expected a sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_seq_of_one_is_the_item() {
        let single = Expr::seq(vec![Expr::empty(), lit(7, 0)], Span::new(0, 1));
        assert_eq!(single, lit(7, 0));
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut e = lit(1, 0);
        let taken = e.take();
        assert!(e.is_empty_tree());
        assert_eq!(taken, lit(1, 0));
    }
}
