//! Garnet IR - spans, handles and the shared tree.
//!
//! This crate contains the data that every phase of the Garnet type checker
//! passes around:
//! - `Span` and `Loc` for source locations
//! - dense handles (`FileRef`, `NameRef`, `SymbolRef`) into the tables owned
//!   by `GlobalState`
//! - the tree (`Expr`, `ParsedFile`) and its visitors
//!
//! Handles are plain integers. They carry no lifetime and are only meaningful
//! together with the state that issued them.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod ids;
mod loc;
mod span;
pub mod visitor;

pub use ast::{
    AssignOp, ClassDef, ClassKind, ConstantLit, Expr, ExprKind, IdentKind, Literal, MethodDef,
    Param, ParsedFile, Send,
};
pub use ids::{FileRef, NameRef, SymbolRef};
pub use loc::Loc;
pub use span::{Span, SpanError};
pub use visitor::{MutVisitor, Visitor};
