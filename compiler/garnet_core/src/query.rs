//! What a query asks and what it gets back.

use garnet_ir::{Loc, NameRef, SymbolRef};

use crate::Type;

/// An immutable question asked of resolved trees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Query {
    #[default]
    None,
    /// Everything whose location contains this one.
    Loc(Loc),
    /// Every use or definition of this symbol.
    Symbol(SymbolRef),
}

impl Query {
    pub fn is_none(&self) -> bool {
        matches!(self, Query::None)
    }

    /// Whether a node at `loc` answers a location query.
    pub fn matches_loc(&self, loc: Loc) -> bool {
        match self {
            Query::Loc(target) => loc.contains(*target),
            Query::None | Query::Symbol(_) => false,
        }
    }

    /// Whether a node referring to `sym` answers a symbol query.
    pub fn matches_symbol(&self, sym: SymbolRef) -> bool {
        match self {
            Query::Symbol(target) => sym.exists() && *target == sym,
            Query::None | Query::Loc(_) => false,
        }
    }
}

/// What was found, with the payload each kind carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    MethodDef {
        symbol: SymbolRef,
        name: NameRef,
    },
    /// A constant reference (or the name of a class definition).
    Constant {
        symbol: SymbolRef,
        name: NameRef,
        ty: Type,
    },
    /// An instance or class variable.
    Field {
        symbol: SymbolRef,
        name: NameRef,
        ty: Type,
    },
    /// A call site.
    Send {
        callee: SymbolRef,
        name: NameRef,
        receiver: Type,
        result: Type,
    },
    /// A local variable.
    Ident {
        name: NameRef,
        ty: Type,
    },
    Literal {
        ty: Type,
    },
}

impl ResponseKind {
    /// Tie-break between responses at the same location: lower wins.
    pub fn priority(&self) -> u8 {
        match self {
            ResponseKind::MethodDef { .. } => 0,
            ResponseKind::Constant { .. } => 1,
            ResponseKind::Field { .. } => 2,
            ResponseKind::Send { .. } => 3,
            ResponseKind::Ident { .. } => 4,
            ResponseKind::Literal { .. } => 5,
        }
    }

    /// Kinds whose position is syntactic, so they are meaningful even in
    /// untyped files.
    pub fn is_definition_like(&self) -> bool {
        matches!(
            self,
            ResponseKind::MethodDef { .. } | ResponseKind::Constant { .. } | ResponseKind::Field { .. }
        )
    }

    /// The symbol the response is about, when there is one.
    pub fn symbol(&self) -> SymbolRef {
        match self {
            ResponseKind::MethodDef { symbol, .. }
            | ResponseKind::Constant { symbol, .. }
            | ResponseKind::Field { symbol, .. } => *symbol,
            ResponseKind::Send { callee, .. } => *callee,
            ResponseKind::Ident { .. } | ResponseKind::Literal { .. } => SymbolRef::NONE,
        }
    }

    /// The type to show on hover.
    pub fn ty(&self) -> Type {
        match self {
            ResponseKind::Constant { ty, .. }
            | ResponseKind::Field { ty, .. }
            | ResponseKind::Ident { ty, .. }
            | ResponseKind::Literal { ty } => *ty,
            ResponseKind::Send { result, .. } => *result,
            ResponseKind::MethodDef { .. } => Type::Untyped,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseKind::MethodDef { .. } => "method definition",
            ResponseKind::Constant { .. } => "constant",
            ResponseKind::Field { .. } => "field",
            ResponseKind::Send { .. } => "send",
            ResponseKind::Ident { .. } => "identifier",
            ResponseKind::Literal { .. } => "literal",
        }
    }
}

/// One answer to a query.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryResponse {
    pub loc: Loc,
    pub kind: ResponseKind,
}

impl QueryResponse {
    pub fn new(loc: Loc, kind: ResponseKind) -> Self {
        QueryResponse { loc, kind }
    }
}
