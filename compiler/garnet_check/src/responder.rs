//! Answer a [`Query`] from one resolved, flattened tree.
//!
//! Definitions are matched syntactically: a method definition on its
//! declaration span, a class on its name. Everything inside method bodies
//! comes from the inference walk, so each response carries the type
//! inference computed for that node.

use garnet_core::{GlobalState, Query, QueryResponse, ResponseKind, Type};
use garnet_ir::visitor::{walk_method_def, Visitor};
use garnet_ir::{ClassDef, Expr, ExprKind, FileRef, Loc, MethodDef, ParsedFile, SymbolRef};

use crate::infer::{Inferencer, MethodContext, TypeObserver};

/// Every node of `tree` that answers `query`, in tree order.
pub fn respond(gs: &GlobalState, tree: &ParsedFile, query: &Query) -> Vec<QueryResponse> {
    if query.is_none() {
        return Vec::new();
    }
    let mut responder = Responder {
        gs,
        file: tree.file,
        query,
        classes: vec![SymbolRef::ROOT],
        responses: Vec::new(),
    };
    responder.visit_expr(&tree.tree);
    responder.responses
}

struct Responder<'a> {
    gs: &'a GlobalState,
    file: FileRef,
    query: &'a Query,
    classes: Vec<SymbolRef>,
    responses: Vec<QueryResponse>,
}

impl Responder<'_> {
    /// Class names and superclasses, including each `A::` scope.
    fn constant_path(&mut self, expr: &Expr) {
        let ExprKind::ConstantLit(lit) = &expr.kind else {
            return;
        };
        if let Some(scope) = &lit.scope {
            self.constant_path(scope);
        }
        let ty = if lit.resolved && self.gs.symbol(lit.symbol).is_class_or_module() {
            Type::ClassOf(lit.symbol)
        } else {
            Type::Untyped
        };
        let kind = ResponseKind::Constant {
            symbol: lit.symbol,
            name: lit.name,
            ty,
        };
        collect(self.query, Loc::new(self.file, expr.span), kind, &mut self.responses);
    }
}

impl<'ast> Visitor<'ast> for Responder<'_> {
    fn visit_class_def(&mut self, class: &'ast ClassDef) {
        self.constant_path(&class.name);
        if let Some(superclass) = &class.superclass {
            self.constant_path(superclass);
        }
        self.classes.push(class.symbol);
        for stmt in &class.body {
            self.visit_expr(stmt);
        }
        self.classes.pop();
    }

    fn visit_method_def(&mut self, method: &'ast MethodDef) {
        let kind = ResponseKind::MethodDef {
            symbol: method.symbol,
            name: method.name,
        };
        collect(self.query, Loc::new(self.file, method.decl_span), kind, &mut self.responses);

        let lexical_class = self.classes.last().copied().unwrap_or(SymbolRef::ROOT);
        let ctx = MethodContext::new(self.gs, method, lexical_class);
        let observer = Collector {
            file: self.file,
            query: self.query,
            responses: &mut self.responses,
        };
        let mut inferencer = Inferencer::new(self.gs, self.file, ctx, observer).quiet();
        inferencer.infer_method(method);

        // Definitions nested in the body.
        walk_method_def(self, method);
    }
}

struct Collector<'a> {
    file: FileRef,
    query: &'a Query,
    responses: &'a mut Vec<QueryResponse>,
}

impl TypeObserver for Collector<'_> {
    fn observe(&mut self, expr: &Expr, kind: ResponseKind) {
        let loc = match (&expr.kind, self.query) {
            // References point at the method name, hovers cover the whole call.
            (ExprKind::Send(send), Query::Symbol(_)) => Loc::new(self.file, send.fun_span),
            _ => Loc::new(self.file, expr.span),
        };
        collect(self.query, loc, kind, self.responses);
    }
}

fn collect(query: &Query, loc: Loc, kind: ResponseKind, out: &mut Vec<QueryResponse>) {
    if query.matches_loc(loc) || query.matches_symbol(kind.symbol()) {
        out.push(QueryResponse::new(loc, kind));
    }
}
