//! Phase 8: a small flow-insensitive inference pass.
//!
//! Every method body (including the synthetic `<static-init>`s produced by
//! flattening) is walked once in source order. Locals take the type of the
//! values assigned to them; a local assigned values of different types is
//! untyped. Sends are dispatched on the receiver's type, which is where
//! "method does not exist" and argument count errors come from.
//!
//! The same walk feeds the query responder through [`TypeObserver`], so hover
//! answers carry exactly the types inference computed.

use garnet_core::{core_names, GlobalState, ResponseKind, Type};
use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::visitor::{walk_class_def, walk_method_def, Visitor};
use garnet_ir::{ClassDef, Expr, ExprKind, FileRef, IdentKind, Literal, Loc, MethodDef, NameRef, ParsedFile, Send, SymbolRef};
use rustc_hash::FxHashMap;

/// Methods every object answers to. Sends of these are never reported as
/// missing.
const KERNEL_METHODS: &[&str] = &[
    "puts", "print", "p", "raise", "require", "require_relative", "include", "extend", "private",
    "public", "protected", "module_function", "new", "class", "nil?", "is_a?", "kind_of?",
    "respond_to?", "freeze", "frozen?", "dup", "clone", "to_s", "inspect", "hash", "==", "!=",
    "!", "equal?", "eql?", "send", "tap", "then", "instance_variable_get", "instance_variable_set",
    "object_id", "name",
];

/// The type of a literal value.
pub fn literal_type(lit: Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::Instance(SymbolRef::INTEGER),
        Literal::String(_) => Type::Instance(SymbolRef::STRING),
        Literal::Symbol(_) => Type::Instance(SymbolRef::SYMBOL),
        Literal::Nil => Type::Nil,
        Literal::True => Type::Instance(SymbolRef::TRUE_CLASS),
        Literal::False => Type::Instance(SymbolRef::FALSE_CLASS),
    }
}

/// Receives every typed node the inference walk visits.
pub trait TypeObserver {
    fn observe(&mut self, expr: &Expr, kind: ResponseKind);
}

impl TypeObserver for () {
    fn observe(&mut self, _expr: &Expr, _kind: ResponseKind) {}
}

/// Where a method body runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MethodContext {
    /// The innermost enclosing class, or the root at the top level.
    pub lexical_class: SymbolRef,
    pub self_type: Type,
}

impl MethodContext {
    pub fn new(gs: &GlobalState, method: &MethodDef, lexical_class: SymbolRef) -> Self {
        MethodContext {
            lexical_class,
            self_type: self_type(gs, method, lexical_class),
        }
    }
}

fn self_type(gs: &GlobalState, method: &MethodDef, lexical_class: SymbolRef) -> Type {
    let sym = method.symbol;
    if gs.symbol_exists(sym) && !sym.is_placeholder() {
        let owner = gs.symbol(sym).owner;
        if owner == SymbolRef::ROOT {
            return Type::Instance(SymbolRef::OBJECT);
        }
        let attached = gs.attached_class(owner);
        return if attached.exists() {
            Type::ClassOf(attached)
        } else {
            Type::Instance(owner)
        };
    }
    // Not named (a best-effort run met a new method): go by the syntax.
    if lexical_class.is_placeholder() {
        Type::Untyped
    } else if lexical_class == SymbolRef::ROOT {
        Type::Instance(SymbolRef::OBJECT)
    } else if method.is_self_method {
        Type::ClassOf(lexical_class)
    } else {
        Type::Instance(lexical_class)
    }
}

/// Call `f` for every method definition in `tree`, at any depth.
pub fn for_each_method<'ast>(gs: &GlobalState, tree: &'ast Expr, f: impl FnMut(&'ast MethodDef, MethodContext)) {
    let mut walker = MethodWalker {
        gs,
        classes: vec![SymbolRef::ROOT],
        f,
    };
    walker.visit_expr(tree);
}

struct MethodWalker<'gs, F> {
    gs: &'gs GlobalState,
    classes: Vec<SymbolRef>,
    f: F,
}

impl<'ast, F: FnMut(&'ast MethodDef, MethodContext)> Visitor<'ast> for MethodWalker<'_, F> {
    fn visit_class_def(&mut self, class: &'ast ClassDef) {
        self.classes.push(class.symbol);
        walk_class_def(self, class);
        self.classes.pop();
    }

    fn visit_method_def(&mut self, method: &'ast MethodDef) {
        let lexical_class = self.classes.last().copied().unwrap_or(SymbolRef::ROOT);
        let ctx = MethodContext::new(self.gs, method, lexical_class);
        (self.f)(method, ctx);
        walk_method_def(self, method);
    }
}

/// Run inference over a flattened tree, reporting to the state's error
/// channel. Untyped and interface files are skipped.
pub fn infer_file(gs: &GlobalState, tree: &ParsedFile) {
    let file = gs.file(tree.file);
    if !file.is_typed() || file.is_rbi() {
        return;
    }
    for_each_method(gs, &tree.tree, |method, ctx| {
        let mut inferencer = Inferencer::new(gs, tree.file, ctx, ());
        inferencer.infer_method(method);
        for diag in inferencer.into_diagnostics() {
            gs.push_error(diag);
        }
    });
}

/// Types one method body.
pub struct Inferencer<'gs, O> {
    gs: &'gs GlobalState,
    file: FileRef,
    ctx: MethodContext,
    locals: FxHashMap<NameRef, Type>,
    observer: O,
    report: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'gs, O: TypeObserver> Inferencer<'gs, O> {
    pub fn new(gs: &'gs GlobalState, file: FileRef, ctx: MethodContext, observer: O) -> Self {
        Inferencer {
            gs,
            file,
            ctx,
            locals: FxHashMap::default(),
            observer,
            report: true,
            diagnostics: Vec::new(),
        }
    }

    /// Observe without collecting diagnostics.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.report = false;
        self
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn infer_method(&mut self, method: &MethodDef) -> Type {
        for param in &method.params {
            self.locals.insert(param.name, Type::Untyped);
        }
        self.type_of(&method.body)
    }

    fn bind(&mut self, name: NameRef, ty: Type) {
        self.locals
            .entry(name)
            .and_modify(|existing| {
                if *existing != ty {
                    *existing = Type::Untyped;
                }
            })
            .or_insert(ty);
    }

    /// The class fields of `self` live on.
    fn field_owner(&self) -> SymbolRef {
        match self.ctx.self_type {
            Type::Instance(class) | Type::ClassOf(class) => class,
            Type::Untyped | Type::Nil => SymbolRef::NONE,
        }
    }

    fn field(&mut self, expr: &Expr, name: NameRef) -> Type {
        let owner = self.field_owner();
        let symbol = if owner.exists() && !owner.is_placeholder() {
            self.gs.lookup_member(owner, name)
        } else {
            SymbolRef::NONE
        };
        let ty = if symbol.exists() {
            self.gs.symbol(symbol).result_type
        } else {
            Type::Untyped
        };
        self.observer.observe(expr, ResponseKind::Field { symbol, name, ty });
        ty
    }

    fn constant(&mut self, expr: &Expr) -> Type {
        let ExprKind::ConstantLit(lit) = &expr.kind else {
            return Type::Untyped;
        };
        if let Some(scope) = &lit.scope {
            self.type_of(scope);
        }
        let ty = if lit.resolved {
            let data = self.gs.symbol(lit.symbol);
            if data.is_class_or_module() {
                Type::ClassOf(lit.symbol)
            } else {
                data.result_type
            }
        } else {
            Type::Untyped
        };
        self.observer.observe(
            expr,
            ResponseKind::Constant {
                symbol: lit.symbol,
                name: lit.name,
                ty,
            },
        );
        ty
    }

    pub fn type_of(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::Empty | ExprKind::RootScope => Type::Untyped,
            ExprKind::Seq(items) => {
                let mut last = Type::Untyped;
                for item in items {
                    last = self.type_of(item);
                }
                last
            }
            // Nested definitions are typed on their own.
            ExprKind::ClassDef(_) | ExprKind::MethodDef(_) => Type::Untyped,
            ExprKind::Assign { lhs, rhs } => {
                let ty = self.type_of(rhs);
                match &lhs.kind {
                    ExprKind::Local { name } => {
                        self.bind(*name, ty);
                        self.observer.observe(lhs, ResponseKind::Ident { name: *name, ty });
                    }
                    ExprKind::UnresolvedIdent {
                        kind: IdentKind::Instance | IdentKind::Class,
                        name,
                    } => {
                        self.field(lhs, *name);
                    }
                    _ => {
                        self.type_of(lhs);
                    }
                }
                ty
            }
            ExprKind::OpAssign { lhs, rhs, .. } => {
                self.type_of(lhs);
                self.type_of(rhs)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.type_of(cond);
                let then_ty = self.type_of(then_branch);
                let else_ty = self.type_of(else_branch);
                if then_ty == else_ty {
                    then_ty
                } else {
                    Type::Untyped
                }
            }
            ExprKind::Return(value) => {
                self.type_of(value);
                Type::Untyped
            }
            ExprKind::Send(send) => self.send(expr, send),
            ExprKind::UnresolvedConstant { scope, .. } => {
                self.type_of(scope);
                Type::Untyped
            }
            ExprKind::ConstantLit(_) => self.constant(expr),
            ExprKind::UnresolvedIdent { kind, name } => match kind {
                IdentKind::Instance | IdentKind::Class => self.field(expr, *name),
                IdentKind::Local | IdentKind::Global => {
                    self.observer.observe(
                        expr,
                        ResponseKind::Ident {
                            name: *name,
                            ty: Type::Untyped,
                        },
                    );
                    Type::Untyped
                }
            },
            ExprKind::Local { name } => {
                let ty = self.locals.get(name).copied().unwrap_or_default();
                self.observer.observe(expr, ResponseKind::Ident { name: *name, ty });
                ty
            }
            ExprKind::Literal(lit) => {
                let ty = literal_type(*lit);
                self.observer.observe(expr, ResponseKind::Literal { ty });
                ty
            }
            ExprKind::SelfRef => self.ctx.self_type,
        }
    }

    fn send(&mut self, expr: &Expr, send: &Send) -> Type {
        let receiver = self.type_of(&send.recv);
        for arg in &send.args {
            self.type_of(arg);
        }
        let (callee, result) = self.dispatch(expr, send, receiver);
        self.observer.observe(
            expr,
            ResponseKind::Send {
                callee,
                name: send.fun,
                receiver,
                result,
            },
        );
        result
    }

    /// The method a send calls and the type it returns.
    fn dispatch(&mut self, expr: &Expr, send: &Send, receiver: Type) -> (SymbolRef, Type) {
        let Some((class, on_class)) = receiver.dispatch_target() else {
            return (SymbolRef::NONE, Type::Untyped);
        };
        if class.is_placeholder() || !self.gs.symbol_exists(class) {
            return (SymbolRef::NONE, Type::Untyped);
        }

        if on_class && send.fun == core_names::NEW {
            let init = self.gs.find_member_transitive(class, core_names::INITIALIZE);
            if init.exists() {
                self.check_arity(expr, send, init);
            }
            let result = if self.gs.symbol(class).is_module() {
                Type::Untyped
            } else {
                Type::Instance(class)
            };
            return (init, result);
        }

        let lookup_in = if on_class {
            self.gs.lookup_singleton_class(class)
        } else {
            class
        };
        let method = if lookup_in.exists() {
            self.gs.find_member_transitive(lookup_in, send.fun)
        } else {
            SymbolRef::NONE
        };
        if method.exists() && self.gs.symbol(method).is_method() {
            self.check_arity(expr, send, method);
            return (method, self.gs.symbol(method).result_type);
        }

        if self.is_user_class(class) && !KERNEL_METHODS.contains(&self.gs.short_name(send.fun)) {
            let shown = if on_class {
                format!("<Class:{}>", self.gs.show_symbol(class))
            } else {
                self.gs.show_symbol(class)
            };
            self.error(
                Diagnostic::error(ErrorCode::E5001)
                    .with_message(format!(
                        "Method `{}` does not exist on `{shown}`",
                        self.gs.short_name(send.fun)
                    ))
                    .at(Loc::new(self.file, send.fun_span)),
            );
        }
        (SymbolRef::NONE, Type::Untyped)
    }

    fn is_user_class(&self, class: SymbolRef) -> bool {
        let data = self.gs.symbol(class);
        class.id() >= SymbolRef::WELL_KNOWN_COUNT && (data.is_class() || data.is_module()) && !data.is_singleton()
    }

    fn check_arity(&mut self, expr: &Expr, send: &Send, method: SymbolRef) {
        let expected = self.gs.symbol(method).arity();
        let got = send.args.len();
        if expected == got {
            return;
        }
        let what = if got < expected { "Not enough" } else { "Too many" };
        self.error(
            Diagnostic::error(ErrorCode::E5002)
                .with_message(format!(
                    "{what} arguments provided for method `{}`. Expected: {expected}, got: {got}",
                    self.gs.show_symbol(method)
                ))
                .at(Loc::new(self.file, expr.span)),
        );
    }

    fn error(&mut self, diag: Diagnostic) {
        if self.report {
            self.diagnostics.push(diag);
        }
    }
}

#[cfg(test)]
mod tests;
