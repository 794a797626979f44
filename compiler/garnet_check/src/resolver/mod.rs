//! Phase 6: resolve constant references and record class ancestry.
//!
//! Resolution runs in two passes over the batch:
//!
//! 1. Ancestry: superclass expressions and `include` arguments are looked up
//!    and turned into [`AncestryWrite`]s. The committing run applies them to
//!    the symbol table in order, rejecting cycles.
//! 2. Constants: every `UnresolvedConstant` becomes a `ConstantLit`.
//!    Lookups try the lexical nesting innermost first, then the ancestors of
//!    the innermost class. A constant that cannot be found points at
//!    `<StubModule>`. Static field assignments record the type of their
//!    value; a constant assigned a class is a type alias.
//!
//! The committing run reports diagnostics and writes ancestry and static
//! field types into the state. The best-effort run keeps every result in the
//! trees and writes nothing. Neither run enters symbols.

use garnet_core::{core_names, GlobalState, Snapshot, SymbolFlags, Type};
use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::visitor::{walk_expr_mut, walk_method_def_mut, MutVisitor, Visitor};
use garnet_ir::{ClassDef, ConstantLit, Expr, ExprKind, FileRef, Loc, MethodDef, NameRef, ParsedFile, SymbolRef};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};

use crate::paths::is_static_field_target;
use crate::{literal_type, PassPolicy};

/// A change to a class's ancestry found during resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AncestryWrite {
    Superclass {
        class: SymbolRef,
        superclass: SymbolRef,
        loc: Loc,
    },
    /// A `class` without `< Super` inherits from `Object` unless another
    /// declaration says otherwise.
    DefaultSuperclass { class: SymbolRef },
    Mixin {
        class: SymbolRef,
        module: SymbolRef,
        loc: Loc,
    },
}

/// Static field value types found while resolving, by field symbol.
type StaticTypes = FxHashMap<SymbolRef, Type>;

pub struct Resolver;

impl Resolver {
    /// Committing run over a whole batch. Requires the symbols table unfrozen.
    pub fn run(gs: &mut GlobalState, trees: Vec<ParsedFile>) -> Vec<ParsedFile> {
        let _span = debug_span!("resolver", files = trees.len()).entered();
        resolve_committing(gs, trees)
    }

    /// Committing run over files whose definitions are already in `gs`.
    pub fn run_incremental(gs: &mut GlobalState, trees: Vec<ParsedFile>) -> Vec<ParsedFile> {
        let _span = debug_span!("resolver_incremental", files = trees.len()).entered();
        let before = gs.symbols_used_total();
        let trees = resolve_committing(gs, trees);
        assert_eq!(
            before,
            gs.symbols_used_total(),
            "internal invariant: incremental resolution entered symbols"
        );
        trees
    }

    /// Best-effort run: resolve what the snapshot allows and record nothing.
    pub fn run_incremental_best_effort(snapshot: &Snapshot, trees: Vec<ParsedFile>) -> Vec<ParsedFile> {
        let _span = debug_span!("resolver_best_effort", files = trees.len()).entered();
        let gs = snapshot.state();
        let policy = PassPolicy::BEST_EFFORT;

        let mut diagnostics = Vec::new();
        let writes = collect_ancestry(gs, &trees, &mut diagnostics);
        let mut static_types = StaticTypes::default();
        let trees = trees
            .into_iter()
            .map(|tree| resolve_constants(gs, tree, &mut static_types, &mut diagnostics))
            .collect();
        debug!(
            dropped_writes = writes.len(),
            dropped_diagnostics = diagnostics.len(),
            "best-effort resolution done"
        );
        report(gs, policy, diagnostics);
        trees
    }
}

fn resolve_committing(gs: &mut GlobalState, trees: Vec<ParsedFile>) -> Vec<ParsedFile> {
    let policy = PassPolicy::COMMITTING;
    let mut diagnostics = Vec::new();

    let writes = collect_ancestry(gs, &trees, &mut diagnostics);
    apply_ancestry(gs, &writes, &mut diagnostics);

    let mut static_types = StaticTypes::default();
    let mut resolved = Vec::with_capacity(trees.len());
    for tree in trees {
        resolved.push(resolve_constants(gs, tree, &mut static_types, &mut diagnostics));
        // Later files see this file's aliases through the state.
        for (sym, ty) in static_types.drain() {
            gs.set_result_type(sym, ty);
            // A re-resolved value may no longer be a class.
            if matches!(ty, Type::ClassOf(_)) {
                gs.add_symbol_flags(sym, SymbolFlags::TYPE_ALIAS);
            } else {
                gs.remove_symbol_flags(sym, SymbolFlags::TYPE_ALIAS);
            }
        }
    }

    report(gs, policy, diagnostics);
    resolved
}

fn report(gs: &GlobalState, policy: PassPolicy, diagnostics: Vec<Diagnostic>) {
    if policy.surface_diagnostics {
        for diag in diagnostics {
            gs.push_error(diag);
        }
    }
}

fn apply_ancestry(gs: &mut GlobalState, writes: &[AncestryWrite], diagnostics: &mut Vec<Diagnostic>) {
    for &write in writes {
        match write {
            AncestryWrite::Superclass { class, superclass, loc } => {
                if superclass == class || gs.derives_from(superclass, class) {
                    diagnostics.push(
                        Diagnostic::error(ErrorCode::E3002)
                            .with_message(format!(
                                "Circular superclass: `{}` cannot inherit from `{}`",
                                gs.show_symbol(class),
                                gs.show_symbol(superclass)
                            ))
                            .at(loc),
                    );
                } else {
                    gs.set_superclass(class, superclass);
                }
            }
            AncestryWrite::DefaultSuperclass { class } => {
                let data = gs.symbol(class);
                if !data.superclass.exists() && class.id() >= SymbolRef::WELL_KNOWN_COUNT {
                    gs.set_superclass(class, SymbolRef::OBJECT);
                }
            }
            AncestryWrite::Mixin { class, module, loc } => {
                if module == class || gs.derives_from(module, class) {
                    diagnostics.push(
                        Diagnostic::error(ErrorCode::E3002)
                            .with_message(format!(
                                "Circular include: `{}` cannot include `{}`",
                                gs.show_symbol(class),
                                gs.show_symbol(module)
                            ))
                            .at(loc),
                    );
                } else {
                    gs.add_mixin(class, module);
                }
            }
        }
    }
}

/// Lexical lookup: each enclosing scope innermost first, then the ancestors
/// of the innermost class.
fn lookup_lexical(gs: &GlobalState, nesting: &[SymbolRef], name: NameRef) -> SymbolRef {
    for &scope in nesting.iter().rev() {
        if scope.is_placeholder() || !gs.symbol_exists(scope) {
            continue;
        }
        let sym = gs.lookup_member(scope, name);
        if sym.exists() {
            return sym;
        }
    }
    let innermost = nesting
        .iter()
        .rev()
        .copied()
        .find(|s| !s.is_placeholder() && *s != SymbolRef::ROOT && gs.symbol_exists(*s));
    match innermost {
        Some(class) => gs.find_member_transitive(class, name),
        None => SymbolRef::NONE,
    }
}

/// A static field that aliases a class stands for that class.
fn dealias(gs: &GlobalState, static_types: &StaticTypes, sym: SymbolRef) -> SymbolRef {
    if !gs.symbol_exists(sym) || !gs.symbol(sym).is_static_field() {
        return sym;
    }
    let ty = static_types
        .get(&sym)
        .copied()
        .unwrap_or(gs.symbol(sym).result_type);
    match ty {
        Type::ClassOf(class) => class,
        _ => sym,
    }
}

fn collect_ancestry(gs: &GlobalState, trees: &[ParsedFile], diagnostics: &mut Vec<Diagnostic>) -> Vec<AncestryWrite> {
    let static_types = StaticTypes::default();
    let mut collector = AncestryCollector {
        gs,
        static_types: &static_types,
        file: FileRef::NONE,
        nesting: vec![SymbolRef::ROOT],
        writes: Vec::new(),
        diagnostics,
    };
    for tree in trees {
        collector.file = tree.file;
        collector.visit_expr(&tree.tree);
    }
    collector.writes
}

struct AncestryCollector<'a> {
    gs: &'a GlobalState,
    static_types: &'a StaticTypes,
    file: FileRef,
    nesting: Vec<SymbolRef>,
    writes: Vec<AncestryWrite>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl AncestryCollector<'_> {
    /// The symbol a constant expression names, or `NONE`.
    fn resolve_path(&self, expr: &Expr) -> SymbolRef {
        let sym = match &expr.kind {
            ExprKind::UnresolvedConstant { scope, name } => match &scope.kind {
                ExprKind::Empty => lookup_lexical(self.gs, &self.nesting, *name),
                ExprKind::RootScope => self.gs.lookup_member(SymbolRef::ROOT, *name),
                _ => {
                    let owner = self.resolve_path(scope);
                    if owner.exists() {
                        self.gs.find_member_transitive(owner, *name)
                    } else {
                        SymbolRef::NONE
                    }
                }
            },
            ExprKind::ConstantLit(lit) if lit.resolved => lit.symbol,
            _ => SymbolRef::NONE,
        };
        dealias(self.gs, self.static_types, sym)
    }

    fn superclass_write(&mut self, class: &ClassDef, superclass: &Expr) {
        let target = self.resolve_path(superclass);
        if !target.exists() {
            // Reported when the constant itself is resolved.
            return;
        }
        let data = self.gs.symbol(target);
        if data.is_class() || (data.is_class_or_module() && data.is_undeclared()) {
            self.writes.push(AncestryWrite::Superclass {
                class: class.symbol,
                superclass: target,
                loc: Loc::new(self.file, superclass.span),
            });
        } else {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E3003)
                    .with_message(format!(
                        "Superclass of `{}` must be a class, `{}` is not",
                        self.gs.show_symbol(class.symbol),
                        self.gs.show_symbol(target)
                    ))
                    .at(Loc::new(self.file, superclass.span)),
            );
        }
    }

    fn mixin_writes(&mut self, class: &ClassDef) {
        for stmt in &class.body {
            let ExprKind::Send(send) = &stmt.kind else {
                continue;
            };
            if !send.implicit_self || send.fun != core_names::INCLUDE {
                continue;
            }
            for arg in &send.args {
                let module = self.resolve_path(arg);
                if !module.exists() {
                    continue;
                }
                let loc = Loc::new(self.file, arg.span);
                if self.gs.symbol(module).is_class() || !self.gs.symbol(module).is_class_or_module() {
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::E3004)
                            .with_message(format!(
                                "Only modules can be included, `{}` is not a module",
                                self.gs.show_symbol(module)
                            ))
                            .at(loc),
                    );
                } else {
                    self.writes.push(AncestryWrite::Mixin {
                        class: class.symbol,
                        module,
                        loc,
                    });
                }
            }
        }
    }
}

impl<'ast> Visitor<'ast> for AncestryCollector<'_> {
    fn visit_class_def(&mut self, class: &'ast ClassDef) {
        let sym = class.symbol;
        if !sym.is_placeholder() && self.gs.symbol_exists(sym) {
            if self.gs.symbol(sym).is_class() {
                match &class.superclass {
                    Some(superclass) => self.superclass_write(class, superclass),
                    None => self.writes.push(AncestryWrite::DefaultSuperclass { class: sym }),
                }
            }
            self.mixin_writes(class);
        }

        self.nesting.push(sym);
        for stmt in &class.body {
            self.visit_expr(stmt);
        }
        self.nesting.pop();
    }
}

fn resolve_constants(
    gs: &GlobalState,
    mut tree: ParsedFile,
    static_types: &mut StaticTypes,
    diagnostics: &mut Vec<Diagnostic>,
) -> ParsedFile {
    let mut resolver = ConstantResolver {
        gs,
        file: tree.file,
        nesting: vec![SymbolRef::ROOT],
        method_depth: 0,
        static_types,
        diagnostics,
    };
    resolver.visit_expr_mut(&mut tree.tree);
    tree
}

struct ConstantResolver<'a> {
    gs: &'a GlobalState,
    file: FileRef,
    nesting: Vec<SymbolRef>,
    method_depth: usize,
    static_types: &'a mut StaticTypes,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl ConstantResolver<'_> {
    fn unresolved(&mut self, name: NameRef, span: garnet_ir::Span) {
        self.diagnostics.push(
            Diagnostic::error(ErrorCode::E3001)
                .with_message(format!("Unable to resolve constant `{}`", self.gs.short_name(name)))
                .at(Loc::new(self.file, span)),
        );
    }

    /// Replace an `UnresolvedConstant` (and its scopes) with `ConstantLit`s.
    fn resolve_constant(&mut self, expr: &mut Expr) {
        let (mut scope, name) = match &mut expr.kind {
            ExprKind::UnresolvedConstant { scope, name } => (scope.take(), *name),
            _ => return,
        };

        let (target, report) = match &scope.kind {
            ExprKind::Empty => (lookup_lexical(self.gs, &self.nesting, name), true),
            ExprKind::RootScope => (self.gs.lookup_member(SymbolRef::ROOT, name), true),
            _ => {
                self.resolve_constant(&mut scope);
                match &scope.kind {
                    ExprKind::ConstantLit(lit) if lit.resolved => {
                        let owner = dealias(self.gs, self.static_types, lit.symbol);
                        (self.gs.find_member_transitive(owner, name), true)
                    }
                    // The scope already failed and was reported.
                    ExprKind::ConstantLit(_) => (SymbolRef::NONE, false),
                    _ => (SymbolRef::NONE, true),
                }
            }
        };

        let resolved = target.exists();
        if !resolved && report {
            self.unresolved(name, expr.span);
        }
        expr.kind = ExprKind::ConstantLit(Box::new(ConstantLit {
            symbol: if resolved { target } else { SymbolRef::STUB_MODULE },
            name,
            scope: if scope.is_empty_tree() { None } else { Some(scope) },
            resolved,
        }));
    }

    /// The name of a class definition resolves to the class itself.
    fn resolve_definition_name(&mut self, name_expr: &mut Expr, sym: SymbolRef) {
        let (mut scope, name) = match &mut name_expr.kind {
            ExprKind::UnresolvedConstant { scope, name } => (scope.take(), *name),
            _ => return,
        };
        self.resolve_constant(&mut scope);
        let resolved = sym.exists() && !sym.is_placeholder();
        name_expr.kind = ExprKind::ConstantLit(Box::new(ConstantLit {
            symbol: if resolved { sym } else { SymbolRef::STUB_MODULE },
            name,
            scope: if scope.is_empty_tree() { None } else { Some(scope) },
            resolved,
        }));
    }

    /// `X = value` outside any method.
    fn resolve_static_field(&mut self, lhs: &mut Expr, rhs: &Expr) {
        let name = match &lhs.kind {
            ExprKind::UnresolvedConstant { name, .. } => *name,
            ExprKind::ConstantLit(lit) => lit.name,
            _ => return,
        };
        let owner = self.nesting.last().copied().unwrap_or(SymbolRef::ROOT);
        let member = if owner.is_placeholder() {
            SymbolRef::NONE
        } else {
            self.gs.lookup_member(owner, name)
        };
        let sym = if member.exists() && self.gs.symbol(member).is_static_field() {
            member
        } else {
            SymbolRef::NONE
        };

        if sym.exists() {
            let ty = self.value_type(rhs);
            self.static_types.insert(sym, ty);
        }
        lhs.kind = ExprKind::ConstantLit(Box::new(ConstantLit {
            symbol: if sym.exists() { sym } else { SymbolRef::STUB_MODULE },
            name,
            scope: None,
            resolved: sym.exists(),
        }));
    }

    /// The type a static field takes from its (resolved) value.
    fn value_type(&self, rhs: &Expr) -> Type {
        match &rhs.kind {
            ExprKind::ConstantLit(lit) if lit.resolved => {
                let data = self.gs.symbol(lit.symbol);
                if data.is_class_or_module() {
                    Type::ClassOf(lit.symbol)
                } else if data.is_static_field() {
                    self.static_types
                        .get(&lit.symbol)
                        .copied()
                        .unwrap_or(data.result_type)
                } else {
                    Type::Untyped
                }
            }
            ExprKind::Literal(lit) => literal_type(*lit),
            ExprKind::Send(send) if send.fun == core_names::NEW => match &send.recv.kind {
                ExprKind::ConstantLit(lit) if lit.resolved => {
                    let class = dealias(self.gs, self.static_types, lit.symbol);
                    if self.gs.symbol(class).is_class() {
                        Type::Instance(class)
                    } else {
                        Type::Untyped
                    }
                }
                _ => Type::Untyped,
            },
            _ => Type::Untyped,
        }
    }
}

impl MutVisitor for ConstantResolver<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if matches!(expr.kind, ExprKind::UnresolvedConstant { .. }) {
            self.resolve_constant(expr);
            return;
        }
        if let ExprKind::Assign { lhs, rhs } = &mut expr.kind {
            if self.method_depth == 0 && is_static_field_target(lhs) {
                self.visit_expr_mut(rhs);
                self.resolve_static_field(lhs, rhs);
                return;
            }
        }
        walk_expr_mut(self, expr);
    }

    fn visit_class_def_mut(&mut self, class: &mut ClassDef) {
        self.resolve_definition_name(&mut class.name, class.symbol);
        // The superclass is evaluated outside the class body.
        if let Some(superclass) = &mut class.superclass {
            self.visit_expr_mut(superclass);
        }

        let outer_depth = std::mem::replace(&mut self.method_depth, 0);
        self.nesting.push(class.symbol);
        for stmt in &mut class.body {
            self.visit_expr_mut(stmt);
        }
        self.nesting.pop();
        self.method_depth = outer_depth;
    }

    fn visit_method_def_mut(&mut self, method: &mut MethodDef) {
        self.method_depth += 1;
        walk_method_def_mut(self, method);
        self.method_depth -= 1;
    }
}
