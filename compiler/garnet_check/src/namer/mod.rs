//! Phase 5: enter every class, method, field and constant definition.
//!
//! Naming happens in three steps:
//!
//! 1. [`find_definitions`] walks one tree and records what it defines. It
//!    only reads the state, so files are processed in parallel.
//! 2. [`symbolize`] turns the found definitions into symbols through a
//!    [`SymbolDefiner`]. The committing run enters symbols; the best-effort
//!    run only looks them up and substitutes `<todo>` for anything missing.
//! 3. The symbols are written back into the tree's definition nodes.
//!
//! Steps 2 and 3 are shared between the two runs so they cannot drift apart.

mod definer;

use garnet_core::{core_names, GlobalState, Snapshot};
use garnet_ir::visitor::{walk_expr, walk_expr_mut, walk_method_def, walk_method_def_mut, MutVisitor, Visitor};
use garnet_ir::{ClassDef, ClassKind, Expr, ExprKind, FileRef, IdentKind, Loc, MethodDef, NameRef, ParsedFile, SymbolRef};
use tracing::{debug, debug_span, trace};

use crate::paths::{constant_path, is_static_field_target, ConstPath};
use crate::{FileMapper, PassPolicy};

pub use definer::{EnteringDefiner, LookupDefiner, SymbolDefiner};

/// The owner a definition was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionOwner {
    /// The file's top level.
    Root,
    /// Index into [`FoundDefinitions::classes`].
    Class(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundClass {
    pub owner: DefinitionOwner,
    /// `None` when the name is not a constant path.
    pub path: Option<ConstPath>,
    pub kind: ClassKind,
    pub loc: Loc,
    pub superclass: Option<ConstPath>,
    /// Constant arguments of `include` calls in the body.
    pub includes: Vec<ConstPath>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundMethod {
    pub owner: DefinitionOwner,
    pub name: NameRef,
    pub params: Vec<NameRef>,
    pub is_self_method: bool,
    pub synthetic: bool,
    pub loc: Loc,
}

/// An instance variable, class variable or constant assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundField {
    pub owner: DefinitionOwner,
    pub name: NameRef,
    pub loc: Loc,
    /// The constant a static field is assigned, which it may alias.
    pub value: Option<ConstPath>,
}

/// Everything one file defines, in tree order.
///
/// A class always appears before anything it owns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FoundDefinitions {
    pub classes: Vec<FoundClass>,
    pub methods: Vec<FoundMethod>,
    pub fields: Vec<FoundField>,
    pub static_fields: Vec<FoundField>,
}

/// Symbols for a file's found definitions, index for index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Symbolized {
    pub classes: Vec<SymbolRef>,
    pub methods: Vec<SymbolRef>,
    pub fields: Vec<SymbolRef>,
    pub static_fields: Vec<SymbolRef>,
}

/// Record the definitions in one tree.
pub fn find_definitions(gs: &GlobalState, tree: &ParsedFile) -> FoundDefinitions {
    let mut finder = DefinitionFinder {
        gs,
        file: tree.file,
        found: FoundDefinitions::default(),
        owners: Vec::new(),
        method_depth: 0,
    };
    finder.visit_expr(&tree.tree);
    finder.found
}

struct DefinitionFinder<'gs> {
    gs: &'gs GlobalState,
    file: FileRef,
    found: FoundDefinitions,
    owners: Vec<usize>,
    method_depth: usize,
}

impl DefinitionFinder<'_> {
    fn owner(&self) -> DefinitionOwner {
        self.owners
            .last()
            .map_or(DefinitionOwner::Root, |&idx| DefinitionOwner::Class(idx))
    }

    fn includes(&self, class: &ClassDef) -> Vec<ConstPath> {
        let mut includes = Vec::new();
        for stmt in &class.body {
            if let ExprKind::Send(send) = &stmt.kind {
                if send.implicit_self && send.fun == core_names::INCLUDE {
                    includes.extend(send.args.iter().filter_map(constant_path));
                }
            }
        }
        includes
    }
}

impl<'ast> Visitor<'ast> for DefinitionFinder<'_> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match &expr.kind {
            ExprKind::Assign { lhs, rhs } if self.method_depth == 0 && is_static_field_target(lhs) => {
                if let Some(name) = constant_path(lhs).and_then(|p| p.last()) {
                    self.found.static_fields.push(FoundField {
                        owner: self.owner(),
                        name,
                        loc: Loc::new(self.file, lhs.span),
                        value: constant_path(rhs),
                    });
                }
            }
            ExprKind::UnresolvedIdent {
                kind: IdentKind::Instance | IdentKind::Class,
                name,
            } => {
                self.found.fields.push(FoundField {
                    owner: self.owner(),
                    name: *name,
                    loc: Loc::new(self.file, expr.span),
                    value: None,
                });
            }
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_class_def(&mut self, class: &'ast ClassDef) {
        let idx = self.found.classes.len();
        self.found.classes.push(FoundClass {
            owner: self.owner(),
            path: constant_path(&class.name),
            kind: class.kind,
            loc: Loc::new(self.file, class.decl_span),
            superclass: class.superclass.as_ref().and_then(constant_path),
            includes: self.includes(class),
        });
        trace!(class = %self.gs.show_name(class_name(&class.name)), "found class");

        // Superclass expressions define nothing; the body is in the class's scope.
        let outer_depth = std::mem::replace(&mut self.method_depth, 0);
        self.owners.push(idx);
        for stmt in &class.body {
            self.visit_expr(stmt);
        }
        self.owners.pop();
        self.method_depth = outer_depth;
    }

    fn visit_method_def(&mut self, method: &'ast MethodDef) {
        self.found.methods.push(FoundMethod {
            owner: self.owner(),
            name: method.name,
            params: method.params.iter().map(|p| p.name).collect(),
            is_self_method: method.is_self_method,
            synthetic: method.synthetic,
            loc: Loc::new(self.file, method.decl_span),
        });
        self.method_depth += 1;
        walk_method_def(self, method);
        self.method_depth -= 1;
    }
}

fn class_name(name: &Expr) -> NameRef {
    constant_path(name)
        .and_then(|p| p.last())
        .unwrap_or(core_names::TODO_CONST)
}

/// Turn found definitions into symbols.
///
/// Owners are resolved here: a path prefix such as `A` in `class A::B`
/// becomes an undeclared class, top-level methods and fields belong to
/// `Object`, and top-level constants to the root. Anything owned by `<todo>`
/// is `<todo>` itself.
pub fn symbolize<D: SymbolDefiner>(definer: &mut D, found: &FoundDefinitions) -> Symbolized {
    let mut out = Symbolized {
        classes: Vec::with_capacity(found.classes.len()),
        ..Symbolized::default()
    };

    for class in &found.classes {
        let sym = match &class.path {
            Some(path) => {
                let mut owner = if path.rooted {
                    SymbolRef::ROOT
                } else {
                    lexical_owner(&out.classes, class.owner, SymbolRef::ROOT)
                };
                let (last, prefix) = match path.names.split_last() {
                    Some(split) => split,
                    None => (&core_names::TODO_CONST, &[][..]),
                };
                for &segment in prefix {
                    if owner == SymbolRef::TODO {
                        break;
                    }
                    owner = definer.class(owner, segment, Loc::NONE, None);
                }
                if owner == SymbolRef::TODO {
                    SymbolRef::TODO
                } else {
                    definer.class(owner, *last, class.loc, Some(class.kind))
                }
            }
            None => SymbolRef::TODO,
        };
        out.classes.push(sym);
    }

    for method in &found.methods {
        let mut owner = lexical_owner(&out.classes, method.owner, SymbolRef::OBJECT);
        if method.is_self_method && owner != SymbolRef::TODO {
            owner = definer.singleton(owner);
        }
        let sym = if owner == SymbolRef::TODO {
            SymbolRef::TODO
        } else {
            definer.method(owner, method)
        };
        out.methods.push(sym);
    }

    for field in &found.fields {
        let owner = lexical_owner(&out.classes, field.owner, SymbolRef::OBJECT);
        let sym = if owner == SymbolRef::TODO {
            SymbolRef::TODO
        } else {
            definer.field(owner, field.name, field.loc)
        };
        out.fields.push(sym);
    }

    for field in &found.static_fields {
        let owner = lexical_owner(&out.classes, field.owner, SymbolRef::ROOT);
        let sym = if owner == SymbolRef::TODO {
            SymbolRef::TODO
        } else {
            definer.static_field(owner, field.name, field.loc)
        };
        out.static_fields.push(sym);
    }

    out
}

fn lexical_owner(classes: &[SymbolRef], owner: DefinitionOwner, top_level: SymbolRef) -> SymbolRef {
    match owner {
        DefinitionOwner::Root => top_level,
        DefinitionOwner::Class(idx) => classes.get(idx).copied().unwrap_or(SymbolRef::TODO),
    }
}

/// Write class and method symbols into the tree's definition nodes.
///
/// Walks in the same order as [`find_definitions`].
pub fn write_symbols(tree: &mut Expr, symbols: &Symbolized) {
    let mut writer = SymbolWriter {
        symbols,
        next_class: 0,
        next_method: 0,
    };
    writer.visit_expr_mut(tree);
    assert_eq!(
        (writer.next_class, writer.next_method),
        (symbols.classes.len(), symbols.methods.len()),
        "internal invariant: definitions changed between finding and writing"
    );
}

struct SymbolWriter<'a> {
    symbols: &'a Symbolized,
    next_class: usize,
    next_method: usize,
}

impl MutVisitor for SymbolWriter<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_class_def_mut(&mut self, class: &mut ClassDef) {
        class.symbol = self
            .symbols
            .classes
            .get(self.next_class)
            .copied()
            .unwrap_or(SymbolRef::TODO);
        self.next_class += 1;
        for stmt in &mut class.body {
            self.visit_expr_mut(stmt);
        }
    }

    fn visit_method_def_mut(&mut self, method: &mut MethodDef) {
        method.symbol = self
            .symbols
            .methods
            .get(self.next_method)
            .copied()
            .unwrap_or(SymbolRef::TODO);
        self.next_method += 1;
        walk_method_def_mut(self, method);
    }
}

pub struct Namer;

impl Namer {
    /// Committing run: enter every definition of `trees` into `gs`.
    ///
    /// Requires the names and symbols tables unfrozen. Also enters the
    /// `<static-init>` method of each file. Re-running over the same trees
    /// enters nothing new.
    pub fn run<M: FileMapper>(gs: &mut GlobalState, trees: Vec<ParsedFile>, mapper: &M) -> Vec<ParsedFile> {
        let _span = debug_span!("namer", files = trees.len()).entered();

        let found = {
            let gs: &GlobalState = gs;
            mapper.map(&trees, |tree| find_definitions(gs, tree))
        };

        for tree in &trees {
            gs.static_init_for_file(tree.file);
        }

        let mut definer = EnteringDefiner::new(gs);
        trees
            .into_iter()
            .zip(found)
            .map(|(mut tree, found)| {
                let symbols = symbolize(&mut definer, &found);
                write_symbols(&mut tree.tree, &symbols);
                tree
            })
            .collect()
    }

    /// Best-effort run against a snapshot: look every definition up and use
    /// `<todo>` for the ones the snapshot does not have.
    ///
    /// The `<static-init>` of every file must already exist in the snapshot.
    pub fn symbolize_trees_best_effort<M: FileMapper>(
        snapshot: &Snapshot,
        trees: Vec<ParsedFile>,
        mapper: &M,
    ) -> Vec<ParsedFile> {
        let _span = debug_span!("namer_best_effort", files = trees.len()).entered();
        let gs = snapshot.state();

        for tree in &trees {
            gs.lookup_static_init_for_file(tree.file);
        }

        let found = mapper.map(&trees, |tree| find_definitions(gs, tree));
        let mut definer = LookupDefiner::new(gs, PassPolicy::BEST_EFFORT);
        let trees: Vec<ParsedFile> = trees
            .into_iter()
            .zip(found)
            .map(|(mut tree, found)| {
                let symbols = symbolize(&mut definer, &found);
                write_symbols(&mut tree.tree, &symbols);
                tree
            })
            .collect();
        debug!(missing = definer.missing(), "best-effort naming done");
        trees
    }
}
