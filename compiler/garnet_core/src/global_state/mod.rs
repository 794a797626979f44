//! The shared state every phase reads and the namer/resolver grow.
//!
//! `GlobalState` owns three append-only tables (files, names, symbols). Each
//! table is frozen by default and may only be mutated through an
//! [`Unfrozen`] guard; mutating a frozen table is an internal invariant
//! violation and panics. Speculative work never touches the canonical state:
//! it takes a [`Snapshot`] (a deep copy) and scratches on that.

mod unfreeze;

use std::ops::Deref;
use std::sync::Arc;

use garnet_diagnostic::{Diagnostic, DiagnosticConfig};
use garnet_ir::{FileRef, Loc, NameRef, Span, SymbolRef};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::names::{core_names, NameKind, NameTable, UniqueNameKind};
use crate::symbols::{SymbolData, SymbolFlags};
use crate::{ErrorChannel, File, FileHash, Type};

pub use unfreeze::{Table, Unfrozen};

pub struct GlobalState {
    files: Vec<Arc<File>>,
    files_by_path: FxHashMap<String, FileRef>,
    names: NameTable,
    symbols: Vec<SymbolData>,
    files_frozen: bool,
    names_frozen: bool,
    symbols_frozen: bool,
    errors: ErrorChannel,
}

impl Default for GlobalState {
    fn default() -> Self {
        GlobalState::new()
    }
}

impl GlobalState {
    /// A state holding only the well-known names and symbols, all tables frozen.
    pub fn new() -> Self {
        GlobalState::with_diagnostic_config(DiagnosticConfig::default())
    }

    pub fn with_diagnostic_config(config: DiagnosticConfig) -> Self {
        let mut gs = GlobalState {
            files: vec![Arc::new(File::sentinel())],
            files_by_path: FxHashMap::default(),
            names: NameTable::default(),
            symbols: Vec::new(),
            files_frozen: false,
            names_frozen: false,
            symbols_frozen: false,
            errors: ErrorChannel::new(config),
        };
        gs.enter_core_names();
        gs.enter_core_symbols();
        gs.files_frozen = true;
        gs.names_frozen = true;
        gs.symbols_frozen = true;
        gs
    }

    fn enter_core_names(&mut self) {
        for text in core_names::UTF8 {
            self.enter_name_utf8(text);
        }
        for original in core_names::CONSTANTS {
            self.enter_name_constant(original);
        }
        assert_eq!(
            self.enter_name_constant(core_names::FALSE_CLASS),
            core_names::FALSE_CLASS_CONST,
            "internal invariant: core names out of order"
        );
    }

    fn enter_core_symbols(&mut self) {
        self.symbols.push(SymbolData::new(
            core_names::NO_SYMBOL,
            SymbolRef::NONE,
            SymbolFlags::empty(),
        ));
        self.symbols.push(SymbolData::new(
            core_names::ROOT,
            SymbolRef::NONE,
            SymbolFlags::CLASS_OR_MODULE | SymbolFlags::MODULE,
        ));

        let builtins = [
            (SymbolRef::TODO, core_names::TODO_CONST, SymbolFlags::CLASS),
            (SymbolRef::BASIC_OBJECT, core_names::BASIC_OBJECT_CONST, SymbolFlags::CLASS),
            (SymbolRef::OBJECT, core_names::OBJECT_CONST, SymbolFlags::CLASS),
            (SymbolRef::STUB_MODULE, core_names::STUB_MODULE_CONST, SymbolFlags::MODULE),
            (SymbolRef::INTEGER, core_names::INTEGER_CONST, SymbolFlags::CLASS),
            (SymbolRef::STRING, core_names::STRING_CONST, SymbolFlags::CLASS),
            (SymbolRef::SYMBOL, core_names::SYMBOL_CONST, SymbolFlags::CLASS),
            (SymbolRef::NIL_CLASS, core_names::NIL_CLASS_CONST, SymbolFlags::CLASS),
            (SymbolRef::TRUE_CLASS, core_names::TRUE_CLASS_CONST, SymbolFlags::CLASS),
            (SymbolRef::FALSE_CLASS, core_names::FALSE_CLASS_CONST, SymbolFlags::CLASS),
        ];
        for (expected, name, kind) in builtins {
            let sym = self.enter_class_symbol(Loc::NONE, SymbolRef::ROOT, name);
            assert_eq!(sym, expected, "internal invariant: core symbols out of order");
            let data = self.symbol_mut(sym);
            data.flags |= kind;
            if sym != SymbolRef::BASIC_OBJECT && kind == SymbolFlags::CLASS {
                data.superclass = if sym == SymbolRef::OBJECT {
                    SymbolRef::BASIC_OBJECT
                } else {
                    SymbolRef::OBJECT
                };
            }
        }
        assert_eq!(
            self.symbols_used_total(),
            SymbolRef::WELL_KNOWN_COUNT as usize,
            "internal invariant: unexpected core symbol count"
        );
    }

    // Freeze discipline

    pub fn unfreeze_files(&mut self) -> Unfrozen<'_> {
        Unfrozen::new(self, Table::Files)
    }

    pub fn unfreeze_names(&mut self) -> Unfrozen<'_> {
        Unfrozen::new(self, Table::Names)
    }

    pub fn unfreeze_symbols(&mut self) -> Unfrozen<'_> {
        Unfrozen::new(self, Table::Symbols)
    }

    pub fn is_frozen(&self, table: Table) -> bool {
        match table {
            Table::Files => self.files_frozen,
            Table::Names => self.names_frozen,
            Table::Symbols => self.symbols_frozen,
        }
    }

    /// Returns the previous flag.
    fn set_frozen(&mut self, table: Table, frozen: bool) -> bool {
        let flag = match table {
            Table::Files => &mut self.files_frozen,
            Table::Names => &mut self.names_frozen,
            Table::Symbols => &mut self.symbols_frozen,
        };
        std::mem::replace(flag, frozen)
    }

    #[track_caller]
    fn assert_unfrozen(&self, table: Table) {
        assert!(
            !self.is_frozen(table),
            "internal invariant: mutating the frozen {table:?} table"
        );
    }

    // Copies

    /// A fully independent copy of every table. The copy gets its own empty
    /// error channel.
    pub fn deep_copy(&self) -> GlobalState {
        trace!(
            files = self.files.len(),
            names = self.names.len(),
            symbols = self.symbols.len(),
            "deep copy"
        );
        GlobalState {
            files: self.files.clone(),
            files_by_path: self.files_by_path.clone(),
            names: self.names.clone(),
            symbols: self.symbols.clone(),
            files_frozen: self.files_frozen,
            names_frozen: self.names_frozen,
            symbols_frozen: self.symbols_frozen,
            errors: ErrorChannel::new(self.errors.config()),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            gs: self.deep_copy(),
        }
    }

    /// Whether the file, name and symbol tables hold identical contents.
    pub fn same_tables(&self, other: &GlobalState) -> bool {
        self.files == other.files
            && self.files_by_path == other.files_by_path
            && self.names == other.names
            && self.symbols == other.symbols
    }

    // Errors

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    pub fn push_error(&self, diag: Diagnostic) {
        self.errors.push(diag);
    }

    // Files

    pub fn enter_file(&mut self, file: File) -> FileRef {
        self.assert_unfrozen(Table::Files);
        assert!(
            !self.files_by_path.contains_key(file.path()),
            "internal invariant: {} entered twice",
            file.path()
        );
        let id = u32::try_from(self.files.len())
            .unwrap_or_else(|_| panic!("internal invariant: file table overflow"));
        let fref = FileRef::new(id);
        self.files_by_path.insert(file.path().to_owned(), fref);
        self.files.push(Arc::new(file));
        fref
    }

    /// Swap in new contents for an existing file. Its hash is cleared.
    pub fn replace_file(&mut self, fref: FileRef, mut file: File) {
        self.assert_unfrozen(Table::Files);
        assert!(self.file_exists(fref), "internal invariant: {fref:?} does not exist");
        file.set_hash(None);
        let old_path = self.files[fref.index()].path().to_owned();
        if old_path != file.path() {
            self.files_by_path.remove(&old_path);
            self.files_by_path.insert(file.path().to_owned(), fref);
        }
        self.files[fref.index()] = Arc::new(file);
    }

    pub fn set_file_hash(&mut self, fref: FileRef, hash: FileHash) {
        self.assert_unfrozen(Table::Files);
        assert!(self.file_exists(fref), "internal invariant: {fref:?} does not exist");
        Arc::make_mut(&mut self.files[fref.index()]).set_hash(Some(hash));
    }

    /// `FileRef::NONE` when no file has that path.
    pub fn find_file_by_path(&self, path: &str) -> FileRef {
        self.files_by_path.get(path).copied().unwrap_or(FileRef::NONE)
    }

    #[inline]
    pub fn file_exists(&self, fref: FileRef) -> bool {
        fref.exists() && fref.index() < self.files.len()
    }

    #[track_caller]
    pub fn file(&self, fref: FileRef) -> &File {
        assert!(self.file_exists(fref), "internal invariant: {fref:?} does not exist");
        &self.files[fref.index()]
    }

    /// Every real file with its handle, in handle order.
    pub fn files(&self) -> impl Iterator<Item = (FileRef, &File)> + '_ {
        self.files.iter().enumerate().skip(1).map(|(i, file)| {
            let id = u32::try_from(i).unwrap_or(u32::MAX);
            (FileRef::new(id), file.as_ref())
        })
    }

    pub fn files_used(&self) -> usize {
        self.files.len() - 1
    }

    // Names

    pub fn names_used(&self) -> usize {
        self.names.len()
    }

    fn enter_name(&mut self, kind: NameKind) -> NameRef {
        if self.names.would_insert(&kind) {
            self.assert_unfrozen(Table::Names);
        }
        self.names.intern(kind).0
    }

    pub fn enter_name_utf8(&mut self, text: &str) -> NameRef {
        self.enter_name(NameKind::Utf8(text.into()))
    }

    /// The constant-namespace twin of `original`.
    pub fn enter_name_constant(&mut self, original: NameRef) -> NameRef {
        self.enter_name(NameKind::Constant(original))
    }

    /// A name no user code can spell. Deterministic in its arguments.
    pub fn fresh_name_unique(&mut self, kind: UniqueNameKind, original: NameRef, num: u32) -> NameRef {
        self.enter_name(NameKind::Unique {
            kind,
            original,
            num,
        })
    }

    pub fn lookup_name_utf8(&self, text: &str) -> Option<NameRef> {
        self.names.lookup(&NameKind::Utf8(text.into()))
    }

    pub fn lookup_name_constant(&self, original: NameRef) -> Option<NameRef> {
        self.names.lookup(&NameKind::Constant(original))
    }

    pub fn lookup_name_unique(&self, kind: UniqueNameKind, original: NameRef, num: u32) -> Option<NameRef> {
        self.names.lookup(&NameKind::Unique {
            kind,
            original,
            num,
        })
    }

    #[track_caller]
    pub fn name_kind(&self, name: NameRef) -> &NameKind {
        self.names
            .get(name)
            .unwrap_or_else(|| panic!("internal invariant: {name:?} does not exist"))
    }

    pub fn is_constant_name(&self, name: NameRef) -> bool {
        matches!(self.name_kind(name), NameKind::Constant(_))
    }

    /// The text a user would write for `name`, without wrappers.
    pub fn short_name(&self, name: NameRef) -> &str {
        match self.name_kind(name) {
            NameKind::Utf8(text) => text,
            NameKind::Constant(original) | NameKind::Unique { original, .. } => {
                self.short_name(*original)
            }
        }
    }

    pub fn show_name(&self, name: NameRef) -> String {
        match self.name_kind(name) {
            NameKind::Utf8(text) => text.to_string(),
            NameKind::Constant(original) => self.show_name(*original),
            NameKind::Unique {
                kind: UniqueNameKind::Singleton,
                original,
                ..
            } => format!("<Class:{}>", self.show_name(*original)),
            NameKind::Unique {
                kind: UniqueNameKind::StaticInit | UniqueNameKind::ClassStaticInit,
                ..
            } => "<static-init>".to_owned(),
            NameKind::Unique {
                kind: UniqueNameKind::MangleRename,
                original,
                num,
            } => format!("{}${num}", self.show_name(*original)),
        }
    }

    // Symbols

    pub fn symbols_used_total(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn symbol_exists(&self, sym: SymbolRef) -> bool {
        sym.exists() && sym.index() < self.symbols.len()
    }

    #[track_caller]
    pub fn symbol(&self, sym: SymbolRef) -> &SymbolData {
        assert!(self.symbol_exists(sym), "internal invariant: {sym:?} does not exist");
        &self.symbols[sym.index()]
    }

    #[track_caller]
    fn symbol_mut(&mut self, sym: SymbolRef) -> &mut SymbolData {
        self.assert_unfrozen(Table::Symbols);
        assert!(self.symbol_exists(sym), "internal invariant: {sym:?} does not exist");
        &mut self.symbols[sym.index()]
    }

    /// `SymbolRef::NONE` when `owner` has no member called `name`.
    pub fn lookup_member(&self, owner: SymbolRef, name: NameRef) -> SymbolRef {
        if !self.symbol_exists(owner) {
            return SymbolRef::NONE;
        }
        self.symbol(owner)
            .members
            .get(&name)
            .copied()
            .unwrap_or(SymbolRef::NONE)
    }

    /// Look `name` up on `owner` and then on each of its ancestors.
    pub fn find_member_transitive(&self, owner: SymbolRef, name: NameRef) -> SymbolRef {
        self.ancestors(owner)
            .into_iter()
            .map(|ancestor| self.lookup_member(ancestor, name))
            .find(|sym| sym.exists())
            .unwrap_or(SymbolRef::NONE)
    }

    fn push_symbol(&mut self, owner: SymbolRef, name: NameRef, flags: SymbolFlags) -> SymbolRef {
        self.assert_unfrozen(Table::Symbols);
        let id = u32::try_from(self.symbols.len())
            .unwrap_or_else(|_| panic!("internal invariant: symbol table overflow"));
        let sym = SymbolRef::new(id);
        self.symbols.push(SymbolData::new(name, owner, flags));
        if owner.exists() {
            self.symbol_mut(owner).members.insert(name, sym);
        }
        sym
    }

    /// Shared by the `enter_*_symbol` family. Re-entering an existing member
    /// of the same kind returns it. A member of another kind is renamed out
    /// of the way first.
    fn enter_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameRef, kind: SymbolFlags) -> SymbolRef {
        assert!(self.symbol_exists(owner), "internal invariant: owner {owner:?} does not exist");
        let existing = self.lookup_member(owner, name);
        let sym = if existing.exists() && self.symbol(existing).flags.contains(kind) {
            existing
        } else {
            if existing.exists() {
                self.mangle_rename(existing);
            }
            self.push_symbol(owner, name, kind)
        };
        if loc.exists() {
            self.add_symbol_loc(sym, loc);
        }
        sym
    }

    fn mangle_rename(&mut self, sym: SymbolRef) {
        let (owner, name) = {
            let data = self.symbol(sym);
            (data.owner, data.name)
        };
        let num = u32::try_from(sym.index()).unwrap_or(u32::MAX);
        let mangled = self.fresh_name_unique(UniqueNameKind::MangleRename, name, num);
        let owner_data = self.symbol_mut(owner);
        owner_data.members.remove(&name);
        owner_data.members.insert(mangled, sym);
        self.symbol_mut(sym).name = mangled;
    }

    pub fn enter_class_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameRef) -> SymbolRef {
        self.enter_symbol(loc, owner, name, SymbolFlags::CLASS_OR_MODULE)
    }

    pub fn enter_method_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameRef) -> SymbolRef {
        self.enter_symbol(loc, owner, name, SymbolFlags::METHOD)
    }

    pub fn enter_field_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameRef) -> SymbolRef {
        self.enter_symbol(loc, owner, name, SymbolFlags::FIELD)
    }

    pub fn enter_static_field_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameRef) -> SymbolRef {
        self.enter_symbol(loc, owner, name, SymbolFlags::STATIC_FIELD)
    }

    /// Record `class` or `module` for a class symbol.
    pub fn declare_class_or_module(&mut self, sym: SymbolRef, is_module: bool) {
        let flag = if is_module {
            SymbolFlags::MODULE
        } else {
            SymbolFlags::CLASS
        };
        let data = self.symbol_mut(sym);
        data.flags |= flag;
    }

    pub fn add_symbol_flags(&mut self, sym: SymbolRef, flags: SymbolFlags) {
        let data = self.symbol_mut(sym);
        data.flags |= flags;
    }

    pub fn remove_symbol_flags(&mut self, sym: SymbolRef, flags: SymbolFlags) {
        self.symbol_mut(sym).flags.remove(flags);
    }

    pub fn set_method_params(&mut self, sym: SymbolRef, params: Vec<NameRef>) {
        self.symbol_mut(sym).params = params;
    }

    /// Keeps one location per file: a new location in a file already
    /// recorded replaces the old one.
    pub fn add_symbol_loc(&mut self, sym: SymbolRef, loc: Loc) {
        let data = self.symbol_mut(sym);
        if let Some(existing) = data.locs.iter_mut().find(|l| l.file == loc.file) {
            *existing = loc;
        } else {
            data.locs.push(loc);
        }
    }

    pub fn set_superclass(&mut self, sym: SymbolRef, superclass: SymbolRef) {
        self.symbol_mut(sym).superclass = superclass;
    }

    /// Adding a module that is already mixed in is a no-op.
    pub fn add_mixin(&mut self, sym: SymbolRef, module: SymbolRef) {
        let data = self.symbol_mut(sym);
        if !data.mixins.contains(&module) {
            data.mixins.push(module);
        }
    }

    pub fn set_result_type(&mut self, sym: SymbolRef, ty: Type) {
        self.symbol_mut(sym).result_type = ty;
    }

    /// The singleton class of `sym`, entering it if needed.
    pub fn singleton_class(&mut self, sym: SymbolRef) -> SymbolRef {
        let existing = self.lookup_singleton_class(sym);
        if existing.exists() {
            return existing;
        }
        let class_name = self.symbol(sym).name;
        let name = self.fresh_name_unique(UniqueNameKind::Singleton, class_name, 0);
        let singleton = self.push_symbol(
            sym,
            name,
            SymbolFlags::CLASS_OR_MODULE | SymbolFlags::CLASS | SymbolFlags::SINGLETON,
        );
        let locs = self.symbol(sym).locs.clone();
        let data = self.symbol_mut(singleton);
        data.singleton_link = sym;
        data.locs = locs;
        self.symbol_mut(sym).singleton_link = singleton;
        singleton
    }

    /// `SymbolRef::NONE` when no singleton class was entered yet.
    pub fn lookup_singleton_class(&self, sym: SymbolRef) -> SymbolRef {
        let data = self.symbol(sym);
        if data.is_singleton() {
            SymbolRef::NONE
        } else {
            data.singleton_link
        }
    }

    /// The class a singleton class is attached to.
    pub fn attached_class(&self, singleton: SymbolRef) -> SymbolRef {
        let data = self.symbol(singleton);
        if data.is_singleton() {
            data.singleton_link
        } else {
            SymbolRef::NONE
        }
    }

    /// Enter the `<static-init>` method holding a file's top-level code.
    pub fn static_init_for_file(&mut self, file: FileRef) -> SymbolRef {
        let name = self.fresh_name_unique(UniqueNameKind::StaticInit, core_names::STATIC_INIT, file.id());
        let loc = Loc::new(file, Span::new(0, 0));
        let sym = self.enter_method_symbol(loc, SymbolRef::ROOT, name);
        self.add_symbol_flags(sym, SymbolFlags::SYNTHETIC);
        sym
    }

    /// Panics when `static_init_for_file` was never called for `file`.
    #[track_caller]
    pub fn lookup_static_init_for_file(&self, file: FileRef) -> SymbolRef {
        let sym = self
            .lookup_name_unique(UniqueNameKind::StaticInit, core_names::STATIC_INIT, file.id())
            .map_or(SymbolRef::NONE, |name| self.lookup_member(SymbolRef::ROOT, name));
        assert!(
            sym.exists(),
            "internal invariant: no <static-init> entered for {file:?}"
        );
        sym
    }

    /// Enter the `<static-init>` method holding a class body's code.
    pub fn static_init_for_class(&mut self, class: SymbolRef) -> SymbolRef {
        let singleton = self.singleton_class(class);
        let name = self.fresh_name_unique(UniqueNameKind::ClassStaticInit, core_names::STATIC_INIT, 0);
        let loc = self.symbol(class).loc();
        let sym = self.enter_method_symbol(loc, singleton, name);
        self.add_symbol_flags(sym, SymbolFlags::SYNTHETIC);
        sym
    }

    /// `SymbolRef::NONE` when the class has no `<static-init>` yet.
    pub fn lookup_static_init_for_class(&self, class: SymbolRef) -> SymbolRef {
        let singleton = self.lookup_singleton_class(class);
        if !singleton.exists() {
            return SymbolRef::NONE;
        }
        self.lookup_name_unique(UniqueNameKind::ClassStaticInit, core_names::STATIC_INIT, 0)
            .map_or(SymbolRef::NONE, |name| self.lookup_member(singleton, name))
    }

    /// Method resolution order: the class, its mixins (last included first),
    /// then the superclass chain. For a singleton class the chain continues
    /// through the singletons of the attached class's ancestors.
    pub fn ancestors(&self, sym: SymbolRef) -> Vec<SymbolRef> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = sym;
        while self.symbol_exists(current) && seen.insert(current) {
            out.push(current);
            let data = self.symbol(current);
            for &mixin in data.mixins.iter().rev() {
                self.push_module_ancestors(mixin, &mut out, &mut seen);
            }
            current = self.next_in_chain(current);
        }
        out
    }

    fn push_module_ancestors(&self, module: SymbolRef, out: &mut Vec<SymbolRef>, seen: &mut FxHashSet<SymbolRef>) {
        if !self.symbol_exists(module) || !seen.insert(module) {
            return;
        }
        out.push(module);
        for &mixin in self.symbol(module).mixins.iter().rev() {
            self.push_module_ancestors(mixin, out, seen);
        }
    }

    fn next_in_chain(&self, sym: SymbolRef) -> SymbolRef {
        let data = self.symbol(sym);
        if !data.is_singleton() {
            return data.superclass;
        }
        // Nearest ancestor of the attached class that has a singleton.
        let mut seen = FxHashSet::default();
        let mut class = self.symbol(data.singleton_link).superclass;
        while self.symbol_exists(class) && seen.insert(class) {
            let singleton = self.lookup_singleton_class(class);
            if singleton.exists() {
                return singleton;
            }
            class = self.symbol(class).superclass;
        }
        SymbolRef::NONE
    }

    /// Whether `ancestor` appears in the superclass chain of `sym`.
    pub fn derives_from(&self, sym: SymbolRef, ancestor: SymbolRef) -> bool {
        self.ancestors(sym).contains(&ancestor)
    }

    /// Fully qualified name: `A::B`, `A#m`, `A.m`, `A#@x`.
    pub fn show_symbol(&self, sym: SymbolRef) -> String {
        if !self.symbol_exists(sym) {
            return "<none>".to_owned();
        }
        let data = self.symbol(sym);
        if sym == SymbolRef::ROOT {
            return "<root>".to_owned();
        }
        if data.is_singleton() {
            return format!("<Class:{}>", self.show_symbol(data.singleton_link));
        }
        let name = self.show_name(data.name);
        let owner = data.owner;
        if owner == SymbolRef::ROOT || !self.symbol_exists(owner) {
            return name;
        }
        let owner_data = self.symbol(owner);
        if data.is_method() && owner_data.is_singleton() {
            format!("{}.{name}", self.show_symbol(owner_data.singleton_link))
        } else if data.is_method() || data.is_field() {
            format!("{}#{name}", self.show_symbol(owner))
        } else {
            format!("{}::{name}", self.show_symbol(owner))
        }
    }
}

/// A private deep copy of a `GlobalState`.
///
/// Best-effort passes only accept a `Snapshot`, so they cannot be pointed at
/// the canonical state by mistake.
pub struct Snapshot {
    gs: GlobalState,
}

impl Snapshot {
    pub fn state(&self) -> &GlobalState {
        &self.gs
    }

    /// Mutable access, for forcing scaffolding before a best-effort run.
    pub fn state_mut(&mut self) -> &mut GlobalState {
        &mut self.gs
    }

    pub fn into_state(self) -> GlobalState {
        self.gs
    }
}

impl Deref for Snapshot {
    type Target = GlobalState;

    fn deref(&self) -> &GlobalState {
        &self.gs
    }
}

#[cfg(test)]
mod tests;
