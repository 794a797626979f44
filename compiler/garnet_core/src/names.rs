//! The name table.
//!
//! Names are hash-consed: entering the same text (or the same wrapper around
//! the same name) twice yields the same `NameRef`. The table is append-only.

use garnet_ir::NameRef;
use rustc_hash::FxHashMap;

/// Why a unique name was minted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UniqueNameKind {
    /// `<Class:Foo>`
    Singleton,
    /// Per-file `<static-init>`.
    StaticInit,
    /// Per-class `<static-init>`.
    ClassStaticInit,
    /// A symbol moved aside because a member of another kind took its name.
    MangleRename,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameKind {
    Utf8(Box<str>),
    /// The constant-namespace twin of a UTF-8 name.
    Constant(NameRef),
    Unique {
        kind: UniqueNameKind,
        original: NameRef,
        num: u32,
    },
}

/// Names every `GlobalState` starts with, at fixed handles.
pub mod core_names {
    use garnet_ir::NameRef;

    pub const EMPTY: NameRef = NameRef::new(0);
    pub const NO_SYMBOL: NameRef = NameRef::new(1);
    pub const ROOT: NameRef = NameRef::new(2);
    pub const TODO: NameRef = NameRef::new(3);
    pub const STATIC_INIT: NameRef = NameRef::new(4);
    pub const INITIALIZE: NameRef = NameRef::new(5);
    pub const NEW: NameRef = NameRef::new(6);
    pub const ATTR_READER: NameRef = NameRef::new(7);
    pub const ATTR_WRITER: NameRef = NameRef::new(8);
    pub const ATTR_ACCESSOR: NameRef = NameRef::new(9);
    pub const INCLUDE: NameRef = NameRef::new(10);
    pub const PLUS: NameRef = NameRef::new(11);
    pub const BASIC_OBJECT: NameRef = NameRef::new(12);
    pub const OBJECT: NameRef = NameRef::new(13);
    pub const STUB_MODULE: NameRef = NameRef::new(14);
    pub const INTEGER: NameRef = NameRef::new(15);
    pub const STRING: NameRef = NameRef::new(16);
    pub const SYMBOL: NameRef = NameRef::new(17);
    pub const NIL_CLASS: NameRef = NameRef::new(18);
    pub const TRUE_CLASS: NameRef = NameRef::new(19);
    pub const FALSE_CLASS: NameRef = NameRef::new(20);

    pub const TODO_CONST: NameRef = NameRef::new(21);
    pub const BASIC_OBJECT_CONST: NameRef = NameRef::new(22);
    pub const OBJECT_CONST: NameRef = NameRef::new(23);
    pub const STUB_MODULE_CONST: NameRef = NameRef::new(24);
    pub const INTEGER_CONST: NameRef = NameRef::new(25);
    pub const STRING_CONST: NameRef = NameRef::new(26);
    pub const SYMBOL_CONST: NameRef = NameRef::new(27);
    pub const NIL_CLASS_CONST: NameRef = NameRef::new(28);
    pub const TRUE_CLASS_CONST: NameRef = NameRef::new(29);
    pub const FALSE_CLASS_CONST: NameRef = NameRef::new(30);

    pub(crate) const UTF8: [&str; 21] = [
        "",
        "<none>",
        "<root>",
        "<todo>",
        "<static-init>",
        "initialize",
        "new",
        "attr_reader",
        "attr_writer",
        "attr_accessor",
        "include",
        "+",
        "BasicObject",
        "Object",
        "<StubModule>",
        "Integer",
        "String",
        "Symbol",
        "NilClass",
        "TrueClass",
        "FalseClass",
    ];

    /// Wrapped in `NameKind::Constant`, entered right after `UTF8`.
    pub(crate) const CONSTANTS: [NameRef; 10] = [
        TODO,
        BASIC_OBJECT,
        OBJECT,
        STUB_MODULE,
        INTEGER,
        STRING,
        SYMBOL,
        NIL_CLASS,
        TRUE_CLASS,
        FALSE_CLASS,
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable {
    names: Vec<NameKind>,
    lookup: FxHashMap<NameKind, NameRef>,
}

impl NameTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: NameRef) -> Option<&NameKind> {
        self.names.get(name.index())
    }

    pub fn lookup(&self, kind: &NameKind) -> Option<NameRef> {
        self.lookup.get(kind).copied()
    }

    /// Insert `kind` if absent. Returns the handle and whether it was new.
    pub(crate) fn intern(&mut self, kind: NameKind) -> (NameRef, bool) {
        if let Some(&existing) = self.lookup.get(&kind) {
            return (existing, false);
        }
        let id = u32::try_from(self.names.len())
            .unwrap_or_else(|_| panic!("internal invariant: name table overflow"));
        let name = NameRef::new(id);
        self.names.push(kind.clone());
        self.lookup.insert(kind, name);
        (name, true)
    }

    /// Whether inserting `kind` would grow the table.
    pub(crate) fn would_insert(&self, kind: &NameKind) -> bool {
        !self.lookup.contains_key(kind)
    }
}
