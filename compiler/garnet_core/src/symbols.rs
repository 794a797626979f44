//! Symbol table entries.

use bitflags::bitflags;
use garnet_ir::{Loc, NameRef, SymbolRef};
use rustc_hash::FxHashMap;

use crate::Type;

bitflags! {
    /// What a symbol is and what has been declared about it.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u16 {
        /// A class or module, declared or not.
        const CLASS_OR_MODULE = 1 << 0;
        /// Declared with `class`.
        const CLASS = 1 << 1;
        /// Declared with `module`.
        const MODULE = 1 << 2;
        const METHOD = 1 << 3;
        /// `@x`
        const FIELD = 1 << 4;
        /// `X = ...` inside a class or at the top level.
        const STATIC_FIELD = 1 << 5;
        /// `<Class:X>`
        const SINGLETON = 1 << 6;
        /// Not written by the user.
        const SYNTHETIC = 1 << 7;
        /// A static field whose value is itself a class.
        const TYPE_ALIAS = 1 << 8;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolData {
    pub name: NameRef,
    pub owner: SymbolRef,
    pub flags: SymbolFlags,
    pub members: FxHashMap<NameRef, SymbolRef>,
    /// `NONE` until resolved, and for modules.
    pub superclass: SymbolRef,
    /// Included modules in `include` order.
    pub mixins: Vec<SymbolRef>,
    /// Method parameter names.
    pub params: Vec<NameRef>,
    /// Method result type, static field value type, or field type.
    pub result_type: Type,
    /// For a class, its singleton class. For a singleton, the attached class.
    pub singleton_link: SymbolRef,
    /// Every location the symbol was defined at.
    pub locs: Vec<Loc>,
}

impl SymbolData {
    pub(crate) fn new(name: NameRef, owner: SymbolRef, flags: SymbolFlags) -> Self {
        SymbolData {
            name,
            owner,
            flags,
            members: FxHashMap::default(),
            superclass: SymbolRef::NONE,
            mixins: Vec::new(),
            params: Vec::new(),
            result_type: Type::Untyped,
            singleton_link: SymbolRef::NONE,
            locs: Vec::new(),
        }
    }

    #[inline]
    pub fn is_class_or_module(&self) -> bool {
        self.flags.contains(SymbolFlags::CLASS_OR_MODULE)
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.flags.contains(SymbolFlags::CLASS)
    }

    #[inline]
    pub fn is_module(&self) -> bool {
        self.flags.contains(SymbolFlags::MODULE)
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        self.flags.contains(SymbolFlags::METHOD)
    }

    #[inline]
    pub fn is_field(&self) -> bool {
        self.flags.contains(SymbolFlags::FIELD)
    }

    #[inline]
    pub fn is_static_field(&self) -> bool {
        self.flags.contains(SymbolFlags::STATIC_FIELD)
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.flags.contains(SymbolFlags::SINGLETON)
    }

    /// Neither `class` nor `module` was ever written for it.
    #[inline]
    pub fn is_undeclared(&self) -> bool {
        self.is_class_or_module() && !self.flags.intersects(SymbolFlags::CLASS | SymbolFlags::MODULE)
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The first recorded definition location.
    pub fn loc(&self) -> Loc {
        self.locs.first().copied().unwrap_or(Loc::NONE)
    }
}
