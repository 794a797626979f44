//! Dense handles into the tables owned by `GlobalState`.
//!
//! Handles are plain 32-bit indices. They are never reused and never freed
//! individually, so a handle stays valid for the lifetime of the state that
//! issued it (and of every deep copy taken afterwards).

use std::fmt;

/// Handle to a source file.
///
/// Id 0 is reserved as the "no file" sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct FileRef(u32);

impl FileRef {
    /// The "no file" sentinel.
    pub const NONE: FileRef = FileRef(0);

    #[inline]
    pub const fn new(id: u32) -> Self {
        FileRef(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this handle is not the sentinel.
    ///
    /// This does not prove the file is present in a particular state; ask the
    /// state for that.
    #[inline]
    pub const fn exists(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileRef({})", self.0)
    }
}

/// Handle to an interned name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct NameRef(u32);

impl NameRef {
    /// The empty name.
    pub const EMPTY: NameRef = NameRef(0);

    #[inline]
    pub const fn new(id: u32) -> Self {
        NameRef(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameRef({})", self.0)
    }
}

/// Handle to a class, module, method, field or constant.
///
/// The first handles are pre-entered by every fresh `GlobalState` in a fixed
/// order; the associated constants below name them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct SymbolRef(u32);

impl SymbolRef {
    /// The "no symbol" sentinel.
    pub const NONE: SymbolRef = SymbolRef(0);
    /// Root of the owner tree. Owns itself.
    pub const ROOT: SymbolRef = SymbolRef(1);
    /// Placeholder used when a definition cannot be found or entered.
    pub const TODO: SymbolRef = SymbolRef(2);
    pub const BASIC_OBJECT: SymbolRef = SymbolRef(3);
    pub const OBJECT: SymbolRef = SymbolRef(4);
    /// Target of every constant that failed to resolve.
    pub const STUB_MODULE: SymbolRef = SymbolRef(5);
    pub const INTEGER: SymbolRef = SymbolRef(6);
    pub const STRING: SymbolRef = SymbolRef(7);
    pub const SYMBOL: SymbolRef = SymbolRef(8);
    pub const NIL_CLASS: SymbolRef = SymbolRef(9);
    pub const TRUE_CLASS: SymbolRef = SymbolRef(10);
    pub const FALSE_CLASS: SymbolRef = SymbolRef(11);

    /// Number of pre-entered symbols.
    pub const WELL_KNOWN_COUNT: u32 = 12;

    #[inline]
    pub const fn new(id: u32) -> Self {
        SymbolRef(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this handle is not the sentinel.
    #[inline]
    pub const fn exists(self) -> bool {
        self.0 != 0
    }

    /// Whether this is one of the placeholders produced by tolerant passes.
    #[inline]
    pub const fn is_placeholder(self) -> bool {
        self.0 == Self::TODO.0 || self.0 == Self::STUB_MODULE.0
    }
}

impl fmt::Debug for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolRef({})", self.0)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{FileRef, NameRef, SymbolRef};
    crate::static_assert_size!(FileRef, 4);
    crate::static_assert_size!(NameRef, 4);
    crate::static_assert_size!(SymbolRef, 4);
}
