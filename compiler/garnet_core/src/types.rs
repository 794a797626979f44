use garnet_ir::SymbolRef;

/// The handful of types the checker tracks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Type {
    /// Nothing is known.
    #[default]
    Untyped,
    /// An instance of a class.
    Instance(SymbolRef),
    /// The class object itself (`Foo` as a value).
    ClassOf(SymbolRef),
    Nil,
}

impl Type {
    #[inline]
    pub fn is_untyped(self) -> bool {
        matches!(self, Type::Untyped)
    }

    /// The class whose methods a send on a value of this type dispatches to.
    ///
    /// `ClassOf` dispatches to the singleton class; callers resolve that
    /// themselves, so it is returned as the attached class with `true`.
    pub fn dispatch_target(self) -> Option<(SymbolRef, bool)> {
        match self {
            Type::Instance(sym) => Some((sym, false)),
            Type::ClassOf(sym) => Some((sym, true)),
            Type::Nil => Some((SymbolRef::NIL_CLASS, false)),
            Type::Untyped => None,
        }
    }
}
