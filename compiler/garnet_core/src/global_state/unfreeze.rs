//! Scoped permission to mutate one table of a `GlobalState`.

use std::ops::{Deref, DerefMut};

use super::GlobalState;

/// The independently frozen tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Files,
    Names,
    Symbols,
}

/// RAII guard returned by `GlobalState::unfreeze_*`.
///
/// Derefs to the state, so phases take `&mut GlobalState` and callers pass
/// the guard. Dropping it restores the table's previous flag, which makes
/// nesting (and early returns) safe:
///
/// ```text
/// let mut gs = gs.unfreeze_names();
/// let mut gs = gs.unfreeze_symbols();
/// namer.run(&mut gs, trees);
/// ```
#[must_use = "the table is frozen again as soon as the guard is dropped"]
pub struct Unfrozen<'a> {
    gs: &'a mut GlobalState,
    table: Table,
    was_frozen: bool,
}

impl<'a> Unfrozen<'a> {
    pub(super) fn new(gs: &'a mut GlobalState, table: Table) -> Self {
        let was_frozen = gs.set_frozen(table, false);
        Unfrozen {
            gs,
            table,
            was_frozen,
        }
    }
}

impl Deref for Unfrozen<'_> {
    type Target = GlobalState;

    fn deref(&self) -> &GlobalState {
        self.gs
    }
}

impl DerefMut for Unfrozen<'_> {
    fn deref_mut(&mut self) -> &mut GlobalState {
        self.gs
    }
}

impl Drop for Unfrozen<'_> {
    fn drop(&mut self) {
        self.gs.set_frozen(self.table, self.was_frozen);
    }
}
