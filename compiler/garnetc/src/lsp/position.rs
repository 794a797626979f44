use std::fmt;

use garnet_core::GlobalState;
use garnet_ir::{FileRef, Loc, Span};

/// A 0-based editor position. Columns count bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }

    /// The zero-width location at this position, if it lies within `file`'s
    /// current source.
    pub fn to_loc(self, gs: &GlobalState, file: FileRef) -> Option<Loc> {
        if !gs.file_exists(file) {
            return None;
        }
        let offset = gs.file(file).position_to_offset(self.line, self.character)?;
        Some(Loc::new(file, Span::point(offset)))
    }

    /// The position of a byte offset in `file`.
    pub fn from_offset(gs: &GlobalState, file: FileRef, offset: u32) -> Self {
        let (line, character) = gs.file(file).offset_to_position(offset);
        Position { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}
