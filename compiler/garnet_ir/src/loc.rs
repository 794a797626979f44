//! File-qualified source locations.

use std::cmp::Ordering;
use std::fmt;

use crate::{FileRef, Span};

/// A span within a specific file.
///
/// Locations are totally ordered by (file id, begin offset, end offset).
/// That order is what query responses are sorted by and what decides whether
/// two responses collapse into one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Loc {
    pub file: FileRef,
    pub span: Span,
}

impl Loc {
    /// A location that points nowhere.
    pub const NONE: Loc = Loc {
        file: FileRef::NONE,
        span: Span::NONE,
    };

    #[inline]
    pub const fn new(file: FileRef, span: Span) -> Self {
        Loc { file, span }
    }

    #[inline]
    pub const fn begin(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.span.end
    }

    /// Whether this location names a file and a real span.
    #[inline]
    pub const fn exists(&self) -> bool {
        self.file.exists() && self.span.exists()
    }

    /// Whether `other` lies within this location (same file, inclusive ends).
    #[inline]
    pub fn contains(&self, other: Loc) -> bool {
        self.file == other.file && self.span.contains_span(other.span)
    }
}

impl Ord for Loc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .id()
            .cmp(&other.file.id())
            .then(self.span.start.cmp(&other.span.start))
            .then(self.span.end.cmp(&other.span.end))
    }
}

impl PartialOrd for Loc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loc({}, {:?})", self.file.id(), self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loc_order_is_file_then_begin_then_end() {
        let f1 = FileRef::new(1);
        let f2 = FileRef::new(2);
        let mut locs = vec![
            Loc::new(f2, Span::new(0, 1)),
            Loc::new(f1, Span::new(5, 9)),
            Loc::new(f1, Span::new(5, 7)),
            Loc::new(f1, Span::new(2, 30)),
        ];
        locs.sort();
        assert_eq!(
            locs,
            vec![
                Loc::new(f1, Span::new(2, 30)),
                Loc::new(f1, Span::new(5, 7)),
                Loc::new(f1, Span::new(5, 9)),
                Loc::new(f2, Span::new(0, 1)),
            ]
        );
    }

    #[test]
    fn test_loc_exists() {
        assert!(!Loc::NONE.exists());
        assert!(!Loc::new(FileRef::NONE, Span::new(0, 1)).exists());
        assert!(!Loc::new(FileRef::new(1), Span::NONE).exists());
        assert!(Loc::new(FileRef::new(1), Span::new(0, 1)).exists());
    }

    #[test]
    fn test_contains_requires_same_file() {
        let a = Loc::new(FileRef::new(1), Span::new(0, 10));
        assert!(a.contains(Loc::new(FileRef::new(1), Span::point(4))));
        assert!(!a.contains(Loc::new(FileRef::new(2), Span::point(4))));
    }
}
