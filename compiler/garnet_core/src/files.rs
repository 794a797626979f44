//! Source files and their per-file settings.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::FileHash;

/// How much checking a file asked for with its `# typed:` sigil.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrictLevel {
    Ignore,
    #[default]
    False,
    True,
    Strict,
    Strong,
}

impl StrictLevel {
    pub fn parse(text: &str) -> Option<StrictLevel> {
        match text {
            "ignore" => Some(StrictLevel::Ignore),
            "false" => Some(StrictLevel::False),
            "true" => Some(StrictLevel::True),
            "strict" => Some(StrictLevel::Strict),
            "strong" => Some(StrictLevel::Strong),
            _ => None,
        }
    }

    /// At or above `True`.
    #[inline]
    pub fn is_typed(self) -> bool {
        self >= StrictLevel::True
    }
}

impl fmt::Display for StrictLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrictLevel::Ignore => "ignore",
            StrictLevel::False => "false",
            StrictLevel::True => "true",
            StrictLevel::Strict => "strict",
            StrictLevel::Strong => "strong",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileKind {
    #[default]
    Normal,
    /// Interface-only declarations (`.rbi`).
    Rbi,
    /// Package descriptor (`__package.rb`).
    Package,
}

impl FileKind {
    pub fn from_path(path: &str) -> FileKind {
        let p = Path::new(path);
        if p.extension().is_some_and(|ext| ext == "rbi") {
            FileKind::Rbi
        } else if p.file_name().is_some_and(|name| name == "__package.rb") {
            FileKind::Package
        } else {
            FileKind::Normal
        }
    }
}

/// A registered source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    path: String,
    source: Arc<str>,
    strict: StrictLevel,
    kind: FileKind,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
    /// Recomputed after indexing; cleared whenever the text changes.
    hash: Option<FileHash>,
}

impl File {
    pub fn new(path: impl Into<String>, source: impl Into<Arc<str>>, kind: FileKind) -> Self {
        let path = path.into();
        let source = source.into();
        let default_level = if kind == FileKind::Rbi {
            StrictLevel::True
        } else {
            StrictLevel::False
        };
        let strict = read_sigil(&source).unwrap_or(default_level);
        let line_starts = compute_line_starts(&source);
        File {
            path,
            source,
            strict,
            kind,
            line_starts,
            hash: None,
        }
    }

    /// Like `new`, taking the kind from the path.
    pub fn from_path(path: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
        let path = path.into();
        let kind = FileKind::from_path(&path);
        File::new(path, source, kind)
    }

    /// The file occupying slot 0, standing in for "no file".
    pub(crate) fn sentinel() -> Self {
        File::new("", "", FileKind::Normal)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shared handle to the text, for holding it across state mutation.
    pub fn source_arc(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn strict_level(&self) -> StrictLevel {
        self.strict
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_typed(&self) -> bool {
        self.strict.is_typed()
    }

    pub fn is_rbi(&self) -> bool {
        self.kind == FileKind::Rbi
    }

    pub fn hash(&self) -> Option<&FileHash> {
        self.hash.as_ref()
    }

    pub(crate) fn set_hash(&mut self, hash: Option<FileHash>) {
        self.hash = hash;
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of a 0-based (line, column) position.
    ///
    /// The column may point one past the last character of the line but
    /// not beyond it.
    pub fn position_to_offset(&self, line: u32, character: u32) -> Option<u32> {
        let start = *self.line_starts.get(line as usize)?;
        let line_end = self.line_end(line as usize);
        let offset = start.checked_add(character)?;
        (offset <= line_end).then_some(offset)
    }

    /// 0-based (line, column) of a byte offset.
    pub fn offset_to_position(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let line_u32 = u32::try_from(line).unwrap_or(u32::MAX);
        (line_u32, offset - self.line_starts[line])
    }

    /// Offset of the end of `line`, excluding its newline.
    fn line_end(&self, line: usize) -> u32 {
        let len = u32::try_from(self.source.len()).unwrap_or(u32::MAX);
        match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => len,
        }
    }
}

fn compute_line_starts(source: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        )
        .collect()
}

/// The level named by the first `# typed: <level>` comment line, if any.
fn read_sigil(source: &str) -> Option<StrictLevel> {
    source.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix('#')?.trim_start();
        let level = rest.strip_prefix("typed:")?.trim();
        StrictLevel::parse(level)
    })
}
