//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Suppression of exact duplicates (same code, location and message)
//! - Location-ordered flushing

use garnet_ir::Loc;
use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorCode};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept before dropping further errors (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 1000,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// What makes two diagnostics duplicates of each other.
type Identity = (ErrorCode, Loc, String);

#[inline]
fn identity(diag: &Diagnostic) -> Identity {
    (diag.code, diag.loc, diag.message.clone())
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Identities of queued diagnostics (for dedup).
    seen: FxHashSet<Identity>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Diagnostics dropped by the limit or as duplicates since the last flush.
    dropped: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            seen: FxHashSet::default(),
            error_count: 0,
            dropped: 0,
            config,
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            self.dropped += 1;
            return false;
        }

        if self.config.deduplicate && !self.seen.insert(identity(&diag)) {
            self.dropped += 1;
            return false;
        }

        self.diagnostics.push(diag);
        if is_error {
            self.error_count += 1;
        }
        true
    }

    /// Add every diagnostic from an iterator. Returns how many were kept.
    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) -> usize {
        diags.into_iter().filter(|d| self.add(d.clone())).count()
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of diagnostics dropped since the last flush.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by location and return them.
    ///
    /// Clears the queue after flushing. Sorting is stable so diagnostics at the
    /// same location keep their emission order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| sort_key(&w[0]) <= sort_key(&w[1]));
        if !already_sorted {
            self.diagnostics.sort_by_key(sort_key);
        }

        let result = std::mem::take(&mut self.diagnostics);
        self.seen.clear();
        self.error_count = 0;
        self.dropped = 0;
        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

#[inline]
fn sort_key(diag: &Diagnostic) -> (Loc, ErrorCode) {
    (diag.loc, diag.code)
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("stopped after {limit} errors"))
        .with_note("raise the error limit to see the rest")
}

#[cfg(test)]
mod tests;
