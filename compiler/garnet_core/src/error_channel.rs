use garnet_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use parking_lot::Mutex;

/// Diagnostics reported by phases, shared by every worker of a run.
///
/// Owned by `GlobalState`. `push` only needs `&self` so phases that run in
/// parallel over `&GlobalState` can still report.
#[derive(Debug, Default)]
pub struct ErrorChannel {
    queue: Mutex<DiagnosticQueue>,
}

impl ErrorChannel {
    pub fn new(config: DiagnosticConfig) -> Self {
        ErrorChannel {
            queue: Mutex::new(DiagnosticQueue::with_config(config)),
        }
    }

    pub fn config(&self) -> DiagnosticConfig {
        self.queue.lock().config().clone()
    }

    pub fn push(&self, diag: Diagnostic) {
        self.queue.lock().add(diag);
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.queue.lock().error_count()
    }

    /// Take every queued diagnostic in location order.
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.queue.lock().flush()
    }

    /// Drop every queued diagnostic. Returns how many there were.
    pub fn discard(&self) -> usize {
        self.queue.lock().flush().len()
    }
}
