use super::*;
use garnet_ir::{FileRef, Span};
use pretty_assertions::assert_eq;

fn diag_at(code: ErrorCode, file: u32, start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(message)
        .at(Loc::new(FileRef::new(file), Span::new(start, start + 1)))
}

#[test]
fn test_flush_sorts_by_location() {
    let mut queue = DiagnosticQueue::new();
    queue.add(diag_at(ErrorCode::E3001, 2, 0, "c"));
    queue.add(diag_at(ErrorCode::E3001, 1, 9, "b"));
    queue.add(diag_at(ErrorCode::E3001, 1, 3, "a"));

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["a", "b", "c"]);
    assert!(queue.is_empty());
}

#[test]
fn test_exact_duplicates_suppressed() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(diag_at(ErrorCode::E3001, 1, 0, "same")));
    assert!(!queue.add(diag_at(ErrorCode::E3001, 1, 0, "same")));
    assert!(queue.add(diag_at(ErrorCode::E3001, 1, 0, "different")));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.dropped(), 1);
}

#[test]
fn test_dedup_compares_whole_identity() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 0,
        deduplicate: true,
    });
    let messages: Vec<String> = (0..2000).map(|i| format!("unknown method `m{i}`")).collect();
    for message in &messages {
        assert!(queue.add(diag_at(ErrorCode::E5001, 1, 0, message)));
    }
    assert!(queue.add(diag_at(ErrorCode::E5002, 1, 0, &messages[0])));
    assert!(queue.add(diag_at(ErrorCode::E5001, 1, 1, &messages[0])));
    assert!(queue.add(diag_at(ErrorCode::E5001, 2, 0, &messages[0])));
    for message in &messages {
        assert!(!queue.add(diag_at(ErrorCode::E5001, 1, 0, message)));
    }
    assert_eq!(queue.len(), messages.len() + 3);
    assert_eq!(queue.dropped(), messages.len());
}

#[test]
fn test_unlimited_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(diag_at(ErrorCode::E5001, 1, 0, "same"));
    queue.add(diag_at(ErrorCode::E5001, 1, 0, "same"));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: true,
    });
    assert!(queue.add(diag_at(ErrorCode::E5001, 1, 0, "1")));
    assert!(queue.add(diag_at(ErrorCode::E5001, 1, 1, "2")));
    assert!(queue.limit_reached());
    assert!(!queue.add(diag_at(ErrorCode::E5001, 1, 2, "3")));

    // Warnings are not subject to the limit.
    let warning = Diagnostic::warning(ErrorCode::E2003).with_message("w");
    assert!(queue.add(warning));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_flush_resets_state() {
    let mut queue = DiagnosticQueue::new();
    queue.add(diag_at(ErrorCode::E3001, 1, 0, "x"));
    assert_eq!(queue.flush().len(), 1);
    assert_eq!(queue.error_count(), 0);
    // The same diagnostic is accepted again after a flush.
    assert!(queue.add(diag_at(ErrorCode::E3001, 1, 0, "x")));
}

#[test]
fn test_extend_counts_kept() {
    let mut queue = DiagnosticQueue::new();
    let kept = queue.extend(vec![
        diag_at(ErrorCode::E3001, 1, 0, "x"),
        diag_at(ErrorCode::E3001, 1, 0, "x"),
        diag_at(ErrorCode::E3001, 1, 4, "y"),
    ]);
    assert_eq!(kept, 2);
}
