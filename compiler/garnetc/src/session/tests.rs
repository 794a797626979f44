#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use garnet_core::ResponseKind;
use garnet_diagnostic::ErrorCode;
use garnet_ir::{Loc, Span, SymbolRef};
use pretty_assertions::assert_eq;

const A: &str = "# typed: true\nclass A\n  def foo(x)\n    x\n  end\nend\n";

fn session(files: &[(&str, &str)]) -> (Session, TypecheckRun) {
    let updates = files.iter().map(|(path, source)| FileUpdate::new(*path, *source)).collect();
    Session::new(WorkerPool::inline(), updates)
}

fn codes(run: &TypecheckRun) -> Vec<ErrorCode> {
    run.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_new_checks_everything() {
    let (session, run) = session(&[("a.rb", A), ("b.rb", "# typed: true\nA.new.bar\n")]);
    assert!(!run.fast_path);
    assert_eq!(run.files.len(), 2);
    assert_eq!(codes(&run), vec![ErrorCode::E5001]);
    for file in &run.files {
        assert!(session.tree(*file).is_some());
        assert!(session.state().file(*file).hash().is_some());
    }
}

#[test]
fn test_body_edit_takes_fast_path() {
    let (mut session, _) = session(&[("a.rb", A), ("b.rb", "A.new.foo(1)\n")]);
    let before = session.state().symbols_used_total();
    let b = session.state().find_file_by_path("b.rb");
    let old_tree = Arc::clone(session.tree(b).unwrap());

    let edited = "# typed: true\nclass A\n  def foo(x)\n    x.nope\n    A.new.bar\n  end\nend\n";
    let run = session.commit(vec![FileUpdate::new("a.rb", edited)]);

    assert!(run.fast_path);
    assert_eq!(run.files, vec![session.state().find_file_by_path("a.rb")]);
    assert_eq!(codes(&run), vec![ErrorCode::E5001]);
    assert_eq!(session.state().symbols_used_total(), before);
    // Untouched files keep their trees.
    assert!(Arc::ptr_eq(session.tree(b).unwrap(), &old_tree));
}

#[test]
fn test_definition_edit_takes_slow_path() {
    let (mut session, _) = session(&[("a.rb", A), ("b.rb", "# typed: true\nA.new.bar\n")]);
    let a = session.state().find_file_by_path("a.rb");
    let b = session.state().find_file_by_path("b.rb");

    let run = session.commit(vec![FileUpdate::new("a.rb", format!("{A}class A\n  def bar\n  end\nend\n"))]);

    assert!(!run.fast_path);
    assert!(run.diagnostics.is_empty());
    // Handles survive the rebuild.
    assert_eq!(session.state().find_file_by_path("a.rb"), a);
    assert_eq!(session.state().find_file_by_path("b.rb"), b);
}

#[test]
fn test_new_file_takes_slow_path() {
    let (mut session, _) = session(&[("a.rb", A)]);
    let run = session.commit(vec![FileUpdate::new("c.rb", "# typed: true\nA.new.foo\n")]);
    assert!(!run.fast_path);
    assert_eq!(codes(&run), vec![ErrorCode::E5002]);
    assert_eq!(session.state().files_used(), 2);
}

#[test]
fn test_stale_view_leaves_canonical_state_alone() {
    let (session, _) = session(&[("a.rb", A)]);
    let canonical = session.state().deep_copy();

    let edited = "# typed: true\nclass A\n  def foo(x)\n    x\n  end\n  def brand_new\n  end\nend\nclass Fresh\nend\nA.new.nope\n";
    let view = session.stale_view(&[
        FileUpdate::new("a.rb", edited),
        FileUpdate::new("new.rb", "Fresh\n"),
    ]);

    assert!(view.is_stale());
    assert!(view.discarded() >= 1);
    assert!(session.state().same_tables(&canonical));
    assert!(session.state().errors().is_empty());
    assert_eq!(view.state().files_used(), 2);
    assert_eq!(session.state().files_used(), 1);

    // The view answers queries about the edited text.
    let a = view.state().find_file_by_path("a.rb");
    let offset = u32::try_from(edited.find("brand_new").unwrap()).unwrap();
    let responses = view.query(&Query::Loc(Loc::new(a, Span::point(offset))), &[a]);
    // Definitions the canonical state never saw resolve to `<todo>`.
    assert!(responses
        .iter()
        .any(|r| matches!(r.kind, ResponseKind::MethodDef { symbol, .. } if symbol == SymbolRef::TODO)));
}

#[test]
fn test_stale_flag_is_injected() {
    let (mut session, _) = session(&[("a.rb", A)]);
    assert!(!session.is_stale());
    session.set_stale(true);
    assert!(session.is_stale());
}

#[test]
fn test_query_skips_unknown_files() {
    let (session, _) = session(&[("a.rb", A)]);
    let responses = session.query(&Query::Symbol(SymbolRef::OBJECT), &[FileRef::new(9)]);
    assert!(responses.is_empty());
}
