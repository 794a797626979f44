#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use garnet_core::{core_names, File, ResponseKind, Type};
use garnet_ir::{Loc, Span};
use pretty_assertions::assert_eq;

use crate::lsp::LspConfig;
use crate::session::{FileUpdate, Session};
use crate::workers::WorkerPool;

/// A typed file (1) and an untyped one (2).
fn two_files() -> (GlobalState, FileRef, FileRef) {
    let mut gs = GlobalState::new();
    let (typed, untyped) = {
        let mut gs = gs.unfreeze_files();
        (
            gs.enter_file(File::from_path("typed.rb", "# typed: true\nclass A\nend\n")),
            gs.enter_file(File::from_path("untyped.rb", "class B\nend\n")),
        )
    };
    (gs, typed, untyped)
}

fn at(file: FileRef, start: u32, end: u32, kind: ResponseKind) -> QueryResponse {
    QueryResponse::new(Loc::new(file, Span::new(start, end)), kind)
}

fn constant() -> ResponseKind {
    ResponseKind::Constant {
        symbol: SymbolRef::OBJECT,
        name: core_names::OBJECT_CONST,
        ty: Type::ClassOf(SymbolRef::OBJECT),
    }
}

fn send() -> ResponseKind {
    ResponseKind::Send {
        callee: SymbolRef::NONE,
        name: core_names::NEW,
        receiver: Type::Untyped,
        result: Type::Untyped,
    }
}

fn ident() -> ResponseKind {
    ResponseKind::Ident {
        name: core_names::NEW,
        ty: Type::Untyped,
    }
}

#[test]
fn test_drops_missing_locations_and_files() {
    let (gs, typed, _) = two_files();
    let responses = vec![
        QueryResponse::new(Loc::NONE, constant()),
        QueryResponse::new(Loc::new(typed, Span::NONE), constant()),
        at(FileRef::new(42), 0, 1, constant()),
        at(typed, 0, 1, constant()),
    ];
    assert_eq!(filter_and_dedup(&gs, responses), vec![at(typed, 0, 1, constant())]);
}

#[test]
fn test_untyped_files_keep_only_syntactic_kinds() {
    let (gs, _, untyped) = two_files();
    let method_def = ResponseKind::MethodDef {
        symbol: SymbolRef::OBJECT,
        name: core_names::INITIALIZE,
    };
    let field = ResponseKind::Field {
        symbol: SymbolRef::NONE,
        name: core_names::NEW,
        ty: Type::Untyped,
    };
    let responses = vec![
        at(untyped, 0, 5, send()),
        at(untyped, 1, 5, ident()),
        at(untyped, 2, 5, ResponseKind::Literal { ty: Type::Nil }),
        at(untyped, 3, 5, constant()),
        at(untyped, 4, 5, field),
        at(untyped, 5, 6, method_def),
    ];
    let kept: Vec<&str> = filter_and_dedup(&gs, responses)
        .iter()
        .map(|r| r.kind.label())
        .collect();
    assert_eq!(kept, vec!["constant", "field", "method definition"]);
}

#[test]
fn test_sorts_by_file_then_offsets() {
    let (gs, typed, untyped) = two_files();
    let responses = vec![
        at(untyped, 0, 2, constant()),
        at(typed, 4, 9, send()),
        at(typed, 4, 6, send()),
        at(typed, 1, 20, send()),
    ];
    let locs: Vec<(u32, u32, u32)> = filter_and_dedup(&gs, responses)
        .iter()
        .map(|r| (r.loc.file.id(), r.loc.begin(), r.loc.end()))
        .collect();
    assert_eq!(locs, vec![(1, 1, 20), (1, 4, 6), (1, 4, 9), (2, 0, 2)]);
}

#[test]
fn test_same_location_keeps_highest_priority_kind() {
    let (gs, typed, _) = two_files();
    // Input order must not matter.
    for responses in [
        vec![at(typed, 10, 12, ident()), at(typed, 10, 12, send())],
        vec![at(typed, 10, 12, send()), at(typed, 10, 12, ident())],
    ] {
        assert_eq!(filter_and_dedup(&gs, responses), vec![at(typed, 10, 12, send())]);
    }

    let responses = vec![at(typed, 3, 4, send()), at(typed, 3, 4, constant())];
    assert_eq!(filter_and_dedup(&gs, responses), vec![at(typed, 3, 4, constant())]);
}

fn session(files: &[(&str, &str)]) -> Session {
    let updates = files.iter().map(|(path, source)| FileUpdate::new(*path, *source)).collect();
    Session::new(WorkerPool::inline(), updates).0
}

fn config() -> LspConfig {
    LspConfig::new("/w", &["gen/**".to_owned()]).unwrap()
}

#[test]
fn test_by_loc_errors() {
    let session = session(&[("a.rb", "# typed: true\nclass A\nend\n")]);
    let config = config();
    let by_loc = |uri: &str, pos: Position| {
        LspQuery::by_loc(&config, &session, uri, pos, LspMethod::Hover, true)
    };

    let err = by_loc("file:///w/gen/x.rb", Position::new(0, 0)).unwrap_err();
    assert!(err.to_string().contains("ignored file"));
    assert_eq!(err.code().code(), -32602);

    let err = by_loc("file:///w/b.rb", Position::new(0, 0)).unwrap_err();
    assert!(err.to_string().contains("file not found"));
    assert!(err.to_string().contains("textDocument/hover"));

    let err = by_loc("file:///w/a.rb", Position::new(40, 0)).unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidLocation {
            uri: "file:///w/a.rb".to_owned(),
            position: Position::new(40, 0),
        }
    );
    assert!(err.to_string().contains("invalid location"));
}

#[test]
fn test_by_loc_stale_position_is_empty() {
    let mut session = session(&[("a.rb", "# typed: true\nclass A\nend\n")]);
    session.set_stale(true);
    let result = LspQuery::by_loc(
        &config(),
        &session,
        "file:///w/a.rb",
        Position::new(40, 0),
        LspMethod::Definition,
        true,
    );
    assert_eq!(result, Ok(Vec::new()));
}

#[test]
fn test_by_loc_untyped_file() {
    let session = session(&[("a.rb", "class A\nend\nA\n")]);
    let config = config();
    let query = |error_if_untyped| {
        LspQuery::by_loc(
            &config,
            &session,
            "file:///w/a.rb",
            Position::new(2, 0),
            LspMethod::Hover,
            error_if_untyped,
        )
    };
    assert_eq!(query(true), Ok(Vec::new()));
    // Constants are still found when the caller accepts untyped files.
    let responses = query(false).unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].kind.label(), "constant");
}

#[test]
fn test_candidate_files_use_usage_hashes() {
    let session = session(&[
        ("a.rb", "class A\n  def target\n  end\nend\n"),
        ("b.rb", "A.new.target\n"),
        ("c.rb", "A.new\n"),
        ("d.rbi", "class A\n  def target\n  end\nend\n"),
    ]);
    let gs = session.state();
    let a_name = gs.lookup_name_constant(gs.lookup_name_utf8("A").unwrap()).unwrap();
    let a = gs.lookup_member(SymbolRef::ROOT, a_name);
    let target = gs.lookup_member(a, gs.lookup_name_utf8("target").unwrap());

    let paths: Vec<&str> = candidate_files(gs, target)
        .into_iter()
        .map(|file| gs.file(file).path())
        .collect();
    assert_eq!(paths, vec!["a.rb", "b.rb"]);
}

#[test]
#[should_panic(expected = "internal invariant")]
fn test_by_symbol_requires_existing_symbol() {
    let session = session(&[("a.rb", "")]);
    LspQuery::by_symbol(&session, SymbolRef::NONE);
}
