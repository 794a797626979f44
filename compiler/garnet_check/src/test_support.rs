//! Shared helpers for the phase tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use garnet_core::{File, GlobalState};
use garnet_ir::{ParsedFile, SymbolRef};

use crate::{Namer, Resolver, Sequential};

/// A fresh state holding `sources`, indexed through phase 4.
pub(crate) fn index(sources: &[(&str, &str)]) -> (GlobalState, Vec<ParsedFile>) {
    let mut gs = GlobalState::new();
    let files: Vec<_> = {
        let mut gs = gs.unfreeze_files();
        sources
            .iter()
            .map(|(path, source)| gs.enter_file(File::from_path(*path, *source)))
            .collect()
    };
    let trees = {
        let mut gs = gs.unfreeze_names();
        files
            .iter()
            .map(|&file| garnet_parse::index_one(&mut gs, file))
            .collect()
    };
    (gs, trees)
}

/// Replace the source of an existing file and index it again.
pub(crate) fn reindex(gs: &mut GlobalState, path: &str, source: &str) -> ParsedFile {
    let file = gs.find_file_by_path(path);
    assert!(file.exists(), "{path} was never entered");
    {
        let mut gs = gs.unfreeze_files();
        gs.replace_file(file, File::from_path(path, source));
    }
    let mut gs = gs.unfreeze_names();
    garnet_parse::index_one(&mut gs, file)
}

pub(crate) fn name(gs: &mut GlobalState, trees: Vec<ParsedFile>) -> Vec<ParsedFile> {
    let mut gs = gs.unfreeze_names();
    let mut gs = gs.unfreeze_symbols();
    Namer::run(&mut gs, trees, &Sequential)
}

pub(crate) fn name_and_resolve(gs: &mut GlobalState, trees: Vec<ParsedFile>) -> Vec<ParsedFile> {
    let trees = name(gs, trees);
    let mut gs = gs.unfreeze_symbols();
    Resolver::run(&mut gs, trees)
}

pub(crate) fn only(trees: Vec<ParsedFile>) -> ParsedFile {
    assert_eq!(trees.len(), 1);
    trees.into_iter().next().unwrap()
}

/// Look up `A::B` from the root. `NONE` if any segment is missing.
pub(crate) fn lookup_class(gs: &GlobalState, path: &str) -> SymbolRef {
    let mut owner = SymbolRef::ROOT;
    for segment in path.split("::") {
        let Some(name) = gs
            .lookup_name_utf8(segment)
            .and_then(|utf8| gs.lookup_name_constant(utf8))
        else {
            return SymbolRef::NONE;
        };
        owner = gs.lookup_member(owner, name);
        if !owner.exists() {
            return SymbolRef::NONE;
        }
    }
    owner
}

/// Look up a method, field (`@x`) or singleton method (`.m`) on `class`.
pub(crate) fn lookup_member(gs: &GlobalState, class: SymbolRef, member: &str) -> SymbolRef {
    let (owner, text) = match member.strip_prefix('.') {
        Some(rest) => (gs.lookup_singleton_class(class), rest),
        None => (class, member),
    };
    match gs.lookup_name_utf8(text) {
        Some(name) if owner.exists() => gs.lookup_member(owner, name),
        _ => SymbolRef::NONE,
    }
}

/// Codes of everything reported so far, sorted by location. Drains the channel.
pub(crate) fn drain_codes(gs: &GlobalState) -> Vec<garnet_diagnostic::ErrorCode> {
    gs.errors().drain().into_iter().map(|d| d.code).collect()
}
