//! Shared setup for the driver's integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use garnet_core::GlobalState;
use garnet_ir::SymbolRef;
use garnetc::lsp::LspConfig;
use garnetc::{FileUpdate, Session, TypecheckRun, WorkerPool};

pub const ROOT: &str = "/w";

/// A session over `files`, checked on a small worker pool.
pub fn session(files: &[(&str, &str)]) -> (Session, TypecheckRun) {
    let updates = files.iter().map(|(path, source)| FileUpdate::new(*path, *source)).collect();
    Session::new(WorkerPool::new(2), updates)
}

/// Rooted at [`ROOT`], ignoring `gen/**`.
pub fn config() -> LspConfig {
    LspConfig::new(ROOT, &["gen/**".to_owned()]).expect("valid patterns")
}

pub fn uri(path: &str) -> String {
    config().file_uri(path)
}

/// Offset of the first occurrence of `needle` in `source`.
pub fn offset_of(source: &str, needle: &str) -> u32 {
    let offset = source.find(needle).unwrap_or_else(|| panic!("`{needle}` not in source"));
    u32::try_from(offset).expect("small source")
}

/// A top-level class by name, `SymbolRef::NONE` if it was never entered.
pub fn lookup_class(gs: &GlobalState, name: &str) -> SymbolRef {
    gs.lookup_name_utf8(name)
        .and_then(|utf8| gs.lookup_name_constant(utf8))
        .map_or(SymbolRef::NONE, |name| gs.lookup_member(SymbolRef::ROOT, name))
}

/// An instance method of `class`.
pub fn lookup_method(gs: &GlobalState, class: SymbolRef, name: &str) -> SymbolRef {
    gs.lookup_name_utf8(name)
        .map_or(SymbolRef::NONE, |name| gs.lookup_member(class, name))
}
