//! Dispatching editor queries to a [`Typechecker`].
//!
//! Every entry point filters and deduplicates what the typechecker returns,
//! so callers always get responses in location order with at most one
//! response per location.

use garnet_core::{FileKind, GlobalState, Query, QueryResponse, ShortNameHash};
use garnet_ir::{FileRef, SymbolRef};
use tracing::{debug, debug_span, info};

use super::{LspMethod, PathMapper, Position, QueryError};
use crate::session::Typechecker;

pub struct LspQuery;

impl LspQuery {
    /// Everything at `pos` in the file `uri` names.
    ///
    /// With `error_if_untyped`, a request on an untyped file is answered with
    /// nothing. A position outside the file is an error unless the
    /// typechecker is stale, in which case the client probably raced an edit.
    pub fn by_loc(
        config: &dyn PathMapper,
        typechecker: &dyn Typechecker,
        uri: &str,
        pos: Position,
        method: LspMethod,
        error_if_untyped: bool,
    ) -> Result<Vec<QueryResponse>, QueryError> {
        let _span = debug_span!("setup_lsp_query_by_loc", %method).entered();
        let gs = typechecker.state();
        let file = config.uri_to_file(gs, uri);

        if !file.exists() {
            if config.is_file_ignored(&config.remote_to_local(uri)) {
                return Err(QueryError::IgnoredFile {
                    uri: uri.to_owned(),
                    method,
                });
            }
            return Err(QueryError::FileNotFound {
                uri: uri.to_owned(),
                method,
            });
        }

        if error_if_untyped && !gs.file(file).is_typed() {
            info!(uri, "ignoring request on untyped file");
            return Ok(Vec::new());
        }

        let Some(loc) = pos.to_loc(gs, file) else {
            if typechecker.is_stale() {
                debug!(uri, %pos, "position outside a stale file, answering nothing");
                return Ok(Vec::new());
            }
            return Err(QueryError::InvalidLocation {
                uri: uri.to_owned(),
                position: pos,
            });
        };

        let responses = typechecker.query(&Query::Loc(loc), &[file]);
        Ok(filter_and_dedup(gs, responses))
    }

    /// Every use of `symbol` within `files`.
    pub fn by_symbol_in_files(
        typechecker: &dyn Typechecker,
        symbol: SymbolRef,
        files: &[FileRef],
    ) -> Vec<QueryResponse> {
        let _span = debug_span!("setup_lsp_query_by_symbol_in_files", files = files.len()).entered();
        let gs = typechecker.state();
        assert_symbol(gs, symbol);
        filter_and_dedup(gs, typechecker.query(&Query::Symbol(symbol), files))
    }

    /// Every use of `symbol` in the workspace.
    ///
    /// Only files whose usage hash contains the symbol's short name are
    /// searched. That can include files that merely use the same name, but
    /// never skips a file that uses the symbol.
    pub fn by_symbol(typechecker: &dyn Typechecker, symbol: SymbolRef) -> Vec<QueryResponse> {
        let _span = debug_span!("setup_lsp_query_by_symbol").entered();
        let gs = typechecker.state();
        assert_symbol(gs, symbol);
        let files = candidate_files(gs, symbol);
        debug!(candidates = files.len(), total = gs.files_used(), "symbol search candidates");
        filter_and_dedup(gs, typechecker.query(&Query::Symbol(symbol), &files))
    }
}

fn assert_symbol(gs: &GlobalState, symbol: SymbolRef) {
    assert!(
        symbol.exists() && gs.symbol_exists(symbol),
        "internal invariant: querying missing symbol {symbol:?}"
    );
}

/// Normal files whose usage hash mentions `symbol`'s name.
pub fn candidate_files(gs: &GlobalState, symbol: SymbolRef) -> Vec<FileRef> {
    let target = ShortNameHash::new(gs.short_name(gs.symbol(symbol).name));
    gs.files()
        .filter_map(|(fref, file)| {
            let hash = file
                .hash()
                .unwrap_or_else(|| panic!("internal invariant: {} has no hash", file.path()));
            (file.kind() == FileKind::Normal && hash.usages.contains(target)).then_some(fref)
        })
        .collect()
}

/// Drop responses nobody can use, then sort by location and keep one
/// response per location.
///
/// Responses in untyped files survive only when their position is
/// syntactic (definitions, constants and fields). Among responses at the same
/// location the kind with the lowest [`priority`] wins.
///
/// [`priority`]: garnet_core::ResponseKind::priority
pub fn filter_and_dedup(gs: &GlobalState, responses: Vec<QueryResponse>) -> Vec<QueryResponse> {
    let mut kept: Vec<QueryResponse> = responses
        .into_iter()
        .filter(|response| {
            let loc = response.loc;
            if !loc.exists() || !gs.file_exists(loc.file) {
                return false;
            }
            gs.file(loc.file).is_typed() || response.kind.is_definition_like()
        })
        .collect();
    kept.sort_by(|a, b| a.loc.cmp(&b.loc).then(a.kind.priority().cmp(&b.kind.priority())));
    kept.dedup_by(|later, first| later.loc == first.loc);
    kept
}

#[cfg(test)]
mod tests;
