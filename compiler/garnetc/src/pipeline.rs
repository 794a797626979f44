//! The phase pipeline, in the order every file goes through it.
//!
//! ```text
//! index ─→ name ─→ resolve ─→ flatten ─→ validate ─→ infer
//! (seq)    (seq)   (seq)      └────── per file, parallel ──────┘
//! ```
//!
//! Indexing, naming and resolution mutate tables and run on the caller under
//! the matching unfrozen guards. Everything after resolution only reads the
//! state and runs on the worker pool.

use std::fmt;

use garnet_check::{compute_file_hash, flatten_file, infer_file, validate_file, FileMapper, Namer, Resolver};
use garnet_core::{GlobalState, Snapshot};
use garnet_ir::{FileRef, ParsedFile};
use tracing::{debug, debug_span};

use crate::workers::WorkerPool;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Index,
    Name,
    Resolve,
    Flatten,
    Validate,
    Infer,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Index,
        Phase::Name,
        Phase::Resolve,
        Phase::Flatten,
        Phase::Validate,
        Phase::Infer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Index => "index",
            Phase::Name => "name",
            Phase::Resolve => "resolve",
            Phase::Flatten => "flatten",
            Phase::Validate => "validate",
            Phase::Infer => "infer",
        }
    }

    /// Whether the phase writes to the symbol or name tables.
    pub fn mutates_tables(self) -> bool {
        matches!(self, Phase::Index | Phase::Name | Phase::Resolve)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse, desugar, rewrite and index locals for `files`.
pub fn index(gs: &mut GlobalState, files: &[FileRef]) -> Vec<ParsedFile> {
    let _span = debug_span!("phase", phase = %Phase::Index, files = files.len()).entered();
    let mut gs = gs.unfreeze_names();
    files
        .iter()
        .map(|&file| garnet_parse::index_one(&mut gs, file))
        .collect()
}

/// Hash indexed trees and store the hashes on their files.
pub fn compute_file_hashes(gs: &mut GlobalState, trees: &[ParsedFile], workers: &WorkerPool) {
    let _span = debug_span!("compute_file_hashes", files = trees.len()).entered();
    let hashes = {
        let gs: &GlobalState = gs;
        workers.map(trees, |tree| compute_file_hash(gs, tree))
    };
    let mut gs = gs.unfreeze_files();
    for (tree, hash) in trees.iter().zip(hashes) {
        gs.set_file_hash(tree.file, hash);
    }
}

/// Committing naming and resolution of a whole batch.
pub fn name_and_resolve(gs: &mut GlobalState, trees: Vec<ParsedFile>, workers: &WorkerPool) -> Vec<ParsedFile> {
    let mut gs = gs.unfreeze_names();
    let mut gs = gs.unfreeze_symbols();
    let trees = {
        let _span = debug_span!("phase", phase = %Phase::Name).entered();
        Namer::run(&mut gs, trees, workers)
    };
    let _span = debug_span!("phase", phase = %Phase::Resolve).entered();
    Resolver::run(&mut gs, trees)
}

/// Flatten, validate and infer each tree. Returns the flattened trees.
///
/// Diagnostics go to `gs`'s error channel. Interface files are flattened and
/// validated but never inferred.
pub fn typecheck(gs: &GlobalState, trees: Vec<ParsedFile>, workers: &WorkerPool) -> Vec<ParsedFile> {
    let _span = debug_span!("typecheck", files = trees.len()).entered();
    workers.map_into(trees, |tree| {
        let tree = flatten_file(gs, tree);
        validate_file(gs, &tree);
        infer_file(gs, &tree);
        tree
    })
}

/// Name, resolve and typecheck `trees` against a private snapshot.
///
/// Nothing is entered and every diagnostic is thrown away; the second value
/// is how many were dropped. The `<static-init>` of each file must already
/// exist in the snapshot.
pub fn run_best_effort(snapshot: &Snapshot, trees: Vec<ParsedFile>, workers: &WorkerPool) -> (Vec<ParsedFile>, usize) {
    let _span = debug_span!("run_best_effort", files = trees.len()).entered();
    let trees = Namer::symbolize_trees_best_effort(snapshot, trees, workers);
    let trees = Resolver::run_incremental_best_effort(snapshot, trees);
    let trees = typecheck(snapshot.state(), trees, workers);
    let discarded = snapshot.state().errors().discard();
    debug!(discarded, "best-effort diagnostics dropped");
    (trees, discarded)
}
