//! A type-checking session: the canonical state and its resolved trees.
//!
//! The session is the only owner of the canonical [`GlobalState`]. Edits
//! reach it two ways:
//!
//! - [`Session::commit`] re-runs the committing pipeline. When no updated file
//!   changed its definitions the run is incremental (fast path); otherwise
//!   the state is rebuilt from every current source (slow path).
//! - [`Session::stale_view`] applies edits to a private snapshot through the
//!   best-effort passes, for answering queries while a commit is pending.
//!
//! Both expose the [`Typechecker`] interface the query layer runs against.

use std::sync::Arc;

use garnet_check::{compute_file_hash, respond, FileMapper, Namer, Resolver};
use garnet_core::{File, FileHash, GlobalState, Query, QueryResponse, Snapshot};
use garnet_diagnostic::{Diagnostic, DiagnosticConfig};
use garnet_ir::{FileRef, ParsedFile};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span, info};

use crate::pipeline;
use crate::workers::WorkerPool;

/// New contents for a file, by path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: String,
    pub source: Arc<str>,
}

impl FileUpdate {
    pub fn new(path: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
        FileUpdate {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// The outcome of a committing run.
#[derive(Debug, Default)]
pub struct TypecheckRun {
    /// Diagnostics of every file that was checked, in location order.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether only the updated files were rechecked.
    pub fast_path: bool,
    /// The files that were rechecked.
    pub files: Vec<FileRef>,
}

type Trees = FxHashMap<FileRef, Arc<ParsedFile>>;

/// What the query layer needs from whoever holds resolved trees.
pub trait Typechecker: Sync {
    fn state(&self) -> &GlobalState;

    /// Whether the trees may lag behind the latest edits. A position that no
    /// longer maps into a file is then an expected race, not a client error.
    fn is_stale(&self) -> bool;

    /// Run `query` over the trees of `files`. Responses are unfiltered.
    fn query(&self, query: &Query, files: &[FileRef]) -> Vec<QueryResponse>;
}

pub struct Session {
    gs: GlobalState,
    trees: Trees,
    workers: WorkerPool,
    config: DiagnosticConfig,
    stale: bool,
}

impl Session {
    /// Check `files` from scratch.
    pub fn new(workers: WorkerPool, files: Vec<FileUpdate>) -> (Session, TypecheckRun) {
        Session::with_diagnostic_config(workers, DiagnosticConfig::default(), files)
    }

    pub fn with_diagnostic_config(
        workers: WorkerPool,
        config: DiagnosticConfig,
        files: Vec<FileUpdate>,
    ) -> (Session, TypecheckRun) {
        let _span = debug_span!("session_new", files = files.len()).entered();
        let (gs, trees, run) = build(&config, files, &workers);
        let session = Session {
            gs,
            trees,
            workers,
            config,
            stale: false,
        };
        (session, run)
    }

    pub fn state(&self) -> &GlobalState {
        &self.gs
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.workers
    }

    /// The resolved, flattened tree of `file`.
    pub fn tree(&self, file: FileRef) -> Option<&Arc<ParsedFile>> {
        self.trees.get(&file)
    }

    /// Mark the canonical trees as lagging behind the editor (or not).
    pub fn set_stale(&mut self, stale: bool) {
        self.stale = stale;
    }

    /// Apply `updates` and typecheck again.
    pub fn commit(&mut self, updates: Vec<FileUpdate>) -> TypecheckRun {
        let _span = debug_span!("commit", files = updates.len()).entered();
        match self.fast_path_hashes(&updates) {
            Some(changed) => self.run_fast_path(updates, changed),
            None => self.run_slow_path(updates),
        }
    }

    /// The new hash of every updated file, when all of them already exist
    /// and none changed its definitions.
    fn fast_path_hashes(&self, updates: &[FileUpdate]) -> Option<Vec<(FileRef, FileHash)>> {
        if updates.is_empty() {
            return None;
        }
        let mut files = Vec::with_capacity(updates.len());
        for update in updates {
            let file = self.gs.find_file_by_path(&update.path);
            if !file.exists() {
                debug!(path = %update.path, "new file, taking the slow path");
                return None;
            }
            files.push(file);
        }

        let hashes = self.workers.map(updates, hash_in_isolation);
        for ((update, &file), hash) in updates.iter().zip(&files).zip(&hashes) {
            let old = self.gs.file(file).hash().map(|h| h.definitions);
            if old != Some(hash.definitions) {
                debug!(path = %update.path, "definitions changed, taking the slow path");
                return None;
            }
        }
        Some(files.into_iter().zip(hashes).collect())
    }

    fn run_fast_path(&mut self, updates: Vec<FileUpdate>, changed: Vec<(FileRef, FileHash)>) -> TypecheckRun {
        let _span = debug_span!("fast_path", files = changed.len()).entered();
        let files: Vec<FileRef> = {
            let mut gs = self.gs.unfreeze_files();
            updates
                .into_iter()
                .zip(changed)
                .map(|(update, (file, hash))| {
                    gs.replace_file(file, File::from_path(update.path, update.source));
                    gs.set_file_hash(file, hash);
                    file
                })
                .collect()
        };

        let run = self.recheck(files);
        info!(files = run.files.len(), diagnostics = run.diagnostics.len(), "fast path done");
        run
    }

    fn recheck(&mut self, mut files: Vec<FileRef>) -> TypecheckRun {
        files.sort_unstable();
        files.dedup();

        let trees = pipeline::index(&mut self.gs, &files);
        let before = self.gs.symbols_used_total();
        let trees = {
            let mut gs = self.gs.unfreeze_names();
            let mut gs = gs.unfreeze_symbols();
            let trees = Namer::run(&mut gs, trees, &self.workers);
            Resolver::run_incremental(&mut gs, trees)
        };
        assert_eq!(
            before,
            self.gs.symbols_used_total(),
            "internal invariant: the fast path entered symbols"
        );
        let trees = pipeline::typecheck(&self.gs, trees, &self.workers);
        for tree in trees {
            self.trees.insert(tree.file, Arc::new(tree));
        }
        TypecheckRun {
            diagnostics: self.gs.errors().drain(),
            fast_path: true,
            files,
        }
    }

    fn run_slow_path(&mut self, updates: Vec<FileUpdate>) -> TypecheckRun {
        let _span = debug_span!("slow_path", updated = updates.len()).entered();
        // Existing files keep their order, so their handles survive the rebuild.
        let mut sources: Vec<FileUpdate> = self
            .gs
            .files()
            .map(|(_, file)| FileUpdate::new(file.path(), file.source_arc()))
            .collect();
        let mut by_path: FxHashMap<String, usize> = sources
            .iter()
            .enumerate()
            .map(|(i, update)| (update.path.clone(), i))
            .collect();
        for update in updates {
            match by_path.get(&update.path) {
                Some(&i) => sources[i] = update,
                None => {
                    by_path.insert(update.path.clone(), sources.len());
                    sources.push(update);
                }
            }
        }

        let (gs, trees, run) = build(&self.config, sources, &self.workers);
        self.gs = gs;
        self.trees = trees;
        info!(files = run.files.len(), diagnostics = run.diagnostics.len(), "slow path done");
        run
    }

    /// A private view of the canonical state with `updates` applied through
    /// the best-effort passes. The canonical state is not touched.
    pub fn stale_view(&self, updates: &[FileUpdate]) -> StaleView {
        let _span = debug_span!("stale_view", files = updates.len()).entered();
        let mut snapshot = self.gs.snapshot();

        let mut files: Vec<FileRef> = {
            let mut gs = snapshot.state_mut().unfreeze_files();
            updates
                .iter()
                .map(|update| {
                    let file = File::from_path(update.path.clone(), update.source.clone());
                    let existing = gs.find_file_by_path(&update.path);
                    if existing.exists() {
                        gs.replace_file(existing, file);
                        existing
                    } else {
                        gs.enter_file(file)
                    }
                })
                .collect()
        };
        files.sort_unstable();
        files.dedup();

        let trees = pipeline::index(snapshot.state_mut(), &files);
        {
            let mut gs = snapshot.state_mut().unfreeze_names();
            let mut gs = gs.unfreeze_symbols();
            for &file in &files {
                gs.static_init_for_file(file);
            }
        }
        pipeline::compute_file_hashes(snapshot.state_mut(), &trees, &self.workers);

        let (trees, discarded) = pipeline::run_best_effort(&snapshot, trees, &self.workers);
        let mut overlay = self.trees.clone();
        for tree in trees {
            overlay.insert(tree.file, Arc::new(tree));
        }
        StaleView {
            snapshot,
            trees: overlay,
            workers: self.workers.clone(),
            discarded,
        }
    }
}

impl Typechecker for Session {
    fn state(&self) -> &GlobalState {
        &self.gs
    }

    fn is_stale(&self) -> bool {
        self.stale
    }

    fn query(&self, query: &Query, files: &[FileRef]) -> Vec<QueryResponse> {
        query_trees(&self.gs, &self.trees, &self.workers, query, files)
    }
}

/// Trees from a best-effort run over edits, on top of the canonical ones.
pub struct StaleView {
    snapshot: Snapshot,
    trees: Trees,
    workers: WorkerPool,
    discarded: usize,
}

impl StaleView {
    /// How many diagnostics the best-effort run produced and dropped.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn tree(&self, file: FileRef) -> Option<&Arc<ParsedFile>> {
        self.trees.get(&file)
    }
}

impl Typechecker for StaleView {
    fn state(&self) -> &GlobalState {
        self.snapshot.state()
    }

    fn is_stale(&self) -> bool {
        true
    }

    fn query(&self, query: &Query, files: &[FileRef]) -> Vec<QueryResponse> {
        query_trees(self.snapshot.state(), &self.trees, &self.workers, query, files)
    }
}

fn query_trees(
    gs: &GlobalState,
    trees: &Trees,
    workers: &WorkerPool,
    query: &Query,
    files: &[FileRef],
) -> Vec<QueryResponse> {
    let _span = debug_span!("query", files = files.len()).entered();
    workers
        .map(files, |file| {
            trees
                .get(file)
                .map(|tree| respond(gs, tree, query))
                .unwrap_or_default()
        })
        .into_iter()
        .flatten()
        .collect()
}

/// Enter `sources` into a fresh state and run the whole committing pipeline.
fn build(config: &DiagnosticConfig, sources: Vec<FileUpdate>, workers: &WorkerPool) -> (GlobalState, Trees, TypecheckRun) {
    let mut gs = GlobalState::with_diagnostic_config(config.clone());
    let mut files: Vec<FileRef> = {
        let mut gs = gs.unfreeze_files();
        sources
            .into_iter()
            .map(|update| {
                let file = File::from_path(update.path, update.source);
                let existing = gs.find_file_by_path(file.path());
                if existing.exists() {
                    gs.replace_file(existing, file);
                    existing
                } else {
                    gs.enter_file(file)
                }
            })
            .collect()
    };
    files.sort_unstable();
    files.dedup();

    let trees = pipeline::index(&mut gs, &files);
    pipeline::compute_file_hashes(&mut gs, &trees, workers);
    let trees = pipeline::name_and_resolve(&mut gs, trees, workers);
    let trees = pipeline::typecheck(&gs, trees, workers);

    let trees = trees.into_iter().map(|tree| (tree.file, Arc::new(tree))).collect();
    let run = TypecheckRun {
        diagnostics: gs.errors().drain(),
        fast_path: false,
        files,
    };
    (gs, trees, run)
}

/// Hash a file on its own. Hashes only depend on name text, so this agrees
/// with the hash the file would get in any other state.
fn hash_in_isolation(update: &FileUpdate) -> FileHash {
    let mut gs = GlobalState::new();
    let file = {
        let mut gs = gs.unfreeze_files();
        gs.enter_file(File::from_path(update.path.clone(), update.source.clone()))
    };
    let tree = {
        let mut gs = gs.unfreeze_names();
        garnet_parse::index_one(&mut gs, file)
    };
    compute_file_hash(&gs, &tree)
}

#[cfg(test)]
mod tests;
