//! Garnet front end: phases 1-4 of the pipeline.
//!
//! 1. [`parser::parse_file`] turns text into a raw tree.
//! 2. [`desugar::desugar`] lowers sugar assignments.
//! 3. [`rewriter::rewrite`] expands `attr_*` into synthetic methods.
//! 4. [`local_vars::index_locals`] tells locals from implicit-self calls.
//!
//! [`index_one`] runs all four for one file.

pub mod desugar;
pub mod lexer;
pub mod local_vars;
pub mod parser;
pub mod rewriter;

use garnet_core::GlobalState;
use garnet_ir::{FileRef, ParsedFile};
use tracing::debug_span;

pub use parser::{parse_file, ParseOutput};

/// Run phases 1-4 on `file`. Parse errors go to the state's error channel.
///
/// Requires the names table unfrozen.
pub fn index_one(gs: &mut GlobalState, file: FileRef) -> ParsedFile {
    let _span = debug_span!("index_one", file = file.id()).entered();

    let output = parse_file(gs, file);
    for error in output.errors {
        gs.push_error(error);
    }
    let tree = desugar::desugar(gs, output.tree);
    let tree = rewriter::rewrite(gs, tree);
    let tree = local_vars::index_locals(tree);
    ParsedFile::new(tree, file)
}
