//! The Garnet type checker driver.
//!
//! Ties the phase crates into something that can be run:
//!
//! - [`pipeline`]: the phases in order, committing and best-effort.
//! - [`session`]: the canonical state across edits, with incremental commits
//!   and stale views for answering queries while edits are pending.
//! - [`lsp`]: editor queries by location and by symbol.
//! - [`commands`]: the `garnet` command-line tool.

pub mod cli;
pub mod commands;
mod discover;
pub mod logging;
pub mod lsp;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod workers;

pub use discover::discover_sources;
pub use session::{FileUpdate, Session, StaleView, TypecheckRun, Typechecker};
pub use workers::WorkerPool;
