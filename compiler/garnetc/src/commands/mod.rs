//! The `garnet` subcommands.
//!
//! Each command loads the inputs into a fresh [`Session`] and then either
//! prints its diagnostics or answers one query against it.

mod check;
mod hover;
mod refs;

use std::path::PathBuf;
use std::process::ExitCode;

use garnet_diagnostic::DiagnosticConfig;
use thiserror::Error;
use tracing::debug;

use crate::cli::{At, Cli, Command};
use crate::discover::discover_sources;
use crate::lsp::{ConfigError, LspConfig, PathMapper, Position, QueryError};
use crate::session::{FileUpdate, Session, TypecheckRun};
use crate::workers::WorkerPool;

pub use check::run_check;
pub use hover::run_hover;
pub use refs::run_refs;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("no symbol at {0}")]
    NoSymbol(String),

    #[error("no source files found")]
    NoInputs,
}

/// Shared setup for every command.
pub struct Workspace {
    pub config: LspConfig,
    pub session: Session,
    pub run: TypecheckRun,
}

impl Workspace {
    /// Discover, read and check `inputs`.
    pub fn load(cli: &Cli, inputs: &[PathBuf]) -> Result<Self, CliError> {
        let root = std::env::current_dir().map_err(CliError::WorkingDir)?;
        let config = LspConfig::new(root.to_string_lossy(), &cli.ignore)?;

        let mut updates = Vec::new();
        for path in discover_sources(inputs) {
            let display = path.to_string_lossy().into_owned();
            let relative = config.relative_path(&display).to_owned();
            if config.is_file_ignored(&relative) {
                debug!(path = %relative, "ignored");
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|source| CliError::Io {
                path: display.clone(),
                source,
            })?;
            updates.push(FileUpdate::new(relative, source));
        }
        if updates.is_empty() {
            return Err(CliError::NoInputs);
        }

        let diagnostics = DiagnosticConfig {
            error_limit: cli.error_limit,
            ..DiagnosticConfig::default()
        };
        let (session, run) = Session::with_diagnostic_config(WorkerPool::new(cli.workers), diagnostics, updates);
        Ok(Workspace { config, session, run })
    }

    /// The URI and 0-based position a 1-based CLI position refers to.
    pub fn locate(&self, at: &At) -> (String, Position) {
        let path = at.file.to_string_lossy();
        let uri = self.config.file_uri(self.config.relative_path(&path));
        let pos = Position::new(at.line.saturating_sub(1), at.column.saturating_sub(1));
        (uri, pos)
    }
}

/// Run the command `cli` names.
pub fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Command::Check { inputs } => run_check(cli, inputs),
        Command::Hover { at, inputs } => run_hover(cli, at, inputs),
        Command::Refs { at, inputs } => run_refs(cli, at, inputs),
    }
}

fn display_at(at: &At) -> String {
    format!("{}:{}:{}", at.file.display(), at.line, at.column)
}
