//! The `check` command: type-check every input and print diagnostics.

use std::path::PathBuf;
use std::process::ExitCode;

use super::{CliError, Workspace};
use crate::cli::Cli;
use crate::report::render_diagnostic;

/// Prints diagnostics to stdout and a summary to stderr. Fails when any
/// diagnostic is an error.
pub fn run_check(cli: &Cli, inputs: &[PathBuf]) -> Result<ExitCode, CliError> {
    let workspace = Workspace::load(cli, inputs)?;
    let gs = workspace.session.state();
    let diagnostics = &workspace.run.diagnostics;

    for diag in diagnostics {
        println!("{}", render_diagnostic(gs, diag));
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;
    eprintln!(
        "{} files checked: {errors} errors, {warnings} warnings",
        gs.files_used()
    );

    Ok(if errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
