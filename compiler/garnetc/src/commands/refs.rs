//! The `refs` command: every use of the symbol at a position.

use std::path::PathBuf;
use std::process::ExitCode;

use super::{display_at, CliError, Workspace};
use crate::cli::{At, Cli};
use crate::lsp::{LspMethod, LspQuery};
use crate::report::show_loc;

pub fn run_refs(cli: &Cli, at: &At, inputs: &[PathBuf]) -> Result<ExitCode, CliError> {
    let workspace = Workspace::load(cli, inputs)?;
    let (uri, pos) = workspace.locate(at);
    let responses = LspQuery::by_loc(
        &workspace.config,
        &workspace.session,
        &uri,
        pos,
        LspMethod::References,
        false,
    )?;

    // The response starting closest to the cursor wins.
    let Some(symbol) = responses
        .iter()
        .rev()
        .map(|r| r.kind.symbol())
        .find(|sym| sym.exists())
    else {
        return Err(CliError::NoSymbol(display_at(at)));
    };

    let gs = workspace.session.state();
    println!("{}", gs.show_symbol(symbol));
    for response in LspQuery::by_symbol(&workspace.session, symbol) {
        println!("  {} ({})", show_loc(gs, response.loc), response.kind.label());
    }
    Ok(ExitCode::SUCCESS)
}
