//! The `hover` command: show everything at a position, outermost first.

use std::path::PathBuf;
use std::process::ExitCode;

use super::{CliError, Workspace};
use crate::cli::{At, Cli};
use crate::lsp::{LspMethod, LspQuery};
use crate::report::render_response;

pub fn run_hover(cli: &Cli, at: &At, inputs: &[PathBuf]) -> Result<ExitCode, CliError> {
    let workspace = Workspace::load(cli, inputs)?;
    let (uri, pos) = workspace.locate(at);
    let responses = LspQuery::by_loc(&workspace.config, &workspace.session, &uri, pos, LspMethod::Hover, false)?;

    let gs = workspace.session.state();
    for response in &responses {
        println!("{}", render_response(gs, response));
    }
    Ok(ExitCode::SUCCESS)
}
