//! Garnet CLI

use std::process::ExitCode;

use garnetc::cli::Cli;
use garnetc::commands;
use garnetc::logging::init_tracing;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_tree);

    match commands::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
