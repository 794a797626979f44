use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// garnet: an incremental type checker for Ruby-like sources
#[derive(Parser, Debug)]
#[command(name = "garnet", version)]
#[command(about = "Type-check sources and answer editor queries against them", long_about = None)]
pub struct Cli {
    /// Worker threads for per-file phases (0 runs everything inline)
    #[arg(long, global = true, default_value_t = 0)]
    pub workers: usize,

    /// Glob of workspace-relative paths to leave out (repeatable)
    #[arg(long = "ignore", global = true, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Print spans as an indented tree on stderr
    #[arg(long, global = true, default_value_t = false)]
    pub log_tree: bool,

    /// Stop collecting errors after this many (0 for no limit)
    #[arg(long, global = true, default_value_t = 1000)]
    pub error_limit: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Type-check files and directories and print diagnostics
    Check {
        /// Files or directories (.rb and .rbi)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Show what is at a position
    Hover {
        #[command(flatten)]
        at: At,
        /// Files or directories (.rb and .rbi)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// List every use of the symbol at a position
    Refs {
        #[command(flatten)]
        at: At,
        /// Files or directories (.rb and .rbi)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

/// A 1-based position in one of the inputs.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct At {
    /// File the position is in
    #[arg(long)]
    pub file: PathBuf,

    /// 1-based line
    #[arg(long)]
    pub line: u32,

    /// 1-based column, in bytes
    #[arg(long)]
    pub column: u32,
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["garnet", "check", "lib"]).unwrap();
        assert_eq!(cli.workers, 0);
        assert!(cli.ignore.is_empty());
        assert!(!cli.log_tree);
        assert_eq!(cli.error_limit, 1000);
        match cli.command {
            Command::Check { inputs } => assert_eq!(inputs, vec![PathBuf::from("lib")]),
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "garnet", "check", "a.rb", "--workers", "4", "--ignore", "vendor/**", "--ignore", "gen/**",
            "--log-tree",
        ])
        .unwrap();
        assert_eq!(cli.workers, 4);
        assert_eq!(cli.ignore, vec!["vendor/**".to_owned(), "gen/**".to_owned()]);
        assert!(cli.log_tree);
    }

    #[test]
    fn test_hover_position() {
        let cli = Cli::try_parse_from([
            "garnet", "hover", "--file", "a.rb", "--line", "3", "--column", "7", "a.rb", "b.rb",
        ])
        .unwrap();
        match cli.command {
            Command::Hover { at, inputs } => {
                assert_eq!(
                    at,
                    At {
                        file: PathBuf::from("a.rb"),
                        line: 3,
                        column: 7,
                    }
                );
                assert_eq!(inputs.len(), 2);
            }
            other => panic!("expected hover, got {other:?}"),
        }
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Cli::try_parse_from(["garnet", "check"]).is_err());
        assert!(Cli::try_parse_from(["garnet", "refs", "--file", "a.rb", "--line", "1", "a.rb"]).is_err());
    }
}
