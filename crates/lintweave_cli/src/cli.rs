//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// lintweave - run TSLint through the lintweave runner
#[derive(Parser)]
#[command(name = "lintweave")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Plugin settings file (a settings object, or a tsconfig.json with a
    /// lintweave plugin entry)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Workspace folder the runner lints in
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Node executable used to run the lint engine
    #[arg(long, global = true)]
    pub node: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files
    Lint {
        /// Files to lint
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Apply all non-conflicting auto-fixes
    Fix {
        /// Files to fix
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Preview fixes without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the lint configuration that applies to a file
    Config {
        /// File whose configuration is resolved
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
