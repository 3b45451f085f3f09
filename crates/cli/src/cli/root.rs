use clap::Parser;
use std::path::PathBuf;

/// `prog [-q] [-o <output-dir>] <database-path>` (spec §6).
#[derive(Debug, Parser)]
#[command(name = "c9rev2git")]
#[command(about = "Replay a Cloud9-style collaborative editor database as a git history")]
pub struct Cli {
    /// Suppress progress output on standard output.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Output/working directory. Default: `repo`.
    #[arg(short = 'o', long = "output", default_value = "repo")]
    pub output: PathBuf,

    /// Path to the source database file.
    pub database: PathBuf,
}
