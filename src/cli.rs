//! Command line: the names of the processes to track, nothing else.

use clap::Parser;

/// Append per-process resource samples to `logs/<name>.csv`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Process names to track (exact, case-sensitive match).
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}
