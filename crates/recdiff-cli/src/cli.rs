use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recdiff",
    about = "Structural diff and patch for JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Diff options file (TOML, or JSON when the extension is .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Property name to leave out of the comparison
    #[arg(long = "ignore", global = true)]
    pub ignore: Vec<String>,

    /// Regex over property names to leave out of the comparison
    #[arg(long = "ignore-regex", global = true)]
    pub ignore_regex: Vec<String>,

    /// Property name whose value is copied without being examined
    #[arg(long = "ignore-value", global = true)]
    pub ignore_value: Vec<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the records that turn B into A
    Diff(DiffArgs),
    /// Apply a JSON record list to a document
    Patch(PatchArgs),
    /// Verify that patching B with diff(A, B) reproduces A
    Check(CheckArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub a: PathBuf,
    pub b: PathBuf,
}

#[derive(Args)]
pub struct PatchArgs {
    pub target: PathBuf,
    pub records: PathBuf,
    /// Write the patched document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub a: PathBuf,
    pub b: PathBuf,
}
