// src/cli.rs

use crate::config::AggregationMode;
use crate::sink::Format;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file listing the refactorings asserted for each commit
    #[arg(short, long)]
    pub batches: PathBuf,

    /// Directory holding one local clone per repository, named after the clone URL
    #[arg(long, default_value = ".")]
    pub repos_dir: PathBuf,

    /// Single local clone used for every batch (overrides --repos-dir)
    #[arg(short, long)]
    pub repo: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Files ending with this suffix count as source files
    #[arg(long, default_value = ".java")]
    pub source_suffix: String,

    /// How descriptions of the same kind are combined
    #[arg(long, value_enum, default_value_t = AggregationMode::Dedup)]
    pub aggregation: AggregationMode,

    /// Skip descriptions of unknown refactoring types instead of aborting
    #[arg(long)]
    pub skip_unknown: bool,

    /// List the folder evidence behind each Move Class decision (text format)
    #[arg(long)]
    pub explain: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
