// src/main.rs

use anyhow::Result;
use clap::Parser;
use refactoring_oracle::analyzer::{self, RepoLocator};
use refactoring_oracle::batch::load_batches;
use refactoring_oracle::cli::Args;
use refactoring_oracle::config::Config;
use refactoring_oracle::sink::sink_for;
use std::time::Instant;
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    let start_time = Instant::now();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let batches = load_batches(&args.batches)?;
    tracing::info!("Loaded {} commit batches from {}", batches.len(), args.batches.display());

    let repos = match &args.repo {
        Some(path) => RepoLocator::Single(path.clone()),
        None => RepoLocator::PerCloneUrl(args.repos_dir.clone()),
    };
    let config = Config {
        source_suffix: args.source_suffix.clone(),
        aggregation: args.aggregation,
        skip_unknown: args.skip_unknown,
        explain: args.explain,
    };

    let stdout = std::io::stdout();
    let mut sink = sink_for(args.format, stdout.lock(), config.explain);
    let summary = analyzer::run(&batches, &config, &repos, sink.as_mut(), !args.quiet)?;

    eprintln!(
        "Processed {} of {} commits ({} descriptions) in {:.2?}.",
        summary.processed,
        batches.len(),
        summary.descriptions,
        start_time.elapsed()
    );
    for failed in &summary.failed {
        eprintln!("  skipped {}: {}", failed.commit, failed.reason);
    }

    Ok(())
}
