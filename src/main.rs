use anyhow::Result;
use clap::Parser;
use token_pulse::chart;
use token_pulse::cli::{self, Cli};
use token_pulse::snapshot;
use token_pulse::watch;

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command() {
        cli::Command::Watch(args) => watch::run(args).await,
        cli::Command::Snapshot(args) => snapshot::run(args),
        cli::Command::Chart(args) => chart::run(args).await,
    }
}
