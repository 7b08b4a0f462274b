use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::chart::ChartArgs;
use crate::constants::{READY_DELAY_MS, TICK_INTERVAL_MS, TOKEN_COUNT};
use crate::model::{Category, SortDirection, SortKey, SortSpec};
use crate::simulator::SimulatorConfig;
use crate::snapshot::SnapshotArgs;
use crate::view::ViewQuery;
use crate::watch::WatchArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Live token listing simulator")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Watch(WatchArgs::default()))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream the mock feed and redraw the selected tab on every update
    Watch(WatchArgs),
    /// Generate one collection and print the selected tab
    Snapshot(SnapshotArgs),
    /// Follow one token for a number of ticks and render its price chart
    Chart(ChartArgs),
}

/// Tab, search and ordering flags shared by the table commands.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Tab to show: new, final-stretch or migrated
    #[arg(short, long, default_value = "new")]
    pub tab: Category,

    /// Case-insensitive filter on token name or symbol
    #[arg(short, long)]
    pub search: Option<String>,

    /// Field to order rows by (e.g. volume24h, price, marketCap)
    #[arg(long, default_value = "volume24h")]
    pub sort: SortKey,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "desc")]
    pub direction: SortDirection,
}

impl ViewArgs {
    pub fn query(&self) -> ViewQuery {
        let query = ViewQuery::new(self.tab).with_sort(SortSpec::new(self.sort, self.direction));
        match &self.search {
            Some(search) => query.with_search(search.clone()),
            None => query,
        }
    }
}

impl Default for ViewArgs {
    fn default() -> Self {
        let sort = SortSpec::default();
        Self {
            tab: Category::New,
            search: None,
            sort: sort.key,
            direction: sort.direction,
        }
    }
}

/// Simulator tuning flags.
#[derive(Debug, Args, Clone)]
pub struct FeedArgs {
    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of tokens to generate
    #[arg(long, default_value_t = TOKEN_COUNT)]
    pub count: usize,

    /// Delay before the initial collection arrives, in milliseconds
    #[arg(long, default_value_t = READY_DELAY_MS)]
    pub ready_ms: u64,

    /// Interval between ticks, in milliseconds
    #[arg(long, default_value_t = TICK_INTERVAL_MS)]
    pub interval_ms: u64,
}

impl FeedArgs {
    pub fn config(&self) -> SimulatorConfig {
        SimulatorConfig {
            ready_delay: Duration::from_millis(self.ready_ms),
            tick_interval: Duration::from_millis(self.interval_ms.max(1)),
            token_count: self.count,
            seed: self.seed,
            ..SimulatorConfig::default()
        }
    }
}

impl Default for FeedArgs {
    fn default() -> Self {
        Self {
            seed: None,
            count: TOKEN_COUNT,
            ready_ms: READY_DELAY_MS,
            interval_ms: TICK_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_watch() {
        let cli = Cli::try_parse_from(["token-pulse"]).expect("parse");
        assert!(matches!(cli.command(), Command::Watch(_)));
    }

    #[test]
    fn view_flags_build_query() {
        let cli = Cli::try_parse_from([
            "token-pulse",
            "snapshot",
            "--tab",
            "final-stretch",
            "--search",
            "pepe",
            "--sort",
            "price",
            "--direction",
            "asc",
            "--seed",
            "7",
        ])
        .expect("parse");

        let Command::Snapshot(args) = cli.command() else {
            panic!("expected snapshot command");
        };
        let query = args.view.query();
        assert_eq!(query.category, Category::FinalStretch);
        assert_eq!(query.search.as_deref(), Some("pepe"));
        assert_eq!(query.sort, SortSpec::ascending(SortKey::Price));
        assert_eq!(args.feed.config().seed, Some(7));
    }

    #[test]
    fn chart_needs_at_least_one_tick() {
        assert!(Cli::try_parse_from(["token-pulse", "chart", "--ticks", "0"]).is_err());

        let cli = Cli::try_parse_from(["token-pulse", "chart", "--ticks", "1"]).expect("parse");
        let Command::Chart(args) = cli.command() else {
            panic!("expected chart command");
        };
        assert_eq!(args.ticks, 1);
    }

    #[test]
    fn unknown_tab_is_rejected() {
        let result = Cli::try_parse_from(["token-pulse", "watch", "--tab", "pending"]);
        assert!(result.is_err());
    }
}
