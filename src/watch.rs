use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use serde_json::json;

use crate::cli::{FeedArgs, ViewArgs};
use crate::format::render_table;
use crate::logging;
use crate::model::Token;
use crate::simulator::{current_timestamp_ms, FeedEvent, FeedSimulator};
use crate::view::{summarize, TabCounts, ViewQuery};

#[derive(Debug, Args, Clone, Default)]
pub struct WatchArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub feed: FeedArgs,

    /// Stop after this many updates
    #[arg(long)]
    pub ticks: Option<usize>,

    /// Print each view as a JSON line instead of a table
    #[arg(long)]
    pub json: bool,

    /// Keep structured log lines in the output
    #[arg(long)]
    pub log: bool,
}

#[derive(Serialize)]
struct ViewFrame<'a> {
    event: &'static str,
    tab: &'static str,
    counts: TabCounts,
    rows: &'a [Token],
}

pub async fn run(args: WatchArgs) -> Result<()> {
    logging::set_silent(!args.log);

    let query = args.view.query();
    let mut simulator = FeedSimulator::new(args.feed.config());
    let mut subscription = simulator.activate();
    let mut previous: Option<Vec<Token>> = None;
    let mut updates = 0usize;

    if !args.json {
        println!("Connecting to mock feed...");
    }

    loop {
        let event = tokio::select! {
            event = subscription.recv() => event,
            _ = tokio::signal::ctrl_c() => {
                logging::info_simple("cli.interrupt", "Interrupted, stopping feed");
                break;
            }
        };

        let Some(event) = event else {
            break;
        };

        let (label, tokens) = match event {
            FeedEvent::Ready(tokens) => ("ready", tokens),
            FeedEvent::Update(tokens) => ("update", tokens),
            FeedEvent::Failed(err) => {
                simulator.deactivate();
                bail!("feed failed: {err}");
            }
        };

        let rows = query.derive(&tokens);
        let counts = summarize(&tokens, &query);
        if args.json {
            print_frame(label, &query, counts, &rows)?;
        } else {
            print_table(&query, counts, &rows, previous.as_deref());
        }
        previous = Some(rows);

        if label == "update" {
            updates += 1;
            if args.ticks.is_some_and(|limit| updates >= limit) {
                logging::info(
                    "cli.limit",
                    "Update limit reached",
                    json!({ "updates": updates }),
                );
                break;
            }
        }
    }

    simulator.deactivate();
    Ok(())
}

fn print_frame(
    event: &'static str,
    query: &ViewQuery,
    counts: TabCounts,
    rows: &[Token],
) -> Result<()> {
    let frame = ViewFrame {
        event,
        tab: query.category.as_str(),
        counts,
        rows,
    };
    println!("{}", serde_json::to_string(&frame)?);
    Ok(())
}

fn print_table(query: &ViewQuery, counts: TabCounts, rows: &[Token], previous: Option<&[Token]>) {
    println!();
    println!(
        "{} ({}) | sorted by {} {:?}",
        query.category.label(),
        counts.for_category(query.category),
        query.sort.key,
        query.sort.direction
    );
    print!(
        "{}",
        render_table(rows, query.category, previous, current_timestamp_ms())
    );
    println!(
        "Total tokens: {} | Showing: {} | Live",
        counts.total, counts.visible
    );
}
