use anyhow::Result;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{FeedArgs, ViewArgs};
use crate::format::render_table;
use crate::simulator::{current_timestamp_ms, generate_tokens};
use crate::view::summarize;

#[derive(Debug, Args, Clone)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub feed: FeedArgs,

    /// Print the view as pretty JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SnapshotArgs) -> Result<()> {
    let mut rng = match args.feed.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now = current_timestamp_ms();
    let tokens = generate_tokens(args.feed.count, &mut rng, now);

    let query = args.view.query();
    let rows = query.derive(&tokens);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let counts = summarize(&tokens, &query);
    println!(
        "{} ({} of {} tokens)",
        query.category.label(),
        counts.visible,
        counts.total
    );
    print!("{}", render_table(&rows, query.category, None, now));
    Ok(())
}
