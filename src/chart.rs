use anyhow::{bail, Result};
use clap::builder::RangedU64ValueParser;
use clap::Args;
use serde_json::json;
use textplots::{Chart, Plot, Shape};

use crate::cli::FeedArgs;
use crate::logging;
use crate::model::Token;
use crate::simulator::{FeedEvent, FeedSimulator};
use crate::view::ViewQuery;

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Symbol to follow; defaults to the highest-volume new pair
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Number of ticks to collect before plotting (at least one)
    #[arg(
        short,
        long,
        default_value_t = 40,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub ticks: usize,

    /// Chart width in characters
    #[arg(long, default_value_t = 120)]
    pub width: u32,

    /// Chart height in characters
    #[arg(long, default_value_t = 30)]
    pub height: u32,
}

pub async fn run(args: ChartArgs) -> Result<()> {
    logging::set_silent(true);

    let (symbol, points) = collect_prices(&args).await?;
    if points.len() < 2 {
        bail!("not enough data points to render a chart");
    }

    render_chart(&symbol, points, args.width, args.height);
    Ok(())
}

async fn collect_prices(args: &ChartArgs) -> Result<(String, Vec<(f64, f64)>)> {
    let mut simulator = FeedSimulator::new(args.feed.config());
    let mut subscription = simulator.activate();
    let mut symbol = args.symbol.clone();
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(args.ticks + 1);

    println!(
        "Collecting {} ticks{}...",
        args.ticks,
        symbol
            .as_ref()
            .map(|s| format!(" for {s}"))
            .unwrap_or_default()
    );

    while points.len() <= args.ticks {
        let tokens = match subscription.recv().await {
            Some(FeedEvent::Ready(tokens)) | Some(FeedEvent::Update(tokens)) => tokens,
            Some(FeedEvent::Failed(err)) => bail!("feed failed: {err}"),
            None => break,
        };

        let followed = symbol.get_or_insert_with(|| default_symbol(&tokens));
        let Some(token) = tokens.iter().find(|token| &token.symbol == followed) else {
            simulator.deactivate();
            bail!("no token with symbol {followed}");
        };
        points.push((points.len() as f64, token.price));
    }

    simulator.deactivate();
    logging::info(
        "chart.collected",
        "Price samples collected",
        json!({ "samples": points.len() }),
    );

    Ok((symbol.unwrap_or_default(), points))
}

fn default_symbol(tokens: &[Token]) -> String {
    ViewQuery::default()
        .derive(tokens)
        .first()
        .map(|token| token.symbol.clone())
        .unwrap_or_default()
}

fn render_chart(symbol: &str, points: Vec<(f64, f64)>, width: u32, height: u32) {
    println!("Rendering chart for {symbol} ({} samples)", points.len());

    let max_tick = points.last().map(|(t, _)| *t).unwrap_or(1.0).max(1.0);
    let min_price = points.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);
    let max_price = points
        .iter()
        .map(|(_, p)| *p)
        .fold(f64::NEG_INFINITY, f64::max);
    println!("Price range: {:.6} → {:.6}", min_price, max_price);

    let samples: Vec<(f32, f32)> = points
        .into_iter()
        .map(|(t, p)| (t as f32, p as f32))
        .collect();

    Chart::new(width.max(40), height.max(10), 0.0, max_tick as f32)
        .lineplot(&Shape::Lines(&samples))
        .display();
    println!();
}
