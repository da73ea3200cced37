use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use estate_rollup::engine::dashboard::DashboardRefresher;
use estate_rollup::engine::panels::Panel;
use estate_rollup::engine::source::{InMemoryEventStore, TimeWindow};
use estate_rollup::logging;
use estate_rollup::shared::config::CONFIG;
use tracing::info;

#[derive(Parser)]
#[command(name = "estate_rollup")]
#[command(about = "Roll a snapshot of analytics events up into dashboard panels", long_about = None)]
struct Args {
    /// JSON array of raw event records
    #[arg(short, long)]
    input: PathBuf,

    /// Panel to compute; repeat for several. All panels when omitted
    #[arg(short, long = "panel")]
    panels: Vec<Panel>,

    /// Only use events from the trailing N days (0 = whole snapshot)
    #[arg(long, default_value = "0")]
    window_days: i64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Simulate a missing session: every panel shows its fallback data
    #[arg(long)]
    deny: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init()?;

    let store = InMemoryEventStore::from_json_file(&args.input)?;
    info!(records = store.len(), input = %args.input.display(), "snapshot loaded");

    let settings = CONFIG.rollup.clone();
    let window = TimeWindow::trailing_days(chrono::Utc::now(), args.window_days);
    let refresher =
        DashboardRefresher::new(Arc::new(store), !args.deny, settings).with_window(window);

    let panels = if args.panels.is_empty() {
        Panel::ALL.to_vec()
    } else {
        args.panels
    };
    let results = refresher.refresh(&panels).await?;

    let out = if args.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{out}");
    Ok(())
}
