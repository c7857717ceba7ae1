use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use now_playing_widget::{
    config::Config,
    preview::{PreviewHost, Scenario, ScenarioWatcher},
    RefreshReport, WidgetUpdater,
};

/// Renders widget previews for a scenario of display, session and placements.
#[derive(Debug, Parser)]
#[command(name = "now-playing-widget", version)]
struct Args {
    /// Scenario file describing the display, current session and widgets
    #[arg(default_value = "scenario.toml")]
    scenario: PathBuf,

    /// Directory that receives one PNG and one summary per widget
    #[arg(short, long, default_value = "widget-preview")]
    out: PathBuf,

    /// Widget config file; searched next to the binary when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh again whenever the scenario file changes
    #[arg(short, long)]
    watch: bool,
}

fn refresh(scenario_path: &Path, out: &Path, config: &Config) -> Result<RefreshReport> {
    let scenario = Scenario::load(scenario_path)?;
    let host = PreviewHost::new(out, scenario.widgets.clone());
    let report = WidgetUpdater::new(&scenario, &host, &scenario, config).refresh_all();
    info!(
        instances = report.instances,
        updated = report.updated,
        failed = report.failed,
        planned = report.planned,
        "Refresh complete"
    );
    Ok(report)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    refresh(&args.scenario, &args.out, &config)?;

    if args.watch {
        let watcher = ScenarioWatcher::new(&args.scenario)?;
        info!(scenario = %args.scenario.display(), "Watching scenario for changes");
        while watcher.wait_for_change() {
            if let Err(err) = refresh(&args.scenario, &args.out, &config) {
                warn!(error = %format!("{err:#}"), "Refresh failed; waiting for next change");
            }
        }
    }

    Ok(())
}
