use std::path::PathBuf;

use clap::Parser;

use chartsync_widgets::Theme;

#[derive(Parser, Debug, Clone)]
#[command(name = "chartsync-snapshot")]
#[command(about = "Render dashboard chart widgets from a page fixture", long_about = None)]
pub struct Args {
    /// Page fixture (JSON) describing the root attributes and mount points
    pub page: PathBuf,

    /// Switch to this theme after the initial scan and rebuild live widgets
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Point a mount at a new ticker, as `MOUNT_ID=TICKER` (repeatable)
    #[arg(long = "select", value_parser = parse_selection)]
    pub selections: Vec<(String, String)>,

    /// Do not signal the chart engine as loaded (exercises the load timeout)
    #[arg(long)]
    pub no_engine: bool,

    /// Print the final page state as JSON instead of per-mount HTML
    #[arg(long)]
    pub json: bool,
}

fn parse_selection(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((mount, ticker)) if !mount.trim().is_empty() && !ticker.trim().is_empty() => {
            Ok((mount.trim().to_string(), ticker.trim().to_string()))
        }
        _ => Err(format!("expected MOUNT_ID=TICKER, got '{}'", raw)),
    }
}
