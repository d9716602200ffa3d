//! flowstate-preview: preview a donation edit against a chain snapshot.
//!
//! Usage:
//!   flowstate-preview <input.toml>
//!
//! Prints the preview as JSON on stdout. Logs go to stderr, or to the file
//! named in the config.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowstate_preview::config::PreviewConfig;
use flowstate_preview::input::PreviewInput;
use flowstate_preview::preview::preview_donation;

fn init_tracing(config: &PreviewConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("flowstate={}", config.logging.log_level).parse()?);

    match config.log_file() {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = PreviewConfig::load().context("loading config")?;

    // 2. Initialize tracing
    init_tracing(&config)?;

    // 3. Read input
    let input_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: flowstate-preview <input.toml>")?;
    let input = PreviewInput::from_path(&input_path)
        .with_context(|| format!("reading {}", input_path.display()))?;

    // 4. Compute preview
    let request = input.donation.into_request(config.display.interval);
    let preview = preview_donation(&request, &input.snapshot, config.display.decimals)?;

    info!("{}", preview.summary(config.display.decimals));

    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}
