//! Lighting Calculator CLI
//!
//! Runs one `{type, data}` message through the worker and prints the replies.
//!
//! Usage:
//!   lighting-calc scenario.json --seed 42
//!   cat scenario.json | lighting-calc --summary

use anyhow::{bail, Context, Result};
use clap::Parser;
use lighting_worker::{merge_options, render_summary, LightingWorker};
use serde_json::{json, Map, Value};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "lighting-calc",
    about = "Grow-room lighting calculator: PPFD heatmap, power metrics, spectrum and layout"
)]
struct Args {
    /// Message JSON file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Seed for the Monte Carlo sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Heatmap grid divisions per side
    #[arg(long)]
    grid_resolution: Option<u32>,

    /// Monte Carlo sample count
    #[arg(long)]
    samples: Option<u32>,

    /// Print a readable summary instead of JSON replies
    #[arg(long)]
    summary: bool,

    /// Pretty-print JSON replies
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn option_overrides(&self) -> Map<String, Value> {
        let mut overrides = Map::new();
        if let Some(seed) = self.seed {
            overrides.insert("seed".to_string(), json!(seed));
        }
        if let Some(n) = self.grid_resolution {
            overrides.insert("gridResolution".to_string(), json!(n));
        }
        if let Some(n) = self.samples {
            overrides.insert("sampleCount".to_string(), json!(n));
        }
        overrides
    }
}

fn read_message(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).with_context(|| format!("reading {:?}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading message from stdin")?;
            Ok(buf)
        }
    }
}

/// The message `type`, for logs
fn message_kind(message: &Value) -> &str {
    message
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<untyped>")
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let raw = read_message(args.input.as_ref())?;
    let mut message: Value = serde_json::from_str(&raw).context("message is not valid JSON")?;
    merge_options(&mut message, args.option_overrides());
    let kind = message_kind(&message);
    debug!("Posting {} message", kind);

    let worker = LightingWorker::spawn()?;
    let replies = worker.post(message)?.blocking_collect();
    worker.shutdown();
    info!("Received {} replies", replies.len());

    if args.summary {
        print!("{}", render_summary(&replies));
    } else {
        for reply in &replies {
            let line = if args.pretty {
                serde_json::to_string_pretty(reply)?
            } else {
                serde_json::to_string(reply)?
            };
            println!("{}", line);
        }
    }

    if let Some(err) = replies.iter().find(|r| r.is_error()) {
        bail!("calculation failed: {:?}", err);
    }
    Ok(())
}
