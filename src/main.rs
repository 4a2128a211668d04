//! Demo driver for the two-stream logger.
//!
//! Emits a few rounds of normal and trace records so the effect of the
//! logging flags, a config file, and (with `--watch`) live edits to that file
//! can be observed.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use logswitch::cli::LogArgs;
use logswitch::observability::init_tracing_with_filter;
use logswitch::{attrs, ConfigWatcher, Logger};

#[derive(Parser)]
#[command(name = "logswitch")]
#[command(about = "Emit sample records through a runtime-configurable logger", long_about = None)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,

    /// Reload the --log-config file whenever it changes
    #[arg(short, long)]
    watch: bool,

    /// Number of rounds of sample records
    #[arg(short, long, default_value_t = 3)]
    rounds: u32,

    /// Pause between rounds in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let logger = Arc::new(Logger::new());

    // Route the crate's own tracing events (and ours) through the logger
    init_tracing_with_filter(
        Arc::clone(&logger),
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "logswitch=trace".into()),
    )?;

    cli.log.apply(&logger)?;

    let _watcher = match (&cli.log.config, cli.watch) {
        (Some(path), true) => Some(ConfigWatcher::new(path, Arc::clone(&logger)).run()?),
        (None, true) => {
            tracing::warn!("--watch has no effect without --log-config");
            None
        }
        _ => None,
    };

    tracing::info!(
        level = %logger.level(),
        trace_ids = %cli.log.all_trace_ids(),
        "logswitch demo starting"
    );

    for round in 1..=cli.rounds {
        logger.debug("round starting", attrs!["round" => round]);
        logger.info("started", attrs!["pid" => std::process::id(), "round" => round]);
        logger.trace("inspecting state", attrs!["round" => round]);
        logger.trace_id("demo", "filtered trace", attrs!["round" => round]);
        tracing::trace!(round, "trace via tracing");

        if round % 2 == 0 {
            logger.warn("slow", attrs!["ms" => 450]);
        }

        if round < cli.rounds {
            thread::sleep(Duration::from_millis(cli.interval_ms));
        }
    }

    if logger.write_failures() > 0 {
        eprintln!("{} records could not be written", logger.write_failures());
    }

    Ok(())
}
