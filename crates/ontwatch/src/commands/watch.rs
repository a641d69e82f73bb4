//! Periodic collection until interrupted.

use std::io;
use std::time::Duration;

use ontwatch_core::{Collector, ExitAfterGrace, ExporterConfig};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output::RecordWriter;

pub async fn handle(
    config: &ExporterConfig,
    args: &WatchArgs,
    format: OutputFormat,
) -> Result<(), CliError> {
    if args.interval == 0 {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let session = ontwatch_core::connect(config).await?;
    let collector = Collector::new(session, ExitAfterGrace::new(config.fatal_grace));
    let mut writer = RecordWriter::new(format, io::stdout());

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs = args.interval, "watching");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = collector.collect(&mut writer).await;
                writer.flush()?;
                debug!(records = report.emitted, "cycle written");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping");
                return Ok(());
            }
        }
    }
}
