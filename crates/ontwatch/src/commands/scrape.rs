//! One-shot collection.

use std::io;

use ontwatch_core::{Collector, ExporterConfig, Shutdown};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::RecordWriter;

/// A one-shot run reports a fatal step through the exit code instead of
/// lingering for the grace delay.
struct ReturnToCaller;

impl Shutdown for ReturnToCaller {
    async fn terminate(&self, reason: &str) {
        debug!(reason, "fatal step, returning to caller");
    }
}

pub async fn handle(config: &ExporterConfig, format: OutputFormat) -> Result<(), CliError> {
    let session = ontwatch_core::connect(config).await?;
    let collector = Collector::new(session, ReturnToCaller);

    let mut writer = RecordWriter::new(format, io::stdout());
    let report = collector.collect(&mut writer).await;
    writer.flush()?;

    match report.fatal {
        Some(failure) => Err(failure.into()),
        None => Ok(()),
    }
}
