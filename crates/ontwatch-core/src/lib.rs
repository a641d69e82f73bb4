//! Collection orchestration between `ontwatch-api` and metrics consumers.
//!
//! - **[`Collector`]** runs one scrape cycle at a time against a
//!   [`TelemetrySource`], streaming each decoded [`Record`] into a
//!   [`MetricsSink`] and applying the fatal/recoverable step policy.
//! - **[`Record::samples`]** flattens records into metric samples for sinks
//!   that expose gauges and counters.
//! - **[`ExporterConfig`]** is the runtime configuration; the core never
//!   reads files or the environment itself.

pub mod collector;
pub mod config;
pub mod error;
pub mod record;
pub mod samples;
pub mod sink;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::{Collector, CycleReport, ExitAfterGrace, Shutdown, Step, StepFailure};
pub use config::ExporterConfig;
pub use error::CoreError;
pub use record::{Record, RecordKind};
pub use samples::{Sample, SampleType};
pub use sink::MetricsSink;
pub use source::{TelemetrySource, connect};
