// ── Collection cycle ──
//
// Drives the fixed step sequence against a `TelemetrySource`, streams each
// step's records to the sink, and applies the failure policy: the first two
// steps are fatal (the cycle stops and the process is torn down after a
// grace delay so a supervisor can re-authenticate from scratch); every other
// step is skipped with a warning.

use std::future::Future;
use std::time::Duration;

use strum::{Display, EnumIter};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::record::Record;
use crate::sink::MetricsSink;
use crate::source::TelemetrySource;

/// Cycle steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    DeviceInfo,
    InterfaceCounters,
    WanStatus,
    WifiClients,
    LanClients,
    WanInternetStatus,
    WifiAccessPoints,
    DhcpLeases,
    DhcpSettings,
}

impl Step {
    pub const ORDER: [Step; 9] = [
        Step::DeviceInfo,
        Step::InterfaceCounters,
        Step::WanStatus,
        Step::WifiClients,
        Step::LanClients,
        Step::WanInternetStatus,
        Step::WifiAccessPoints,
        Step::DhcpLeases,
        Step::DhcpSettings,
    ];

    /// Whether a failure of this step aborts the cycle.
    pub fn is_fatal(self) -> bool {
        matches!(self, Step::DeviceInfo | Step::InterfaceCounters)
    }
}

/// A step that failed, with its cause.
#[derive(Debug)]
pub struct StepFailure {
    pub step: Step,
    pub error: CoreError,
}

/// Outcome of one cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Records handed to the sink.
    pub emitted: usize,
    /// Recoverable failures, in step order.
    pub failures: Vec<StepFailure>,
    /// The failure that aborted the cycle, if any.
    pub fatal: Option<StepFailure>,
}

impl CycleReport {
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }
}

// ── Shutdown ─────────────────────────────────────────────────────────

/// What happens after a fatal step failure.
pub trait Shutdown: Send + Sync {
    fn terminate(&self, reason: &str) -> impl Future<Output = ()> + Send;
}

/// Sleep for the grace delay, then exit the process with status 1.
#[derive(Debug, Clone, Copy)]
pub struct ExitAfterGrace {
    grace: Duration,
}

impl ExitAfterGrace {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }
}

impl Shutdown for ExitAfterGrace {
    async fn terminate(&self, reason: &str) {
        error!(
            reason,
            grace_secs = self.grace.as_secs(),
            "fatal collection failure, exiting after grace delay"
        );
        tokio::time::sleep(self.grace).await;
        error!("grace delay over, exiting");
        std::process::exit(1);
    }
}

// ── Collector ────────────────────────────────────────────────────────

/// Runs collection cycles against one source, one cycle at a time.
pub struct Collector<S, D = ExitAfterGrace> {
    source: S,
    shutdown: D,
    cycle: Mutex<()>,
}

impl<S: TelemetrySource, D: Shutdown> Collector<S, D> {
    pub fn new(source: S, shutdown: D) -> Self {
        Self {
            source,
            shutdown,
            cycle: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one full cycle, streaming records into `sink`.
    ///
    /// Concurrent callers wait for the running cycle to finish. On a fatal
    /// failure the shutdown seam is invoked before returning; with
    /// [`ExitAfterGrace`] it never returns.
    pub async fn collect(&self, sink: &mut impl MetricsSink) -> CycleReport {
        let _cycle = self.cycle.lock().await;
        let mut report = CycleReport::default();

        for step in Step::ORDER {
            match self.run_step(step, sink).await {
                Ok(n) => report.emitted += n,
                Err(error) if step.is_fatal() => {
                    error!(step = %step, error = %error, "collection step failed (fatal)");
                    let reason = format!("{step}: {error}");
                    report.fatal = Some(StepFailure { step, error });
                    self.shutdown.terminate(&reason).await;
                    return report;
                }
                Err(error) => {
                    warn!(step = %step, error = %error, "collection step failed (non-fatal)");
                    report.failures.push(StepFailure { step, error });
                }
            }
        }

        info!(
            records = report.emitted,
            failures = report.failures.len(),
            "collection cycle complete"
        );
        report
    }

    async fn run_step(&self, step: Step, sink: &mut impl MetricsSink) -> Result<usize, CoreError> {
        let src = &self.source;
        let records = match step {
            Step::DeviceInfo => vec![Record::DeviceInfo(src.device_info().await?)],
            Step::InterfaceCounters => {
                vec![Record::InterfaceCounters(src.interface_counters().await?)]
            }
            Step::WanStatus => {
                src.prime_wan_status().await?;
                Vec::new()
            }
            Step::WifiClients => wrap(src.wifi_clients().await?, Record::WifiClient),
            Step::LanClients => wrap(src.lan_clients().await?, Record::LanClient),
            Step::WanInternetStatus => vec![Record::WanStatus(src.wan_status().await?)],
            Step::WifiAccessPoints => wrap(src.access_points().await?, Record::WifiAccessPoint),
            Step::DhcpLeases => wrap(src.dhcp_leases().await?, Record::DhcpLease),
            Step::DhcpSettings => vec![Record::DhcpSettings(src.dhcp_settings().await?)],
        };

        let n = records.len();
        for record in records {
            sink.emit(record);
        }
        Ok(n)
    }
}

fn wrap<T>(items: Vec<T>, variant: fn(T) -> Record) -> Vec<Record> {
    items.into_iter().map(variant).collect()
}
