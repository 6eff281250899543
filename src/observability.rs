//! Observer hooks for pipeline stage outcomes.
//!
//! Every stage driven through a [`crate::session::Session`] reports success or failure to an
//! optional [`PipelineObserver`]. The library itself never prints; pick an observer to route
//! events to a log file or to `tracing`.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SweepError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the stage failed for this file).
    Error,
    /// Critical error (I/O and other infrastructure failures).
    Critical,
}

impl Severity {
    /// Classify an error. Only I/O failures are critical.
    pub fn for_error(err: &SweepError) -> Self {
        match err {
            SweepError::Io(_) => Self::Critical,
            _ => Self::Error,
        }
    }
}

/// Pipeline stage that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Clean,
    Project,
    Export,
}

/// Context about one stage run for one source.
#[derive(Debug, Clone)]
pub struct StageContext {
    /// Source identifier (original file name).
    pub source: String,
    /// Stage that ran.
    pub stage: Stage,
}

/// Shape of the stage output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    /// Rows in the produced table.
    pub rows: usize,
    /// Columns in the produced table.
    pub columns: usize,
}

/// Observer interface for stage outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage succeeds.
    fn on_success(&self, _ctx: &StageContext, _stats: StageStats) {}

    /// Called when a stage fails.
    fn on_failure(&self, _ctx: &StageContext, _severity: Severity, _error: &SweepError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report `result` to `observer`, alerting when the severity reaches `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn PipelineObserver>>,
    alert_at_or_above: Severity,
    ctx: &StageContext,
    result: &Result<T, SweepError>,
    stats: impl FnOnce(&T) -> StageStats,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(value) => obs.on_success(ctx, stats(value)),
        Err(e) => {
            let sev = Severity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits stage events as `tracing` events (`data_sweeper` target).
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        tracing::info!(
            stage = ?ctx.stage,
            source = %ctx.source,
            rows = stats.rows,
            columns = stats.columns,
            "stage finished"
        );
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        tracing::warn!(stage = ?ctx.stage, source = %ctx.source, ?severity, %error, "stage failed");
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        tracing::error!(stage = ?ctx.stage, source = %ctx.source, ?severity, %error, "stage alert");
    }
}

/// Appends stage events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        self.append_line(&format!(
            "{} ok stage={:?} source={} rows={} columns={}",
            unix_ts(),
            ctx.stage,
            ctx.source,
            stats.rows,
            stats.columns
        ));
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        self.append_line(&format!(
            "{} fail severity={:?} stage={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.stage,
            ctx.source,
            error
        ));
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &SweepError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} stage={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.stage,
            ctx.source,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
