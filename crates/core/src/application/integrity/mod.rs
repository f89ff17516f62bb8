// Integrity Monitor - consistency checks over a reservation snapshot

pub mod checks;

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::constants::{INTEGRITY_FAIL_METRIC, INTEGRITY_PASS_METRIC};
use crate::domain::{IssueReport, ReservationRecord};
use crate::error::{ActionError, IntegrityViolation};
use crate::metrics::MetricsCollector;
use crate::port::{Clock, Notifier, RecordSource};

/// Result of a clean run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub records_checked: usize,
}

/// Job body: fetch a snapshot, run every check, report as a unit
///
/// Holds no state between calls; the snapshot is fetched fresh each time.
pub struct IntegrityMonitor {
    source: Arc<dyn RecordSource>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<MetricsCollector>,
    clock: Arc<dyn Clock>,
}

impl IntegrityMonitor {
    pub fn new(
        source: Arc<dyn RecordSource>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<MetricsCollector>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            notifier,
            metrics,
            clock,
        }
    }

    /// Run the checks and record the outcome
    ///
    /// Clean: bumps `integrity_pass`. Otherwise bumps `integrity_fail`, hands
    /// the full issue list to the notifier once and returns
    /// `ActionError::IntegrityViolation`.
    ///
    /// # Errors
    /// - ActionError::Source if the snapshot cannot be fetched
    /// - ActionError::InvalidRecord if a record lacks readable times
    /// - ActionError::IntegrityViolation if any check reported an issue
    pub fn call(&self) -> Result<CheckSummary, ActionError> {
        let (records_checked, report) = self.scan()?;

        if report.is_empty() {
            self.metrics.increment(INTEGRITY_PASS_METRIC);
            info!(records = records_checked, "Integrity check passed");
            return Ok(CheckSummary { records_checked });
        }

        self.metrics.increment(INTEGRITY_FAIL_METRIC);
        warn!(
            records = records_checked,
            issues = report.len(),
            "Integrity check found issues"
        );
        self.notifier.notify(report.as_slice());
        Err(IntegrityViolation::new(report.into_vec()).into())
    }

    /// Fetch and check without touching metrics or the notifier
    pub fn inspect(&self) -> Result<IssueReport, ActionError> {
        self.scan().map(|(_, report)| report)
    }

    /// Adapt into a scheduler action
    pub fn into_action(self) -> impl FnMut() -> Result<(), ActionError> + Send + 'static {
        move || self.call().map(|_| ())
    }

    fn scan(&self) -> Result<(usize, IssueReport), ActionError> {
        let raw = self.source.fetch()?.unwrap_or_default();
        let records = raw
            .iter()
            .map(ReservationRecord::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        let now = self.clock.now();

        let mut report = IssueReport::new();
        report.extend(checks::check_timeframe(&records));
        report.extend(checks::check_overlap(&records));
        report.extend(checks::check_stale(&records, now));

        Ok((records.len(), report))
    }
}
