//! Scheduler - drives a registry of recurring jobs against a supplied "now"
//!
//! - `tick(now)` runs every due job once, sequentially, in registration order
//! - failures are absorbed per job and feed the retry/backoff state machine
//! - `run(loop_sleep)` ticks forever, sleeping between ticks

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info};

use super::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_SECS, SCHEDULER_METRIC_PREFIX};
use super::panic_guard::catch_panic;
use super::retry::{JobTransition, RetryPolicy};
use crate::domain::job::seconds;
use crate::domain::{Job, JobAction, JobHandle};
use crate::error::{ActionError, AppError, Result};
use crate::metrics::MetricsCollector;
use crate::port::Clock;

/// Registration request for a recurring job
///
/// No bounds are enforced on the durations: zero or negative values are
/// accepted and yield a job that is due on every tick.
pub struct JobSpec {
    name: String,
    interval: Duration,
    max_retries: u32,
    retry_backoff: Duration,
    action: Option<JobAction>,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, interval_secs: i64) -> Self {
        Self {
            name: name.into(),
            interval: seconds(interval_secs),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: seconds(DEFAULT_RETRY_BACKOFF_SECS),
            action: None,
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn retry_backoff_secs(mut self, secs: i64) -> Self {
        self.retry_backoff = seconds(secs);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> std::result::Result<(), ActionError> + Send + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }
}

/// One job execution inside a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRun {
    pub handle: JobHandle,
    pub name: String,
    pub transition: JobTransition,
}

/// Everything a tick executed, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub runs: Vec<JobRun>,
}

impl TickReport {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.runs.iter().filter(|r| r.transition.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn transition_of(&self, handle: JobHandle) -> Option<JobTransition> {
        self.runs
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.transition)
    }
}

/// Scheduler owns the job registry
pub struct Scheduler {
    jobs: Vec<Job>,
    clock: Arc<dyn Clock>,
    retry_policy: RetryPolicy,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            jobs: Vec::new(),
            clock,
            retry_policy: RetryPolicy::new(),
            metrics: None,
        }
    }

    /// Count transitions as `scheduler.<job>.<succeeded|retried|exhausted>`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Add a job, due immediately
    ///
    /// # Errors
    /// - AppError::InvalidJob if the `JobSpec` has no action
    ///
    /// Duplicate names are allowed; each registration is a separate entry.
    pub fn register(&mut self, spec: JobSpec) -> Result<JobHandle> {
        let JobSpec {
            name,
            interval,
            max_retries,
            retry_backoff,
            action,
        } = spec;

        let action = action.ok_or_else(|| {
            AppError::InvalidJob(format!("job '{}' has no action", name))
        })?;

        Ok(self.insert(name, interval, max_retries, retry_backoff, action))
    }

    /// Register with default retry settings
    pub fn every<F>(&mut self, interval_secs: i64, name: impl Into<String>, action: F) -> JobHandle
    where
        F: FnMut() -> std::result::Result<(), ActionError> + Send + 'static,
    {
        self.insert(
            name.into(),
            seconds(interval_secs),
            DEFAULT_MAX_RETRIES,
            seconds(DEFAULT_RETRY_BACKOFF_SECS),
            Box::new(action),
        )
    }

    fn insert(
        &mut self,
        name: String,
        interval: Duration,
        max_retries: u32,
        retry_backoff: Duration,
        action: JobAction,
    ) -> JobHandle {
        let handle = JobHandle(self.jobs.len());
        let next_run_at = self.clock.now();

        info!(
            job = %name,
            interval_secs = interval.num_seconds(),
            max_retries = max_retries,
            retry_backoff_secs = retry_backoff.num_seconds(),
            "Job registered"
        );

        self.jobs.push(Job::new(
            name,
            interval,
            max_retries,
            retry_backoff,
            next_run_at,
            action,
        ));
        handle
    }

    /// Run every job due at `now`
    ///
    /// Never fails: action errors and panics are absorbed per job.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();

        for (index, job) in self.jobs.iter_mut().enumerate() {
            if !job.is_due(now) {
                continue;
            }

            let Some(transition) =
                Self::execute(job, now, &self.retry_policy, self.metrics.as_deref())
            else {
                continue;
            };

            report.runs.push(JobRun {
                handle: JobHandle(index),
                name: job.name.clone(),
                transition,
            });
        }

        debug!(
            now = %now,
            executed = report.len(),
            failed = report.failed(),
            "Tick complete"
        );
        report
    }

    /// Tick at the clock's current time
    pub fn tick_now(&mut self) -> TickReport {
        let now = self.clock.now();
        self.tick(now)
    }

    /// Tick forever
    ///
    /// Only suspends between ticks; job bodies block the loop while they run.
    /// There is no cancellation: drop the future (or end the process) to stop.
    pub async fn run(&mut self, loop_sleep: std::time::Duration) {
        info!(
            jobs = self.jobs.len(),
            loop_sleep_ms = loop_sleep.as_millis() as u64,
            "Scheduler loop started"
        );

        loop {
            self.tick_now();
            tokio::time::sleep(loop_sleep).await;
        }
    }

    pub fn job(&self, handle: JobHandle) -> Option<&Job> {
        self.jobs.get(handle.0)
    }

    /// Jobs in registration order
    pub fn jobs(&self) -> impl Iterator<Item = (JobHandle, &Job)> {
        self.jobs
            .iter()
            .enumerate()
            .map(|(index, job)| (JobHandle(index), job))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn execute(
        job: &mut Job,
        now: DateTime<Utc>,
        retry_policy: &RetryPolicy,
        metrics: Option<&MetricsCollector>,
    ) -> Option<JobTransition> {
        if let Err(e) = job.start(now) {
            error!(job = %job.name, error = %e, "Job could not start");
            return None;
        }

        info!(job = %job.name, failures = job.failures, "Job started");

        let outcome = match catch_panic(AssertUnwindSafe(|| job.invoke())) {
            Ok(result) => result,
            Err(panic_msg) => Err(ActionError::Panicked(panic_msg)),
        };

        let transition = match outcome {
            Ok(()) => {
                job.complete(now);
                info!(
                    job = %job.name,
                    outcome = "succeeded",
                    next_run_at = %job.next_run_at,
                    "Job finished"
                );
                JobTransition::Succeeded
            }
            Err(e) => retry_policy.apply(job, now, &e),
        };

        if let Some(metrics) = metrics {
            metrics.increment(&format!(
                "{}.{}.{}",
                SCHEDULER_METRIC_PREFIX,
                job.name,
                transition.label()
            ));
        }

        Some(transition)
    }
}
