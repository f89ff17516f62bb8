// Retry logic - bounded retry with fixed backoff, per job
use crate::domain::Job;
use crate::error::ActionError;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, warn};

/// What to do with a job whose action just failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Run again after `backoff`; `attempt` is the new consecutive failure count
    Retry { attempt: u32, backoff: Duration },
    /// Budget exceeded; `failures` counts this failure too
    Exhausted { failures: u32 },
}

/// Outcome of one execution, as reported by `Scheduler::tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTransition {
    Succeeded,
    RetryScheduled { attempt: u32, backoff: Duration },
    Exhausted { failures: u32 },
}

impl JobTransition {
    pub fn is_success(&self) -> bool {
        matches!(self, JobTransition::Succeeded)
    }

    /// Metric/log label
    pub fn label(&self) -> &'static str {
        match self {
            JobTransition::Succeeded => "succeeded",
            JobTransition::RetryScheduled { .. } => "retried",
            JobTransition::Exhausted { .. } => "exhausted",
        }
    }
}

impl From<RetryDecision> for JobTransition {
    fn from(decision: RetryDecision) -> Self {
        match decision {
            RetryDecision::Retry { attempt, backoff } => {
                JobTransition::RetryScheduled { attempt, backoff }
            }
            RetryDecision::Exhausted { failures } => JobTransition::Exhausted { failures },
        }
    }
}

/// Retry policy
///
/// A failure is retried while `failures + 1 <= max_retries`. Past that the
/// job is never disabled: its failure count resets and it falls back to the
/// normal interval.
#[derive(Debug, Default, Clone, Copy)]
pub struct RetryPolicy;

impl RetryPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decide retry vs exhaustion for a job that just failed
    pub fn decide(&self, job: &Job) -> RetryDecision {
        let attempt = job.failures.saturating_add(1);
        if attempt <= job.max_retries {
            RetryDecision::Retry {
                attempt,
                backoff: job.retry_backoff,
            }
        } else {
            RetryDecision::Exhausted { failures: attempt }
        }
    }

    /// Decide and update the job's bookkeeping
    pub fn apply(&self, job: &mut Job, now: DateTime<Utc>, err: &ActionError) -> JobTransition {
        let decision = self.decide(job);

        match decision {
            RetryDecision::Retry { attempt, backoff } => {
                job.schedule_retry(now, attempt, err);
                warn!(
                    job = %job.name,
                    outcome = "retried",
                    attempt = attempt,
                    max_retries = job.max_retries,
                    backoff_secs = backoff.num_seconds(),
                    error_kind = err.kind(),
                    error = %err,
                    "Job failed, retry scheduled"
                );
            }
            RetryDecision::Exhausted { failures } => {
                job.reset_cadence(now, err);
                error!(
                    job = %job.name,
                    outcome = "exhausted",
                    failures = failures,
                    max_retries = job.max_retries,
                    next_run_at = %job.next_run_at,
                    error_kind = err.kind(),
                    error = %err,
                    "Job exhausted retries, reverting to normal cadence"
                );
            }
        }

        decision.into()
    }
}
