// Job Domain Model

use chrono::{DateTime, Duration, Utc};

use crate::error::ActionError;

/// Work performed by a job; invoked synchronously by the scheduler
pub type JobAction = Box<dyn FnMut() -> Result<(), ActionError> + Send>;

/// Index of a job inside the scheduler registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle(pub(crate) usize);

impl JobHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Job State
///
/// Outcomes (succeeded, retry scheduled, exhausted) are transitions that
/// land back in `Idle`; see `application::retry::JobTransition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Idle => write!(f, "IDLE"),
            JobState::Running => write!(f, "RUNNING"),
        }
    }
}

/// Recurring job definition, owned by the scheduler registry
pub struct Job {
    pub name: String,
    pub interval: Duration,
    pub next_run_at: DateTime<Utc>,
    /// Consecutive failures since the last success or exhaustion
    pub failures: u32,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub state: JobState,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    action: JobAction,
}

impl Job {
    /// Create an idle job that becomes due at `next_run_at`
    pub fn new(
        name: impl Into<String>,
        interval: Duration,
        max_retries: u32,
        retry_backoff: Duration,
        next_run_at: DateTime<Utc>,
        action: JobAction,
    ) -> Self {
        Self {
            name: name.into(),
            interval,
            next_run_at,
            failures: 0,
            max_retries,
            retry_backoff,
            state: JobState::Idle,
            last_run_at: None,
            last_error: None,
            action,
        }
    }

    /// Due when `now` has reached `next_run_at`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_run_at
    }

    /// Transition to Running with explicit timestamp
    pub fn start(&mut self, now: DateTime<Utc>) -> crate::domain::error::Result<()> {
        if self.state != JobState::Idle {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: "RUNNING".to_string(),
            });
        }
        self.state = JobState::Running;
        self.last_run_at = Some(now);
        Ok(())
    }

    /// Call the action once
    pub(crate) fn invoke(&mut self) -> Result<(), ActionError> {
        (self.action)()
    }

    /// Success: clear the failure budget and resume normal cadence
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.failures = 0;
        self.next_run_at = advance(now, self.interval);
        self.last_error = None;
        self.state = JobState::Idle;
    }

    /// Failure within budget: come back after the backoff
    pub fn schedule_retry(&mut self, now: DateTime<Utc>, attempt: u32, error: &ActionError) {
        self.failures = attempt;
        self.next_run_at = advance(now, self.retry_backoff);
        self.last_error = Some(error.to_string());
        self.state = JobState::Idle;
    }

    /// Budget exceeded: reset failures and fall back to normal cadence
    pub fn reset_cadence(&mut self, now: DateTime<Utc>, error: &ActionError) {
        self.failures = 0;
        self.next_run_at = advance(now, self.interval);
        self.last_error = Some(error.to_string());
        self.state = JobState::Idle;
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("next_run_at", &self.next_run_at)
            .field("failures", &self.failures)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("state", &self.state)
            .field("last_run_at", &self.last_run_at)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Whole seconds as a signed duration; zero and negative stay representable
pub fn seconds(secs: i64) -> Duration {
    Duration::try_seconds(secs).unwrap_or(if secs < 0 {
        Duration::min_value()
    } else {
        Duration::max_value()
    })
}

// Saturates at the representable range instead of panicking
fn advance(from: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    from.checked_add_signed(by).unwrap_or(if by < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
