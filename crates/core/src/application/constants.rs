// Application constants (No magic values)
use std::time::Duration;

/// Default retry budget before a failing job reverts to its normal cadence
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait before retrying a failed job (seconds)
pub const DEFAULT_RETRY_BACKOFF_SECS: i64 = 5;

/// Default sleep between scheduler ticks (1s)
pub const DEFAULT_LOOP_SLEEP: Duration = Duration::from_secs(1);

/// Counter bumped by each clean integrity run
pub const INTEGRITY_PASS_METRIC: &str = "integrity_pass";

/// Counter bumped by each integrity run that found issues
pub const INTEGRITY_FAIL_METRIC: &str = "integrity_fail";

/// Prefix for per-job scheduler outcome counters (`scheduler.<job>.<outcome>`)
pub const SCHEDULER_METRIC_PREFIX: &str = "scheduler";
