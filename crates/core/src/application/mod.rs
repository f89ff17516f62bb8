// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod integrity;
mod panic_guard;
pub mod retry;
pub mod scheduler;

// Re-exports
pub use integrity::{CheckSummary, IntegrityMonitor};
pub use retry::{JobTransition, RetryDecision, RetryPolicy};
pub use scheduler::{JobRun, JobSpec, Scheduler, TickReport};
