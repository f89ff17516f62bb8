// Warden Infrastructure - System Adapters
// Implements: Notifier

pub mod stdout_notifier;
pub mod tracing_notifier;

pub use stdout_notifier::StdoutNotifier;
pub use tracing_notifier::TracingNotifier;
