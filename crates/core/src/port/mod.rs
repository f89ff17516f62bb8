// Port Layer - Interfaces for external dependencies

pub mod clock; // For deterministic testing
pub mod notifier;
pub mod record_source;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use notifier::Notifier;
pub use record_source::RecordSource;
