// Warden Core - Scheduling, Integrity Checks & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod port;

pub use error::{ActionError, AppError, IntegrityViolation, Result};
pub use metrics::MetricsCollector;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
