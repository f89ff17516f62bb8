// Domain Layer - Pure business logic and entities

pub mod error;
pub mod issue;
pub mod job;
pub mod reservation;

// Re-exports
pub use error::DomainError;
pub use issue::IssueReport;
pub use job::{Job, JobAction, JobHandle, JobState};
pub use reservation::{RawRecord, ReservationRecord, BOOKED_STATUS};
