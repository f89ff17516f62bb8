// Record Source Port
// Supplies the integrity monitor with a fresh snapshot on every call

use crate::domain::RawRecord;
use crate::error::Result;

/// Snapshot provider
///
/// Implementations:
/// - JsonFileSource: reads a JSON array from disk (warden-infra-json)
pub trait RecordSource: Send + Sync {
    /// Fetch the current snapshot
    ///
    /// `Ok(None)` means the source had nothing to return and is treated as
    /// an empty snapshot, not an error.
    fn fetch(&self) -> Result<Option<Vec<RawRecord>>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Mock source behavior
    #[derive(Debug, Clone)]
    pub enum MockSnapshot {
        Records(Vec<RawRecord>),
        Nothing,
        Fail(String),
    }

    /// Mock RecordSource returning a fixed snapshot
    pub struct StaticSource {
        snapshot: Mutex<MockSnapshot>,
        fetch_count: Mutex<usize>,
    }

    impl StaticSource {
        pub fn new(snapshot: MockSnapshot) -> Self {
            Self {
                snapshot: Mutex::new(snapshot),
                fetch_count: Mutex::new(0),
            }
        }

        /// Build from JSON values; non-object values are skipped
        pub fn from_values(values: Vec<Value>) -> Self {
            let records = values
                .into_iter()
                .filter_map(|value| match value {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            Self::new(MockSnapshot::Records(records))
        }

        pub fn empty() -> Self {
            Self::new(MockSnapshot::Nothing)
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self::new(MockSnapshot::Fail(message.into()))
        }

        pub fn set_snapshot(&self, snapshot: MockSnapshot) {
            *self.snapshot.lock().unwrap() = snapshot;
        }

        pub fn fetch_count(&self) -> usize {
            *self.fetch_count.lock().unwrap()
        }
    }

    impl RecordSource for StaticSource {
        fn fetch(&self) -> Result<Option<Vec<RawRecord>>> {
            *self.fetch_count.lock().unwrap() += 1;

            match self.snapshot.lock().unwrap().clone() {
                MockSnapshot::Records(records) => Ok(Some(records)),
                MockSnapshot::Nothing => Ok(None),
                MockSnapshot::Fail(msg) => Err(AppError::Source(msg)),
            }
        }
    }
}
