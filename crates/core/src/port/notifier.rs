// Notifier Port
// One-way sink for issue batches; delivery is the adapter's concern

/// Notifier trait
///
/// Fire-and-forget: callers never inspect an outcome, so adapters handle
/// their own delivery failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, messages: &[String]);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records every batch it receives
    #[derive(Default)]
    pub struct RecordingNotifier {
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.batches.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, messages: &[String]) {
            self.batches.lock().unwrap().push(messages.to_vec());
        }
    }
}
