// Notifier that emits each issue as a warn event
use tracing::warn;

use warden_core::port::Notifier;

/// Routes issues into the process log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, messages: &[String]) {
        let total = messages.len();
        for (index, message) in messages.iter().enumerate() {
            warn!(issue = %message, index = index + 1, total = total, "Integrity issue");
        }
    }
}
