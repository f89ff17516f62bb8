// Notifier that prints one line per issue
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use warden_core::port::Notifier;

const LINE_PREFIX: &str = "[Notifier]";

/// Writes `[Notifier] <message>` lines to a writer (stdout by default)
///
/// Write failures are logged and dropped; `notify` never fails.
pub struct StdoutNotifier<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl StdoutNotifier<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StdoutNotifier<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> StdoutNotifier<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer (e.g. to inspect a buffer)
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_batch(out: &mut W, messages: &[String]) -> io::Result<()> {
        for message in messages {
            writeln!(out, "{} {}", LINE_PREFIX, message)?;
        }
        out.flush()
    }
}

impl<W: Write + Send> Notifier for StdoutNotifier<W> {
    fn notify(&self, messages: &[String]) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = Self::write_batch(&mut out, messages) {
            warn!(error = %e, messages = messages.len(), "Failed to write notification");
        }
    }
}
