// Panic isolation at the per-job boundary
use std::any::Any;
use std::panic::{catch_unwind, UnwindSafe};
use tracing::error;

/// Run a closure, turning a panic into `Err(message)`
///
/// A panicking job must not take the scheduler loop (or its sibling jobs)
/// down with it.
pub(crate) fn catch_panic<F, T>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T + UnwindSafe,
{
    catch_unwind(f).map_err(|payload| {
        let panic_msg = panic_message(payload.as_ref());
        error!(panic_msg = %panic_msg, "Job action panicked");
        panic_msg
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
