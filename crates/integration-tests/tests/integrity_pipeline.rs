//! Integrity pipeline integration tests
//!
//! JSON snapshot on disk -> JsonFileSource -> IntegrityMonitor -> Scheduler

use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use warden_core::application::constants::{INTEGRITY_FAIL_METRIC, INTEGRITY_PASS_METRIC};
use warden_core::application::{IntegrityMonitor, JobSpec, JobTransition, Scheduler};
use warden_core::port::clock::mocks::ManualClock;
use warden_core::port::notifier::mocks::RecordingNotifier;
use warden_core::port::Notifier;
use warden_core::{ActionError, MetricsCollector};
use warden_infra_json::JsonFileSource;
use warden_infra_system::StdoutNotifier;

/// Writer shared between the notifier and the test
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Pipeline {
    file: NamedTempFile,
    clock: Arc<ManualClock>,
    metrics: Arc<MetricsCollector>,
}

impl Pipeline {
    fn new(snapshot: Value) -> Self {
        let file = NamedTempFile::new().unwrap();
        let pipeline = Self {
            file,
            clock: Arc::new(ManualClock::new(t0())),
            metrics: Arc::new(MetricsCollector::new()),
        };
        pipeline.write(snapshot);
        pipeline
    }

    fn write(&self, snapshot: Value) {
        fs::write(self.file.path(), snapshot.to_string()).unwrap();
    }

    fn monitor(&self, notifier: Arc<dyn Notifier>) -> IntegrityMonitor {
        IntegrityMonitor::new(
            Arc::new(JsonFileSource::new(self.file.path())),
            notifier,
            self.metrics.clone(),
            self.clock.clone(),
        )
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap()
}

fn reservation(id: &str, resource: &str, starts_at: &str, ends_at: &str, status: &str) -> Value {
    json!({
        "id": id,
        "resource_name": resource,
        "starts_at": starts_at,
        "ends_at": ends_at,
        "status": status
    })
}

fn overlapping_pair() -> Value {
    json!([
        reservation("RES-1", "Room-A", "2025-01-02T09:00:00Z", "2025-01-02T10:00:00Z", "booked"),
        reservation("RES-2", "Room-A", "2025-01-02T09:30:00Z", "2025-01-02T10:30:00Z", "booked"),
    ])
}

#[test]
fn test_healthy_snapshot_passes() {
    let pipeline = Pipeline::new(json!([reservation(
        "RES-1",
        "Room-A",
        "2025-01-02T09:00:00Z",
        "2025-01-02T10:00:00Z",
        "booked"
    )]));
    let notifier = Arc::new(RecordingNotifier::new());
    let monitor = pipeline.monitor(notifier.clone());

    let summary = monitor.call().unwrap();

    assert_eq!(summary.records_checked, 1);
    assert_eq!(pipeline.metrics.get(INTEGRITY_PASS_METRIC), 1);
    assert_eq!(notifier.call_count(), 0);
}

#[test]
fn test_overlapping_snapshot_notifies_once() {
    let pipeline = Pipeline::new(overlapping_pair());
    let buffer = SharedBuffer::default();
    let monitor = pipeline.monitor(Arc::new(StdoutNotifier::with_writer(buffer.clone())));

    let err = monitor.call().unwrap_err();

    match &err {
        ActionError::IntegrityViolation(violation) => {
            assert_eq!(violation.issues().len(), 1);
            assert!(violation.to_string().contains("RES-1"));
            assert!(violation.to_string().contains("RES-2"));
        }
        other => panic!("expected integrity violation, got {other:?}"),
    }
    assert_eq!(pipeline.metrics.get(INTEGRITY_FAIL_METRIC), 1);
    assert_eq!(
        buffer.contents(),
        "[Notifier] Overlapping bookings: RES-1 vs RES-2\n"
    );
}

#[test]
fn test_scheduler_retries_monitor_until_snapshot_is_fixed() {
    let pipeline = Pipeline::new(overlapping_pair());
    let notifier = Arc::new(RecordingNotifier::new());
    let monitor = pipeline.monitor(notifier.clone());

    let mut scheduler = Scheduler::new(pipeline.clock.clone()).with_metrics(pipeline.metrics.clone());
    let handle = scheduler
        .register(
            JobSpec::new("integrity-monitor", 60)
                .retry_backoff_secs(5)
                .action(monitor.into_action()),
        )
        .unwrap();

    let first = scheduler.tick(t0());
    assert_eq!(
        first.transition_of(handle),
        Some(JobTransition::RetryScheduled {
            attempt: 1,
            backoff: Duration::seconds(5)
        })
    );
    assert!(scheduler
        .job(handle)
        .unwrap()
        .last_error
        .as_deref()
        .unwrap()
        .contains("Overlapping bookings: RES-1 vs RES-2"));

    // Back-to-back bookings share only a boundary instant
    pipeline.write(json!([
        reservation("RES-1", "Room-A", "2025-01-02T09:00:00Z", "2025-01-02T10:00:00Z", "booked"),
        reservation("RES-2", "Room-A", "2025-01-02T10:00:00Z", "2025-01-02T10:30:00Z", "booked"),
    ]));

    assert!(scheduler.tick(t0() + Duration::seconds(4)).is_empty());
    let retry = scheduler.tick(t0() + Duration::seconds(5));
    assert_eq!(retry.transition_of(handle), Some(JobTransition::Succeeded));

    let job = scheduler.job(handle).unwrap();
    assert_eq!(job.failures, 0);
    assert_eq!(job.next_run_at, t0() + Duration::seconds(65));

    assert_eq!(notifier.call_count(), 1);
    let metrics = pipeline.metrics.snapshot();
    assert_eq!(metrics.get(INTEGRITY_FAIL_METRIC), Some(&1));
    assert_eq!(metrics.get(INTEGRITY_PASS_METRIC), Some(&1));
    assert_eq!(metrics.get("scheduler.integrity-monitor.retried"), Some(&1));
    assert_eq!(metrics.get("scheduler.integrity-monitor.succeeded"), Some(&1));
}

#[test]
fn test_booking_becomes_stale_after_its_end() {
    let pipeline = Pipeline::new(json!([reservation(
        "RES-1",
        "Room-A",
        "2025-01-02T08:30:00Z",
        "2025-01-02T09:00:00Z",
        "booked"
    )]));
    let notifier = Arc::new(RecordingNotifier::new());
    let monitor = pipeline.monitor(notifier.clone());

    assert!(monitor.call().is_ok());

    pipeline.clock.set(Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap());
    assert!(monitor.call().is_ok(), "ending exactly now is not stale");

    pipeline.clock.advance(Duration::seconds(1));
    let err = monitor.call().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Integrity violation: Stale booking not closed: RES-1"
    );
    assert_eq!(
        notifier.batches(),
        vec![vec!["Stale booking not closed: RES-1".to_string()]]
    );
    assert_eq!(pipeline.metrics.get(INTEGRITY_PASS_METRIC), 2);
    assert_eq!(pipeline.metrics.get(INTEGRITY_FAIL_METRIC), 1);
}

#[test]
fn test_null_snapshot_is_empty() {
    let pipeline = Pipeline::new(Value::Null);
    let monitor = pipeline.monitor(Arc::new(RecordingNotifier::new()));

    assert_eq!(monitor.call().unwrap().records_checked, 0);
    assert_eq!(pipeline.metrics.get(INTEGRITY_PASS_METRIC), 1);
}

#[test]
fn test_unreadable_snapshot_is_absorbed_by_scheduler() {
    let pipeline = Pipeline::new(json!([]));
    fs::write(pipeline.file.path(), "not json").unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let monitor = pipeline.monitor(notifier.clone());

    let mut scheduler = Scheduler::new(pipeline.clock.clone());
    let handle = scheduler
        .register(
            JobSpec::new("integrity-monitor", 60)
                .max_retries(0)
                .action(monitor.into_action()),
        )
        .unwrap();

    let report = scheduler.tick(t0());

    assert_eq!(
        report.transition_of(handle),
        Some(JobTransition::Exhausted { failures: 1 })
    );
    assert_eq!(
        scheduler.job(handle).unwrap().next_run_at,
        t0() + Duration::seconds(60)
    );
    assert_eq!(notifier.call_count(), 0);
    assert!(pipeline.metrics.snapshot().is_empty());
}

#[test]
fn test_checks_are_idempotent_on_unchanged_snapshot() {
    let pipeline = Pipeline::new(json!([
        reservation("RES-1", "Room-A", "2025-01-02T09:00:00Z", "2025-01-02T08:00:00Z", "booked"),
        reservation("RES-2", "Room-B", "2025-01-01T09:00:00Z", "2025-01-01T10:00:00Z", "booked"),
    ]));
    let notifier = Arc::new(RecordingNotifier::new());
    let monitor = pipeline.monitor(notifier.clone());

    let first = monitor.call().unwrap_err().to_string();
    let second = monitor.call().unwrap_err().to_string();

    assert_eq!(first, second);
    let batches = notifier.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], batches[1]);
    assert_eq!(
        batches[0],
        vec![
            "Invalid timeframe: RES-1".to_string(),
            "Stale booking not closed: RES-2".to_string(),
        ]
    );
}
