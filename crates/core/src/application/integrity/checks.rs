// Integrity check passes
//
// Each pass is independent and order-insensitive; a record may trip several.
// Issue order follows each pass's own scan order.

use chrono::{DateTime, Utc};

use crate::domain::ReservationRecord;

/// Records whose window is empty or inverted (`ends_at <= starts_at`)
pub fn check_timeframe(records: &[ReservationRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.ends_at <= r.starts_at)
        .map(|r| format!("Invalid timeframe: {}", r.id))
        .collect()
}

/// Every unordered pair of booked records on one resource whose windows intersect
///
/// Windows are half-open, so a shared boundary instant is not an overlap.
pub fn check_overlap(records: &[ReservationRecord]) -> Vec<String> {
    let booked: Vec<&ReservationRecord> = records.iter().filter(|r| r.is_booked()).collect();
    let mut issues = Vec::new();

    for (i, a) in booked.iter().enumerate() {
        for b in &booked[i + 1..] {
            if a.resource_name == b.resource_name && overlaps(a, b) {
                issues.push(format!("Overlapping bookings: {} vs {}", a.id, b.id));
            }
        }
    }
    issues
}

/// Booked records that ended strictly before `now`
pub fn check_stale(records: &[ReservationRecord], now: DateTime<Utc>) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.is_booked() && r.ends_at < now)
        .map(|r| format!("Stale booking not closed: {}", r.id))
        .collect()
}

fn overlaps(a: &ReservationRecord, b: &ReservationRecord) -> bool {
    a.starts_at < b.ends_at && b.starts_at < a.ends_at
}
