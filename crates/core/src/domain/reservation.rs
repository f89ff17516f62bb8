// Reservation Record - read-only view of one entry in a source snapshot

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::domain::error::{DomainError, Result};

/// Loosely-typed record as delivered by a RecordSource
pub type RawRecord = serde_json::Map<String, Value>;

/// Status of an active booking
pub const BOOKED_STATUS: &str = "booked";

// Accepted when a timestamp carries no offset (interpreted as UTC)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Reservation fields the integrity checks need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    pub id: String,
    pub resource_name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: Option<String>,
}

impl ReservationRecord {
    /// Read a record by field name
    ///
    /// `starts_at` and `ends_at` are required; `id`, `resource_name` and
    /// `status` may be absent.
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        let id = text_field(raw, "id").unwrap_or_default();
        let starts_at = time_field(raw, &id, "starts_at")?;
        let ends_at = time_field(raw, &id, "ends_at")?;

        Ok(Self {
            resource_name: text_field(raw, "resource_name"),
            status: text_field(raw, "status"),
            id,
            starts_at,
            ends_at,
        })
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(raw) => Self::from_raw(raw),
            other => Err(DomainError::NotAnObject(other.to_string())),
        }
    }

    pub fn is_booked(&self) -> bool {
        self.status.as_deref() == Some(BOOKED_STATUS)
    }
}

/// Parse an RFC 3339 timestamp, or a naive one taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn text_field(raw: &RawRecord, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn time_field(raw: &RawRecord, id: &str, field: &'static str) -> Result<DateTime<Utc>> {
    let missing = || DomainError::MissingField {
        id: id.to_string(),
        field,
    };
    let value = raw.get(field).ok_or_else(missing)?;
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Null => return Err(missing()),
        other => {
            return Err(DomainError::InvalidTimestamp {
                id: id.to_string(),
                field,
                value: other.to_string(),
            })
        }
    };

    parse_timestamp(text).ok_or_else(|| DomainError::InvalidTimestamp {
        id: id.to_string(),
        field,
        value: text.to_string(),
    })
}
