//! Daemon configuration, read from environment variables
//!
//! | Variable                        | Default                          |
//! |---------------------------------|----------------------------------|
//! | `WARDEN_RESERVATIONS_PATH`      | `~/.warden/reservations.json`    |
//! | `WARDEN_CHECK_INTERVAL_SECS`    | 60                               |
//! | `WARDEN_MAX_RETRIES`            | 3                                |
//! | `WARDEN_RETRY_BACKOFF_SECS`     | 5                                |
//! | `WARDEN_LOOP_SLEEP_MS`          | 1000                             |
//! | `WARDEN_METRICS_INTERVAL_SECS`  | 300                              |
//! | `WARDEN_LOG_FORMAT`             | `pretty` (`json` for production) |
//! | `WARDEN_LOG_DIR`                | unset (no log file)              |

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use warden_core::application::constants::{
    DEFAULT_LOOP_SLEEP, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_SECS,
};

const DEFAULT_RESERVATIONS_PATH: &str = "~/.warden/reservations.json";
const DEFAULT_CHECK_INTERVAL_SECS: i64 = 60;
const DEFAULT_METRICS_INTERVAL_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Directory for a daily rolling log file
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let format = match lookup("WARDEN_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let dir = lookup("WARDEN_LOG_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(|d| PathBuf::from(shellexpand::tilde(&d).into_owned()));

        Self { format, dir }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub reservations_path: PathBuf,
    pub check_interval_secs: i64,
    pub max_retries: u32,
    pub retry_backoff_secs: i64,
    pub loop_sleep: Duration,
    pub metrics_interval_secs: i64,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Build from any key lookup; unset keys take defaults, malformed ones are errors
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let reservations_path = lookup("WARDEN_RESERVATIONS_PATH")
            .unwrap_or_else(|| DEFAULT_RESERVATIONS_PATH.to_string());
        let loop_sleep_ms = parse_var(
            &lookup,
            "WARDEN_LOOP_SLEEP_MS",
            DEFAULT_LOOP_SLEEP.as_millis() as u64,
        )?;

        Ok(Self {
            reservations_path: PathBuf::from(shellexpand::tilde(&reservations_path).into_owned()),
            check_interval_secs: parse_var(
                &lookup,
                "WARDEN_CHECK_INTERVAL_SECS",
                DEFAULT_CHECK_INTERVAL_SECS,
            )?,
            max_retries: parse_var(&lookup, "WARDEN_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            retry_backoff_secs: parse_var(
                &lookup,
                "WARDEN_RETRY_BACKOFF_SECS",
                DEFAULT_RETRY_BACKOFF_SECS,
            )?,
            loop_sleep: Duration::from_millis(loop_sleep_ms),
            metrics_interval_secs: parse_var(
                &lookup,
                "WARDEN_METRICS_INTERVAL_SECS",
                DEFAULT_METRICS_INTERVAL_SECS,
            )?,
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{}={:?} is invalid: {}", key, raw, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DaemonConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.check_interval_secs, 60);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff_secs, 5);
        assert_eq!(config.loop_sleep, Duration::from_secs(1));
        assert_eq!(config.metrics_interval_secs, 300);
        assert!(config.reservations_path.ends_with(".warden/reservations.json"));
    }

    #[test]
    fn test_overrides() {
        let config = DaemonConfig::from_lookup(lookup(&[
            ("WARDEN_RESERVATIONS_PATH", "/data/reservations.json"),
            ("WARDEN_CHECK_INTERVAL_SECS", "10"),
            ("WARDEN_MAX_RETRIES", "0"),
            ("WARDEN_RETRY_BACKOFF_SECS", " 2 "),
            ("WARDEN_LOOP_SLEEP_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(
            config.reservations_path,
            PathBuf::from("/data/reservations.json")
        );
        assert_eq!(config.check_interval_secs, 10);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_backoff_secs, 2);
        assert_eq!(config.loop_sleep, Duration::from_millis(250));
    }

    #[test]
    fn test_non_positive_intervals_are_accepted() {
        let config = DaemonConfig::from_lookup(lookup(&[
            ("WARDEN_CHECK_INTERVAL_SECS", "0"),
            ("WARDEN_RETRY_BACKOFF_SECS", "-5"),
        ]))
        .unwrap();

        assert_eq!(config.check_interval_secs, 0);
        assert_eq!(config.retry_backoff_secs, -5);
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let err = DaemonConfig::from_lookup(lookup(&[("WARDEN_MAX_RETRIES", "three")]))
            .unwrap_err();
        assert!(err.to_string().contains("WARDEN_MAX_RETRIES"));

        let err = DaemonConfig::from_lookup(lookup(&[("WARDEN_MAX_RETRIES", "-1")]))
            .unwrap_err();
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_log_config() {
        let config = LogConfig::from_lookup(lookup(&[
            ("WARDEN_LOG_FORMAT", "json"),
            ("WARDEN_LOG_DIR", "/var/log/warden"),
        ]));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.dir, Some(PathBuf::from("/var/log/warden")));

        let config = LogConfig::from_lookup(lookup(&[("WARDEN_LOG_DIR", " ")]));
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.dir, None);
    }
}
