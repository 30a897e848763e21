//! Ledger call policy: how long to wait and how often to retry.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeout and retry policy for ledger calls.
///
/// Durations travel as integer milliseconds in JSON and in the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Bound on each ledger call and on the wait for confirmation.
    #[serde(rename = "confirmation_timeout_ms", with = "millis")]
    pub confirmation_timeout: Duration,
    /// Extra attempts after a retryable failure.
    pub max_retries: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    #[serde(rename = "retry_backoff_ms", with = "millis")]
    pub retry_backoff: Duration,
    /// Delay between confirmation polls.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(200),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by any `PREDICATE_LEDGER_*` variables that parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            confirmation_timeout: env_millis("PREDICATE_LEDGER_TIMEOUT_MS")
                .unwrap_or(defaults.confirmation_timeout),
            max_retries: env::var("PREDICATE_LEDGER_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.max_retries),
            retry_backoff: env_millis("PREDICATE_LEDGER_BACKOFF_MS")
                .unwrap_or(defaults.retry_backoff),
            poll_interval: env_millis("PREDICATE_LEDGER_POLL_MS")
                .unwrap_or(defaults.poll_interval),
        }
    }

    /// Parse a JSON policy; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_partial_override() {
        let config = LedgerConfig::from_json(r#"{"max_retries": 7, "poll_interval_ms": 5}"#).unwrap();
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert_eq!(config.confirmation_timeout, LedgerConfig::default().confirmation_timeout);
    }

    #[test]
    fn test_json_round_trip_uses_millis() {
        let config = LedgerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"confirmation_timeout_ms\":30000"));
        assert_eq!(LedgerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_rejects_bad_types() {
        assert!(LedgerConfig::from_json(r#"{"max_retries": "many"}"#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        // Only this test touches these variables.
        env::set_var("PREDICATE_LEDGER_MAX_RETRIES", "9");
        env::set_var("PREDICATE_LEDGER_BACKOFF_MS", "not-a-number");
        let config = LedgerConfig::from_env();
        env::remove_var("PREDICATE_LEDGER_MAX_RETRIES");
        env::remove_var("PREDICATE_LEDGER_BACKOFF_MS");

        assert_eq!(config.max_retries, 9);
        assert_eq!(config.retry_backoff, LedgerConfig::default().retry_backoff);
    }
}
