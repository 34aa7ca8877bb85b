use std::time::Duration;

use serde_json::json;

use crate::logging::log_error;

pub const LOG_STREAM_ENV: &str = "AWS_LAMBDA_LOG_STREAM_NAME";
pub const DELIVERY_TIMEOUT_ENV: &str = "EXPORT_RESOLVER_DELIVERY_TIMEOUT_SECS";
pub const DEFAULT_LOG_STREAM_NAME: &str = "unknown";
pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub log_stream_name: String,
    pub delivery_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            log_stream_name: DEFAULT_LOG_STREAM_NAME.to_string(),
            delivery_timeout: Duration::from_secs(DEFAULT_DELIVERY_TIMEOUT_SECS),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Never fails: an invalid value is logged and replaced by its default,
    /// so every invocation can still report back to CloudFormation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_stream_name = lookup(LOG_STREAM_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_STREAM_NAME.to_string());

        let delivery_timeout_secs = match lookup(DELIVERY_TIMEOUT_ENV) {
            None => DEFAULT_DELIVERY_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    log_error(
                        "config_invalid",
                        json!({
                            "variable": DELIVERY_TIMEOUT_ENV,
                            "value": raw,
                            "error_message": "must be a positive integer",
                            "fallback": DEFAULT_DELIVERY_TIMEOUT_SECS,
                        }),
                    );
                    DEFAULT_DELIVERY_TIMEOUT_SECS
                }
            },
        };

        Self {
            log_stream_name,
            delivery_timeout: Duration::from_secs(delivery_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults_when_unset() {
        let config = ResolverConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn reads_log_stream_and_timeout() {
        let config = ResolverConfig::from_lookup(lookup_from(&[
            (LOG_STREAM_ENV, "2026/10/19/[$LATEST]abc"),
            (DELIVERY_TIMEOUT_ENV, "5"),
        ]));

        assert_eq!(config.log_stream_name, "2026/10/19/[$LATEST]abc");
        assert_eq!(config.delivery_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        for raw in ["0", "abc", "-5"] {
            let config = ResolverConfig::from_lookup(lookup_from(&[
                (LOG_STREAM_ENV, "stream"),
                (DELIVERY_TIMEOUT_ENV, raw),
            ]));

            assert_eq!(config.log_stream_name, "stream");
            assert_eq!(
                config.delivery_timeout,
                Duration::from_secs(DEFAULT_DELIVERY_TIMEOUT_SECS)
            );
        }
    }
}
