//! Process environment configuration.
//! Read once on first access through `ENV_CONFIG`; everything else in the crate takes
//! explicit arguments so it can be used without touching the environment.
use lazy_static::lazy_static;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    pub beacon_url: Option<String>,
    pub request_timeout: Duration,
    pub log_json: bool,
}

impl EnvConfig {
    /// Builds the config from a lookup function, `std::env::var` in production.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let request_timeout = get("BEACON_REQUEST_TIMEOUT_SECS")
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        Self {
            beacon_url: get("BEACON_URL"),
            request_timeout,
            log_json: get("LOG_JSON").map_or(false, |value| parse_bool(&value)),
        }
    }
}

lazy_static! {
    pub static ref ENV_CONFIG: EnvConfig = EnvConfig::from_vars(get_env_var);
}

pub fn get_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
