//! Application state and configuration for the doccheck API

use std::sync::Arc;
use std::time::Duration;

use rule_engine::RuleEngine;

/// Process-wide configuration, read once at startup and passed in
/// explicitly. Nothing here mutates after boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_document_bytes: usize,
    pub rule_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            max_document_bytes: 20 * 1024 * 1024,
            rule_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            port: env_parse("PORT", defaults.port),
            max_document_bytes: env_parse(
                "DOCCHECK_MAX_DOCUMENT_BYTES",
                defaults.max_document_bytes,
            ),
            rule_timeout: Duration::from_millis(env_parse(
                "DOCCHECK_RULE_TIMEOUT_MS",
                defaults.rule_timeout.as_millis() as u64,
            )),
            request_timeout: Duration::from_millis(env_parse(
                "DOCCHECK_REQUEST_TIMEOUT_MS",
                defaults.request_timeout.as_millis() as u64,
            )),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub struct AppState {
    pub config: Config,
    pub engine: Arc<RuleEngine>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            engine: Arc::new(RuleEngine::new()),
        }
    }
}
