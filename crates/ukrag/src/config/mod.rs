use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "UK-RAG-Dashboard/1.0";

/// Top-level configuration for the fetcher. Everything is environment-driven
/// with sensible defaults; no config file is required.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let user_agent =
            env::var("APP_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let timeout_cap = match env::var("APP_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout { value: raw })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            http: HttpConfig {
                user_agent,
                timeout_cap,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Optional cap applied over each source's configured timeout.
    pub timeout_cap: Option<Duration>,
}

impl HttpConfig {
    /// Per-request timeout: the source's own value, capped when a cap is set.
    pub fn effective_timeout(&self, source_timeout: Duration) -> Duration {
        match self.timeout_cap {
            Some(cap) => source_timeout.min(cap),
            None => source_timeout,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout { value } => {
                write!(f, "APP_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
