use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use serde::{Serialize, Deserialize};
use tracing::debug;
use tracing_subscriber::{
    fmt as fmt_layer,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::core::PredictorError;

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: LogLevel,
}

/// Log levels matching tracing's levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        write!(f, "{}", level)
    }
}

impl FromStr for LogLevel {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(PredictorError::Config(format!("unknown log level '{}'", other))),
        }
    }
}

/// Performance tracking for operations
pub struct PerformanceTracker {
    start_time: Instant,
    operation_name: String,
}

impl PerformanceTracker {
    pub fn new(operation_name: &str) -> Self {
        Self {
            start_time: Instant::now(),
            operation_name: operation_name.to_string(),
        }
    }
}

impl Drop for PerformanceTracker {
    fn drop(&mut self) {
        let duration = self.start_time.elapsed();
        debug!(
            operation = %self.operation_name,
            duration_ms = %duration.as_millis(),
            "Operation completed"
        );
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr; stdout is reserved for results. Calling this twice is harmless.
pub fn init_tracing(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let layer = fmt_layer::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests, embedding callers)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_repeated_initialization() {
        let config = TelemetryConfig {
            log_level: LogLevel::Debug,
        };
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn test_performance_tracker() {
        {
            let _tracker = PerformanceTracker::new("test_operation");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        // Performance will be logged via drop
    }
}
