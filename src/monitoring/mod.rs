mod telemetry;

pub use telemetry::{
    LogLevel,
    PerformanceTracker,
    TelemetryConfig,
};

/// Initialize telemetry with custom configuration
pub fn init_telemetry(config: TelemetryConfig) {
    telemetry::init_tracing(&config);
}

/// Convenience macro for performance tracking
#[macro_export]
macro_rules! track_performance {
    ($name:expr) => {
        let _tracker = $crate::monitoring::PerformanceTracker::new($name);
    };
}

