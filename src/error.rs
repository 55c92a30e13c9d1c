use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// The raw batch does not match the expected tabular shape at all; nothing
/// row-level can be salvaged and the whole run must be abandoned.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read job-posting batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("batch does not match the job-posting schema: {0}")]
    Malformed(#[from] csv::Error),
    #[error("batch is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Caller misuse of the trend smoother: the moving-average window must be a
/// positive number of buckets.
#[derive(Debug, thiserror::Error)]
#[error("moving-average window must be >= 1, got {window}")]
pub struct InvalidWindowError {
    pub window: usize,
}

/// Crate-level aggregate for hosting applications that want one error type
/// across configuration, telemetry, and pipeline failures.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("analytics error: {0}")]
    Window(#[from] InvalidWindowError),
}
