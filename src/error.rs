use std::path::PathBuf;
use thiserror::Error;

/// Rejected simulation parameters, reported before the run loop starts.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("process count must be positive")]
    NoProcesses,

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("round robin requires a time quantum")]
    MissingQuantum,

    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid arrival-rate sweep {start}..={end}")]
    InvalidSweep { start: u32, end: u32 },
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
