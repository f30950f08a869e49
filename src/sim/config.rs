use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Completed processes after which the run stops.
    pub num_processes: usize,
    /// Mean arrivals per unit time.
    pub arrival_rate: f64,
    pub mean_service_time: f64,
    /// Spacing of ready-queue length samples.
    pub query_interval: f64,
    /// Round robin time slice; unused by HRRN.
    pub quantum: Option<f64>,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_processes: 10_000,
            arrival_rate: 10.0,
            mean_service_time: 0.06,
            query_interval: 0.01,
            quantum: None,
            seed: 0,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the parameters every policy needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_processes == 0 {
            return Err(ConfigError::NoProcesses);
        }
        positive("arrival_rate", self.arrival_rate)?;
        positive("mean_service_time", self.mean_service_time)?;
        positive("query_interval", self.query_interval)?;
        if let Some(quantum) = self.quantum {
            positive("quantum", quantum)?;
        }
        Ok(())
    }

    /// The validated round robin quantum.
    pub fn require_quantum(&self) -> Result<f64, ConfigError> {
        let quantum = self.quantum.ok_or(ConfigError::MissingQuantum)?;
        positive("quantum", quantum)?;
        Ok(quantum)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().expect("default config");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str("arrival_rate = 25.0\nquantum = 0.01\n").unwrap();
        assert_eq!(
            config,
            SimConfig {
                arrival_rate: 25.0,
                quantum: Some(0.01),
                ..SimConfig::default()
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SimConfig::from_toml_str("arival_rate = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn non_positive_fields_fail_fast() {
        let cases = [
            ("arrival_rate", SimConfig { arrival_rate: 0.0, ..SimConfig::default() }),
            ("mean_service_time", SimConfig { mean_service_time: -1.0, ..SimConfig::default() }),
            ("query_interval", SimConfig { query_interval: f64::NAN, ..SimConfig::default() }),
            ("quantum", SimConfig { quantum: Some(0.0), ..SimConfig::default() }),
        ];
        for (expected, config) in cases {
            match config.validate() {
                Err(ConfigError::NonPositive { field, .. }) => assert_eq!(field, expected),
                other => panic!("{expected}: unexpected {other:?}"),
            }
        }

        let none = SimConfig { num_processes: 0, ..SimConfig::default() };
        assert!(matches!(none.validate(), Err(ConfigError::NoProcesses)));
    }

    #[test]
    fn quantum_required_for_round_robin() {
        assert!(matches!(
            SimConfig::default().require_quantum(),
            Err(ConfigError::MissingQuantum)
        ));
        let config = SimConfig { quantum: Some(0.5), ..SimConfig::default() };
        assert_eq!(config.require_quantum().unwrap(), 0.5);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "num_processes = 3\nseed = 9").unwrap();
        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.num_processes, 3);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SimConfig::load("/nonexistent/sched.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sched.toml"));
    }
}
