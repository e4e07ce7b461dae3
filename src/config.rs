use crate::core::slots::DEFAULT_UNAVAILABLE_PROBABILITY;
use crate::core::{BookingState, RandomAvailability, SystemClock};
use crate::error::{AppError, Result};
use crate::runtime::{SimulatedBackend, Timings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tunables for a booking session, read from YAML. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub unavailable_probability: f64,
    pub submit_delay_ms: u64,
    pub reset_delay_ms: u64,
    pub message_ttl_ms: u64,
    pub seed: Option<u64>,
    pub simulate_failure: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            unavailable_probability: DEFAULT_UNAVAILABLE_PROBABILITY,
            submit_delay_ms: 2000,
            reset_delay_ms: 3000,
            message_ttl_ms: 5000,
            seed: None,
            simulate_failure: false,
        }
    }
}

impl BookingConfig {
    pub fn from_yaml(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.unavailable_probability) {
            return Err(AppError::Config {
                message: format!(
                    "unavailable_probability must be within 0..=1, got {}",
                    self.unavailable_probability
                ),
            });
        }
        Ok(())
    }

    pub fn timings(&self) -> Timings {
        Timings {
            submit_delay: Duration::from_millis(self.submit_delay_ms),
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            message_ttl: Duration::from_millis(self.message_ttl_ms),
        }
    }

    pub fn availability(&self) -> RandomAvailability {
        match self.seed {
            Some(seed) => RandomAvailability::seeded(seed, self.unavailable_probability),
            None => RandomAvailability::new(self.unavailable_probability),
        }
    }

    pub fn backend(&self) -> SimulatedBackend {
        if self.simulate_failure {
            SimulatedBackend::failing()
        } else {
            SimulatedBackend::new()
        }
    }

    pub fn build_state(&self) -> BookingState {
        BookingState::new(SystemClock, self.availability())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = BookingConfig::from_yaml("{}").expect("parse");
        assert_eq!(config, BookingConfig::default());
        assert_eq!(config.timings(), Timings::default());
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = BookingConfig::from_yaml("submit_delay_ms: 10\nseed: 99\n").expect("parse");
        assert_eq!(config.submit_delay_ms, 10);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.reset_delay_ms, 3000);
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        let err = BookingConfig::from_yaml("unavailable_probability: 1.5").expect_err("invalid");
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "message_ttl_ms: 750\nsimulate_failure: true").expect("write");
        let config = BookingConfig::load(file.path()).expect("load");
        assert_eq!(config.message_ttl_ms, 750);
        assert!(config.simulate_failure);
    }

    #[test]
    fn malformed_yaml_surfaces_parse_error() {
        let err = BookingConfig::from_yaml("seed: [not a number").expect_err("invalid");
        assert!(matches!(err, AppError::Yaml(_)));
    }
}
