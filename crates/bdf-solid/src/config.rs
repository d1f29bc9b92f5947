//! Model building configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolidError};

/// Areas and face-normal lengths at or below this value are degenerate.
pub const DEFAULT_DEGENERATE_TOLERANCE: f64 = 1e-12;

/// Options controlling how a model is built and queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Threshold used when an area or normal length becomes a divisor
    pub degenerate_tolerance: f64,
    /// Skip bulk cards other than GRID/MAT1/PSOLID/solids instead of failing
    pub skip_unsupported_cards: bool,
    /// Write diagnostic lines to stderr
    pub verbose: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            degenerate_tolerance: DEFAULT_DEGENERATE_TOLERANCE,
            skip_unsupported_cards: true,
            verbose: false,
        }
    }
}

impl ModelConfig {
    /// Parse a JSON configuration; missing keys take their default values.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.degenerate_tolerance.is_finite() || self.degenerate_tolerance < 0.0 {
            return Err(SolidError::Config(format!(
                "degenerate_tolerance must be a finite non-negative number, got {}",
                self.degenerate_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ModelConfig::from_json_str(r#"{ "verbose": true }"#).unwrap();
        assert!(config.verbose);
        assert!(config.skip_unsupported_cards);
        assert_eq!(config.degenerate_tolerance, DEFAULT_DEGENERATE_TOLERANCE);
    }

    #[test]
    fn rejects_negative_tolerance() {
        let err = ModelConfig::from_json_str(r#"{ "degenerate_tolerance": -1.0 }"#)
            .expect_err("negative tolerance");
        assert!(matches!(err, SolidError::Config(_)));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ModelConfig::from_json_str("{ verbose: yes").expect_err("bad json");
        assert!(matches!(err, SolidError::Json(_)));
    }
}
