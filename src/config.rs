//! # Fingerprint Configuration
//!
//! One `FingerprintConfig` applies to a whole run. It is validated once,
//! before any molecule is touched, by [`FingerprintConfig::validate`]
//! (called from `Fingerprinter::new`).
//!
//! ```json
//! { "mode": "linear", "min_radius": 1, "max_radius": 4, "length": 1024,
//!   "number_active_bits": 2, "number_bit_pairs": 4 }
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Strategy enums
// ============================================================================

/// Which substructures feed the fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// Simple paths of `min_radius..=max_radius` atoms.
    #[default]
    Linear,
    /// Iteratively refined atom neighborhoods.
    Morgan,
}

/// How work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Sequential,
    /// Per-atom and per-molecule data parallelism. Runs sequentially when
    /// the `parallel` feature is disabled.
    #[default]
    Parallel,
}

/// Adjacency shape built for each molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyLayout {
    /// Padded per-atom neighbor rows, O(degree) memory.
    #[default]
    NeighborTable,
    /// `n × n` bond-order matrix, O(n²) memory.
    Dense,
}

// ============================================================================
// FingerprintConfig
// ============================================================================

/// Parameters of a fingerprinting run.
///
/// `max_radius` bounds the `D^L` growth of path enumeration; choosing it is
/// the caller's responsibility; nothing is truncated silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    pub mode: FingerprintMode,
    /// Minimal fragment length in atoms (linear) or first contributing
    /// refinement round (Morgan).
    pub min_radius: usize,
    pub max_radius: usize,
    /// Bit vector length. Power of two.
    pub length: usize,
    /// Bits activated per hash.
    pub number_active_bits: usize,
    /// Cap on the repeat count encoded per fragment.
    pub number_bit_pairs: usize,
    pub include_hydrogens: bool,
    pub execution: Execution,
    pub adjacency: AdjacencyLayout,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            mode: FingerprintMode::Linear,
            min_radius: 1,
            max_radius: 4,
            length: 1024,
            number_active_bits: 2,
            number_bit_pairs: 4,
            include_hydrogens: false,
            execution: Execution::default(),
            adjacency: AdjacencyLayout::default(),
        }
    }
}

impl FingerprintConfig {
    pub fn linear() -> Self {
        Self::default()
    }

    pub fn morgan() -> Self {
        Self { mode: FingerprintMode::Morgan, ..Self::default() }
    }

    pub fn with_radius(mut self, min_radius: usize, max_radius: usize) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_active_bits(mut self, number_active_bits: usize) -> Self {
        self.number_active_bits = number_active_bits;
        self
    }

    pub fn with_bit_pairs(mut self, number_bit_pairs: usize) -> Self {
        self.number_bit_pairs = number_bit_pairs;
        self
    }

    pub fn with_hydrogens(mut self, include_hydrogens: bool) -> Self {
        self.include_hydrogens = include_hydrogens;
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_adjacency(mut self, adjacency: AdjacencyLayout) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Parse and validate a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_radius < 1 {
            return Err(Error::Configuration("min_radius must be at least 1".into()));
        }
        if self.max_radius < self.min_radius {
            return Err(Error::Configuration(format!(
                "max_radius ({}) is smaller than min_radius ({})",
                self.max_radius, self.min_radius
            )));
        }
        if !self.length.is_power_of_two() {
            return Err(Error::Configuration(format!(
                "length {} is not a power of two",
                self.length
            )));
        }
        if self.number_active_bits < 1 {
            return Err(Error::Configuration("number_active_bits must be at least 1".into()));
        }
        if self.number_bit_pairs < 1 {
            return Err(Error::Configuration("number_bit_pairs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FingerprintConfig::default().validate().is_ok());
        assert!(FingerprintConfig::morgan().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_power_of_two_length() {
        for length in [0, 3, 1000] {
            let err = FingerprintConfig::default().with_length(length).validate();
            assert!(matches!(err, Err(Error::Configuration(_))), "length {length}");
        }
    }

    #[test]
    fn test_rejects_inverted_radius() {
        let err = FingerprintConfig::default().with_radius(3, 2).validate();
        assert!(matches!(err, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_bounds() {
        let cfg = FingerprintConfig::default();
        assert!(cfg.clone().with_radius(0, 2).validate().is_err());
        assert!(cfg.clone().with_active_bits(0).validate().is_err());
        assert!(cfg.with_bit_pairs(0).validate().is_err());
    }

    #[test]
    fn test_json_defaults_fill_missing_keys() {
        let cfg = FingerprintConfig::from_json(r#"{"mode": "morgan", "max_radius": 3}"#).unwrap();
        assert_eq!(cfg.mode, FingerprintMode::Morgan);
        assert_eq!(cfg.max_radius, 3);
        assert_eq!(cfg.length, 1024);
        assert_eq!(cfg.adjacency, AdjacencyLayout::NeighborTable);
    }

    #[test]
    fn test_json_validates() {
        let err = FingerprintConfig::from_json(r#"{"length": 1000}"#);
        assert!(matches!(err, Err(Error::Configuration(_))));
        let err = FingerprintConfig::from_json("{not json");
        assert!(matches!(err, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = FingerprintConfig::morgan()
            .with_radius(2, 3)
            .with_execution(Execution::Sequential)
            .with_adjacency(AdjacencyLayout::Dense);
        let json = cfg.to_json().unwrap();
        assert!(json.contains("\"dense\""));
        assert_eq!(FingerprintConfig::from_json(&json).unwrap(), cfg);
    }
}
