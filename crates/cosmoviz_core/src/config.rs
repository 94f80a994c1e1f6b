//! Generation configuration
//!
//! Everything here has a default matching the reference datasets, so an empty
//! YAML document is a valid configuration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::grid::log_space;
use crate::model::{ScaleAxis, ScaleKind};

/// Log-spaced scale axis definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    pub start_exp: f64,
    pub stop_exp: f64,
    pub points: usize,
}

impl ScaleSpec {
    pub const SEPARATION: ScaleSpec = ScaleSpec {
        start_exp: -1.0,
        stop_exp: 2.0,
        points: 40,
    };

    pub const MASS: ScaleSpec = ScaleSpec {
        start_exp: 10.0,
        stop_exp: 16.0,
        points: 35,
    };

    pub fn axis(&self, kind: ScaleKind) -> ScaleAxis {
        log_space(kind, self.start_exp, self.stop_exp, self.points)
    }
}

/// Scale block as written in a config file. Absent fields fall back to the
/// default of the axis the block belongs to.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScaleOverride {
    start_exp: Option<f64>,
    stop_exp: Option<f64>,
    points: Option<usize>,
}

impl ScaleOverride {
    fn over(self, base: ScaleSpec) -> ScaleSpec {
        ScaleSpec {
            start_exp: self.start_exp.unwrap_or(base.start_exp),
            stop_exp: self.stop_exp.unwrap_or(base.stop_exp),
            points: self.points.unwrap_or(base.points),
        }
    }
}

fn separation_spec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ScaleSpec, D::Error> {
    ScaleOverride::deserialize(deserializer).map(|block| block.over(ScaleSpec::SEPARATION))
}

fn mass_spec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ScaleSpec, D::Error> {
    ScaleOverride::deserialize(deserializer).map(|block| block.over(ScaleSpec::MASS))
}

/// Relative Gaussian noise levels (standard deviations of the multiplicative
/// perturbation) for each kind of row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub full_grid_xi: f64,
    pub full_grid_nm: f64,
    /// Reference row of a one-at-a-time sweep, both observables
    pub fiducial: f64,
    pub swept_xi: f64,
    pub swept_nm: f64,
    /// Amplitude of the `sin(2 log10 r)` term on swept xi rows, scaled by position
    pub oscillation: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            full_grid_xi: 0.02,
            full_grid_nm: 0.05,
            fiducial: 0.05,
            swept_xi: 0.02,
            swept_nm: 0.03,
            oscillation: 0.01,
        }
    }
}

impl NoiseSettings {
    /// No noise at all; rows equal their analytic curves
    pub fn silent() -> Self {
        Self {
            full_grid_xi: 0.0,
            full_grid_nm: 0.0,
            fiducial: 0.0,
            swept_xi: 0.0,
            swept_nm: 0.0,
            oscillation: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fixed seed for a reproducible run; `None` draws one from OS entropy
    pub seed: Option<u64>,
    pub values_per_parameter: usize,
    #[serde(deserialize_with = "separation_spec")]
    pub separation: ScaleSpec,
    #[serde(deserialize_with = "mass_spec")]
    pub mass: ScaleSpec,
    pub include_mass_function: bool,
    pub noise: NoiseSettings,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            values_per_parameter: 10,
            separation: ScaleSpec::SEPARATION,
            mass: ScaleSpec::MASS,
            include_mass_function: true,
            noise: NoiseSettings::default(),
        }
    }
}

impl GenerationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_scale_block_uses_its_own_axis_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"separation": {"points": 20}, "mass": {"stop_exp": 15.0}}"#)
                .unwrap();
        assert_eq!(
            config.separation,
            ScaleSpec {
                points: 20,
                ..ScaleSpec::SEPARATION
            }
        );
        assert_eq!(
            config.mass,
            ScaleSpec {
                stop_exp: 15.0,
                ..ScaleSpec::MASS
            }
        );
    }

    #[test]
    fn test_written_config_reads_back() {
        let config = GenerationConfig::default().with_seed(9);
        let text = serde_json::to_string(&config).unwrap();
        let parsed: GenerationConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
