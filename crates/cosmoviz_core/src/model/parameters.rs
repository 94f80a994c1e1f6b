//! Cosmological parameters and how each one perturbs the synthetic curves
//!
//! Every parameter identity maps to a fixed row of affine coefficients. The
//! builder looks the row up instead of branching on the parameter, so adding a
//! parameter means adding a `CosmoParameter` variant and its table row.

use serde::{Deserialize, Serialize};

use crate::curves::Factors;
use crate::model::Observable;

/// `intercept + gain * t` for a normalized position `t` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub intercept: f64,
    pub gain: f64,
}

impl Affine {
    pub const fn new(intercept: f64, gain: f64) -> Self {
        Self { intercept, gain }
    }

    pub const fn constant(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    #[inline]
    pub fn at(self, t: f64) -> f64 {
        self.intercept + self.gain * t
    }
}

/// Amplitude, slope and cutoff coefficients for one observable.
///
/// `slope` is the power-law exponent itself. Observables without a cutoff
/// keep `cutoff` at a constant 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveResponse {
    pub amplitude: Affine,
    pub slope: Affine,
    pub cutoff: Affine,
}

impl CurveResponse {
    pub fn factors(&self, t: f64) -> Factors {
        Factors {
            amplitude: self.amplitude.at(t),
            slope: self.slope.at(t),
            cutoff: self.cutoff.at(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterResponse {
    pub xi: CurveResponse,
    pub nm: CurveResponse,
}

impl ParameterResponse {
    pub fn for_observable(&self, observable: Observable) -> &CurveResponse {
        match observable {
            Observable::Xi => &self.xi,
            Observable::Nm => &self.nm,
        }
    }
}

/// Static description of a swept parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub range: (f64, f64),
    pub response: ParameterResponse,
}

/// The reference cosmology occupying row 0 of a one-at-a-time sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiducialDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub value: f64,
}

pub const FIDUCIAL: FiducialDefinition = FiducialDefinition {
    name: "Fiducial",
    description: "Reference cosmology",
    value: 0.3,
};

const XI_SLOPE: f64 = -1.8;
const NM_SLOPE: f64 = -1.3;

/// Joint response of the full-grid sweep, applied to the mean normalized
/// position of all parameters.
pub const FULL_GRID_RESPONSE: ParameterResponse = ParameterResponse {
    xi: CurveResponse {
        amplitude: Affine::new(0.7, 0.6),
        slope: Affine::new(-1.6, -0.4),
        cutoff: Affine::constant(1.0),
    },
    nm: CurveResponse {
        amplitude: Affine::new(0.8, 0.4),
        slope: Affine::constant(NM_SLOPE),
        cutoff: Affine::new(1.0, 0.5),
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CosmoParameter {
    /// Matter density
    OmegaM,
    /// Amplitude of matter fluctuations
    Sigma8,
    /// Dimensionless Hubble parameter
    Hubble,
    /// Primordial spectral index
    SpectralIndex,
}

const DEFINITIONS: [ParameterDefinition; 4] = [
    ParameterDefinition {
        name: "Ω_m",
        description: "Matter density parameter",
        range: (0.1, 0.5),
        response: ParameterResponse {
            xi: CurveResponse {
                amplitude: Affine::new(0.8, 0.6),
                slope: Affine::new(-1.6, -0.4),
                cutoff: Affine::constant(1.0),
            },
            nm: CurveResponse {
                amplitude: Affine::new(0.7, 0.6),
                slope: Affine::constant(NM_SLOPE),
                cutoff: Affine::new(1.0, 0.3),
            },
        },
    },
    ParameterDefinition {
        name: "σ_8",
        description: "Amplitude of matter fluctuations",
        range: (0.6, 1.2),
        response: ParameterResponse {
            xi: CurveResponse {
                amplitude: Affine::new(0.5, 1.0),
                slope: Affine::constant(XI_SLOPE),
                cutoff: Affine::constant(1.0),
            },
            nm: CurveResponse {
                amplitude: Affine::new(0.5, 1.0),
                slope: Affine::constant(NM_SLOPE),
                cutoff: Affine::constant(1.0),
            },
        },
    },
    ParameterDefinition {
        name: "h",
        description: "Hubble parameter",
        range: (0.5, 0.8),
        response: ParameterResponse {
            xi: CurveResponse {
                amplitude: Affine::new(0.9, 0.2),
                slope: Affine::new(-1.7, -0.2),
                cutoff: Affine::constant(1.0),
            },
            nm: CurveResponse {
                amplitude: Affine::new(0.9, 0.2),
                slope: Affine::constant(NM_SLOPE),
                cutoff: Affine::new(0.9, 0.2),
            },
        },
    },
    ParameterDefinition {
        name: "n_s",
        description: "Spectral index",
        range: (0.9, 1.1),
        response: ParameterResponse {
            xi: CurveResponse {
                amplitude: Affine::new(0.95, 0.1),
                slope: Affine::new(-1.85, 0.1),
                cutoff: Affine::constant(1.0),
            },
            nm: CurveResponse {
                amplitude: Affine::new(0.95, 0.1),
                slope: Affine::constant(NM_SLOPE),
                cutoff: Affine::new(0.95, 0.1),
            },
        },
    },
];

impl CosmoParameter {
    pub const ALL: [CosmoParameter; 4] = [
        CosmoParameter::OmegaM,
        CosmoParameter::Sigma8,
        CosmoParameter::Hubble,
        CosmoParameter::SpectralIndex,
    ];

    pub fn definition(self) -> &'static ParameterDefinition {
        &DEFINITIONS[self as usize]
    }

    pub fn response(self) -> &'static ParameterResponse {
        &self.definition().response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_endpoints() {
        let slope = CosmoParameter::OmegaM.response().xi.slope;
        assert_eq!(slope.at(0.0), -1.6);
        assert!((slope.at(1.0) - -2.0).abs() < 1e-12);
    }

    #[test]
    fn test_spectral_index_is_centred_on_baseline() {
        let xi = CosmoParameter::SpectralIndex.response().xi;
        assert!((xi.slope.at(0.5) - XI_SLOPE).abs() < 1e-12);
        assert!((xi.amplitude.at(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_table_lookup_matches_variant() {
        for param in CosmoParameter::ALL {
            let def = param.definition();
            assert!(def.range.0 < def.range.1, "{} has an empty range", def.name);
        }
        assert_eq!(CosmoParameter::Sigma8.definition().name, "σ_8");
        assert_eq!(CosmoParameter::Hubble.definition().range, (0.5, 0.8));
    }
}
