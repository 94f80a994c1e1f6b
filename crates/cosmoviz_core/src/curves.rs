//! Analytic baseline shapes for the synthetic observables

use crate::model::{Observable, ScaleAxis};

/// Per-combination modulation of a baseline shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    pub amplitude: f64,
    /// Power-law exponent
    pub slope: f64,
    /// Multiplier on the exponential cutoff scale
    pub cutoff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    /// `norm * (x / pivot)^slope`
    PowerLaw { norm: f64, pivot: f64, slope: f64 },
    /// `norm * (x / pivot)^slope * exp(-(x / cutoff_scale)^cutoff_exponent)`
    TruncatedPowerLaw {
        norm: f64,
        pivot: f64,
        slope: f64,
        cutoff_scale: f64,
        cutoff_exponent: f64,
    },
}

/// xi(r) baseline: 0.1 (r / 5)^-1.8
pub const CORRELATION_BASELINE: CurveShape = CurveShape::PowerLaw {
    norm: 0.1,
    pivot: 5.0,
    slope: -1.8,
};

/// Sheth-Tormen-like n(M) baseline with a 1e14 M_sun cutoff
pub const MASS_FUNCTION_BASELINE: CurveShape = CurveShape::TruncatedPowerLaw {
    norm: 1e-3,
    pivot: 1e12,
    slope: -1.3,
    cutoff_scale: 1e14,
    cutoff_exponent: 0.3,
};

impl CurveShape {
    pub fn for_observable(observable: Observable) -> Self {
        match observable {
            Observable::Xi => CORRELATION_BASELINE,
            Observable::Nm => MASS_FUNCTION_BASELINE,
        }
    }

    /// Factors that reproduce the unmodulated baseline
    pub fn baseline_factors(&self) -> Factors {
        let slope = match *self {
            CurveShape::PowerLaw { slope, .. } | CurveShape::TruncatedPowerLaw { slope, .. } => {
                slope
            }
        };
        Factors {
            amplitude: 1.0,
            slope,
            cutoff: 1.0,
        }
    }

    #[inline]
    pub fn evaluate(&self, x: f64, factors: Factors) -> f64 {
        match *self {
            CurveShape::PowerLaw { norm, pivot, .. } => {
                norm * factors.amplitude * (x / pivot).powf(factors.slope)
            }
            CurveShape::TruncatedPowerLaw {
                norm,
                pivot,
                cutoff_scale,
                cutoff_exponent,
                ..
            } => {
                let cutoff = (-(x / (cutoff_scale * factors.cutoff)).powf(cutoff_exponent)).exp();
                norm * factors.amplitude * (x / pivot).powf(factors.slope) * cutoff
            }
        }
    }

    pub fn curve(&self, axis: &ScaleAxis, factors: Factors) -> Vec<f64> {
        axis.values()
            .iter()
            .map(|&x| self.evaluate(x, factors))
            .collect()
    }
}
