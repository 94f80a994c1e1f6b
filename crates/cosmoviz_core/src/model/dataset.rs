use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::model::{ParameterAxis, ScaleAxis};

/// Grid topology of a parameter sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepLayout {
    /// Cartesian product of every parameter's samples; one leading axis per parameter
    FullGrid,
    /// One parameter varied at a time; leading axes are (parameter, value index)
    OneAtATime,
}

impl SweepLayout {
    pub fn data_type(self) -> &'static str {
        match self {
            SweepLayout::FullGrid => "full_grid_parameters",
            SweepLayout::OneAtATime => "one_by_one_parameters",
        }
    }
}

/// The synthetic observables a dataset can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observable {
    /// Two-point correlation function xi(r)
    Xi,
    /// Halo mass function n(M)
    Nm,
}

impl Observable {
    pub fn entry_name(self) -> &'static str {
        match self {
            Observable::Xi => "xi",
            Observable::Nm => "nm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Observable::Xi => "Two-point correlation function",
            Observable::Nm => "Halo mass function",
        }
    }
}

/// The optional n(M) half of a dataset. The array and its mass axis only
/// exist together.
#[derive(Debug, Clone, PartialEq)]
pub struct MassFunction {
    pub m_values: ScaleAxis,
    pub nm: ArrayD<f64>,
}

/// Observable arrays plus the axes and parameter metadata they share.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub layout: SweepLayout,
    pub parameters: Vec<ParameterAxis>,
    pub r_values: ScaleAxis,
    pub xi: ArrayD<f64>,
    pub mass: Option<MassFunction>,
}

impl Dataset {
    /// Extents of every axis but the scale axis
    pub fn leading_shape(&self) -> &[usize] {
        let shape = self.xi.shape();
        &shape[..shape.len().saturating_sub(1)]
    }

    /// Check that array extents agree with the axes and parameters describing them.
    pub fn validate(&self) -> Result<()> {
        let xi_shape = self.xi.shape();
        let ndim = xi_shape.len();

        match self.layout {
            SweepLayout::FullGrid => {
                if ndim != self.parameters.len() + 1 {
                    return Err(SweepError::shape_mismatch(
                        "xi",
                        self.parameters.len() + 1,
                        ndim,
                    ));
                }
                for (extent, param) in xi_shape.iter().zip(&self.parameters) {
                    if *extent != param.len() {
                        return Err(SweepError::shape_mismatch(
                            param.entry_name(),
                            *extent,
                            param.len(),
                        ));
                    }
                }
            }
            SweepLayout::OneAtATime => {
                if ndim != 3 {
                    return Err(SweepError::shape_mismatch("xi", 3, ndim));
                }
                if xi_shape[0] != self.parameters.len() {
                    return Err(SweepError::shape_mismatch(
                        "xi",
                        self.parameters.len(),
                        xi_shape[0],
                    ));
                }
                for param in &self.parameters {
                    if param.len() != xi_shape[1] {
                        return Err(SweepError::shape_mismatch(
                            param.entry_name(),
                            xi_shape[1],
                            param.len(),
                        ));
                    }
                }
            }
        }

        if xi_shape[ndim - 1] != self.r_values.len() {
            return Err(SweepError::shape_mismatch(
                "xi",
                self.r_values.len(),
                xi_shape[ndim - 1],
            ));
        }

        if let Some(mass) = &self.mass {
            let nm_shape = mass.nm.shape();
            if nm_shape.len() != ndim {
                return Err(SweepError::shape_mismatch("nm", ndim, nm_shape.len()));
            }
            for (xi_extent, nm_extent) in self.leading_shape().iter().zip(nm_shape) {
                if xi_extent != nm_extent {
                    return Err(SweepError::shape_mismatch("nm", *xi_extent, *nm_extent));
                }
            }
            if nm_shape[ndim - 1] != mass.m_values.len() {
                return Err(SweepError::shape_mismatch(
                    "nm",
                    mass.m_values.len(),
                    nm_shape[ndim - 1],
                ));
            }
        }

        Ok(())
    }
}
