mod axes;
mod dataset;
pub mod parameters;

pub use axes::{ParameterAxis, ParameterInfo, ScaleAxis, ScaleKind};
pub use dataset::{Dataset, MassFunction, Observable, SweepLayout};
pub use parameters::{
    Affine, CosmoParameter, CurveResponse, FIDUCIAL, FULL_GRID_RESPONSE, FiducialDefinition,
    ParameterDefinition, ParameterResponse,
};
