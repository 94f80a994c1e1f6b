//! Synthetic cosmology sweep library
//!
//! This crate builds parameter-sweep datasets for an interactive cosmology
//! viewer and moves them between formats. It supports:
//! - Synthetic two-point correlation function ξ(r) and halo mass function n(M) curves
//! - Full-grid sweeps (every parameter combination) and one-at-a-time sweeps
//! - A binary array container in the NumPy `.npz` layout
//! - Conversion of stored datasets to the JSON view read by the web front end
//! - Loading pre-computed sensitivity curves from their JSON source pair
//!
//! # Pipeline
//!
//! ```ignore
//! use cosmoviz_core::config::GenerationConfig;
//! use cosmoviz_core::convert::convert_store;
//! use cosmoviz_core::model::SweepLayout;
//! use cosmoviz_core::store::write_dataset;
//! use cosmoviz_core::synth::generate_one_at_a_time;
//!
//! let config = GenerationConfig::default().with_seed(42);
//! let dataset = generate_one_at_a_time(&config)?;
//! write_dataset("data_one.npz".as_ref(), &dataset)?;
//! convert_store(
//!     "data_one.npz".as_ref(),
//!     SweepLayout::OneAtATime,
//!     "data_one.json".as_ref(),
//! )?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod curves;
pub mod error;
pub mod grid;
pub mod synth;

// ============================================================================
// Storage and conversion modules
// ============================================================================

pub mod convert;
pub mod sensitivity;
pub mod store;
pub mod view;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{GenerationConfig, NoiseSettings, ScaleSpec};
pub use convert::{StoreConversion, convert_store};
pub use error::{Result, SweepError};
pub use model::{Dataset, SweepLayout};
pub use sensitivity::{SensitivityDataset, SensitivityLoader, convert_sensitivity};
pub use store::{read_dataset, write_dataset};
pub use synth::{generate_full_grid, generate_one_at_a_time};
pub use view::{DatasetView, write_view};
