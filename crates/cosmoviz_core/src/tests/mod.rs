//! Integration tests for the cosmoviz sweep pipeline
//!
//! Tests are organized by topic:
//! - `generation` - Synthetic full-grid and one-at-a-time datasets
//! - `store` - Array container writing and reading
//! - `conversion` - Array container to JSON view conversion
//! - `sensitivity` - Sensitivity JSON source loading

mod conversion;

use crate::config::GenerationConfig;

/// Small sweep used where the full 10^4-row grid would only slow tests down.
pub(crate) fn small_config(seed: u64) -> GenerationConfig {
    GenerationConfig {
        values_per_parameter: 3,
        ..GenerationConfig::default().with_seed(seed)
    }
}
