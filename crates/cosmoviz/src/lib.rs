//! Command-line front end for the cosmoviz sweep pipeline
//!
//! Generation, storage and conversion live in `cosmoviz_core`; this crate
//! adds argument handling, YAML settings and log setup.

pub mod commands;
pub mod config;
pub mod logging;

pub use commands::{Command, Layout, run};
pub use config::{ConfigError, load_config};
pub use logging::init_logging;
