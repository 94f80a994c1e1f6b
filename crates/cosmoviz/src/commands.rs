use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};
use color_eyre::eyre::WrapErr;

use cosmoviz_core::model::SweepLayout;
use cosmoviz_core::sensitivity::DEFAULT_DATA_DIR;
use cosmoviz_core::{
    convert_sensitivity, convert_store, generate_full_grid, generate_one_at_a_time, write_dataset,
};

use crate::config::load_config;

/// Sweep topology as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Every parameter combination
    Full,
    /// One parameter varied at a time around a reference row
    One,
}

impl Layout {
    pub fn sweep(self) -> SweepLayout {
        match self {
            Layout::Full => SweepLayout::FullGrid,
            Layout::One => SweepLayout::OneAtATime,
        }
    }

    pub fn default_store(self) -> &'static str {
        match self {
            Layout::Full => "data.npz",
            Layout::One => "data_one.npz",
        }
    }

    pub fn default_view(self) -> &'static str {
        match self {
            Layout::Full => "data.json",
            Layout::One => "data_one.json",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a synthetic sweep and write it to an array container
    Generate {
        #[arg(long, value_enum, default_value = "full")]
        layout: Layout,

        /// Output container (default: data.npz or data_one.npz)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML generation settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fixed seed; overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the halo mass function
        #[arg(long)]
        no_mass: bool,
    },

    /// Convert an array container to the JSON view
    Convert {
        #[arg(long, value_enum, default_value = "full")]
        layout: Layout,

        /// Input container (default: data.npz or data_one.npz)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON (default: data.json or data_one.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a sensitivity JSON pair to the JSON view
    ConvertSensitivity {
        /// Directory holding the two sensitivity documents
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        #[arg(short, long, default_value = "data_one.json")]
        output: PathBuf,
    },
}

fn or_default(path: Option<PathBuf>, default: &str) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(default))
}

fn generate(
    layout: Layout,
    output: &Path,
    config: Option<&Path>,
    seed: Option<u64>,
    no_mass: bool,
) -> color_eyre::Result<()> {
    let mut config = load_config(config)?;
    if seed.is_some() {
        config.seed = seed;
    }
    if no_mass {
        config.include_mass_function = false;
    }

    let dataset = match layout {
        Layout::Full => generate_full_grid(&config),
        Layout::One => generate_one_at_a_time(&config),
    }
    .wrap_err("failed to generate dataset")?;

    write_dataset(output, &dataset)
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;
    Ok(())
}

pub fn run(command: Command) -> color_eyre::Result<()> {
    match command {
        Command::Generate {
            layout,
            output,
            config,
            seed,
            no_mass,
        } => {
            let output = or_default(output, layout.default_store());
            generate(layout, &output, config.as_deref(), seed, no_mass)
        }
        Command::Convert {
            layout,
            input,
            output,
        } => {
            let input = or_default(input, layout.default_store());
            let output = or_default(output, layout.default_view());
            convert_store(&input, layout.sweep(), &output)
                .wrap_err_with(|| format!("failed to convert {}", input.display()))?;
            Ok(())
        }
        Command::ConvertSensitivity { data_dir, output } => {
            convert_sensitivity(&data_dir, &output).wrap_err_with(|| {
                format!("failed to convert sensitivity data in {}", data_dir.display())
            })?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_then_convert() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("data_one.npz");
        let view = dir.path().join("data_one.json");
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "values_per_parameter: 2\n").unwrap();

        run(Command::Generate {
            layout: Layout::One,
            output: Some(store.clone()),
            config: Some(config),
            seed: Some(3),
            no_mass: true,
        })
        .unwrap();
        run(Command::Convert {
            layout: Layout::One,
            input: Some(store),
            output: Some(view.clone()),
        })
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&view).unwrap()).unwrap();
        assert_eq!(written["metadata"]["xi_dimensions"], serde_json::json!([5, 2, 40]));
        assert!(written.get("nm_data").is_none());
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(Command::Convert {
            layout: Layout::Full,
            input: Some(dir.path().join("absent.npz")),
            output: Some(dir.path().join("data.json")),
        })
        .unwrap_err();
        assert!(format!("{err:?}").contains("source not found"));
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(Layout::Full.default_store(), "data.npz");
        assert_eq!(Layout::One.default_view(), "data_one.json");
        assert_eq!(Layout::One.sweep(), SweepLayout::OneAtATime);
    }
}
