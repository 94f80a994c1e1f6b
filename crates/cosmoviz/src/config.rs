//! YAML generation settings

use std::path::Path;

use cosmoviz_core::GenerationConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_saphyr::Error,
    },
}

/// Parse a YAML document into generation settings. Omitted fields keep
/// their defaults, and an empty document is the default configuration.
pub fn parse_config(yaml: &str) -> Result<GenerationConfig, serde_saphyr::Error> {
    if yaml.trim().is_empty() {
        return Ok(GenerationConfig::default());
    }
    serde_saphyr::from_str(yaml)
}

/// Load settings from `path`, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GenerationConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(GenerationConfig::default());
    };

    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;

    tracing::debug!(path = %path.display(), ?config, "Loaded generation config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), GenerationConfig::default());
        assert_eq!(load_config(None).unwrap(), GenerationConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let yaml = r#"
seed: 42
values_per_parameter: 4
include_mass_function: false
noise:
  swept_xi: 0.0
separation:
  start_exp: -1.0
  stop_exp: 1.0
  points: 20
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.values_per_parameter, 4);
        assert!(!config.include_mass_function);
        assert_eq!(config.noise.swept_xi, 0.0);
        assert_eq!(config.noise.fiducial, 0.05);
        assert_eq!(config.separation.points, 20);
        assert_eq!(config.mass.points, 35);
    }

    #[test]
    fn test_partial_scale_block() {
        let config = parse_config("separation:\n  points: 20\nmass:\n  start_exp: 11.0\n").unwrap();
        assert_eq!(config.separation.points, 20);
        assert_eq!(config.separation.start_exp, -1.0);
        assert_eq!(config.separation.stop_exp, 2.0);
        assert_eq!(config.mass.start_exp, 11.0);
        assert_eq!(config.mass.stop_exp, 16.0);
        assert_eq!(config.mass.points, 35);
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "values_per_parameter: [not, a, number]\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
