//! Configuration file parsing for `riffle.toml`.
//!
//! Every key is optional; command-line flags override anything set here,
//! and built-in defaults cover the rest.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RiffleConfig {
    #[serde(default)]
    pub pipeline: PipelineSection,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PipelineSection {
    pub size: Option<usize>,
    pub threads: Option<usize>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    /// Input family name: uniform, reversed, or partial.
    pub input: Option<String>,
    /// Result file to append tab-separated records to.
    pub output: Option<PathBuf>,
}

impl RiffleConfig {
    /// Load from `explicit` when given, otherwise from `./riffle.toml`
    /// when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigFileError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from("riffle.toml");
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigFileError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigFileError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pipeline_section_parses() {
        let config: RiffleConfig = toml::from_str(
            r#"
[pipeline]
size = 500000
threads = 8
iterations = 5
seed = 7
input = "reversed"
output = "results.tsv"
"#,
        )
        .unwrap();
        assert_eq!(config.pipeline.size, Some(500_000));
        assert_eq!(config.pipeline.threads, Some(8));
        assert_eq!(config.pipeline.iterations, Some(5));
        assert_eq!(config.pipeline.seed, Some(7));
        assert_eq!(config.pipeline.input.as_deref(), Some("reversed"));
        assert_eq!(
            config.pipeline.output,
            Some(PathBuf::from("results.tsv"))
        );
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config: RiffleConfig = toml::from_str("").unwrap();
        assert!(config.pipeline.size.is_none());
        assert!(config.pipeline.output.is_none());
    }

    #[test]
    fn partial_section_leaves_the_rest_unset() {
        let config: RiffleConfig = toml::from_str("[pipeline]\nsize = 64\n").unwrap();
        assert_eq!(config.pipeline.size, Some(64));
        assert!(config.pipeline.threads.is_none());
    }

    #[test]
    fn missing_default_file_is_not_an_error() {
        // the test cwd carries no riffle.toml, so this takes the defaults
        assert!(RiffleConfig::load(None).is_ok());
    }
}
