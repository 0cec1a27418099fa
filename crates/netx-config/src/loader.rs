//! Config file loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config extension {0:?} (expected toml, json, jsonc, yaml or yml)")]
    UnsupportedFormat(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// On-disk config syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    /// JSON, with `//` and `/* */` comments allowed.
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" | "jsonc" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Parse `data` into a [`Config`]. Missing sections take their defaults.
    pub fn parse(self, data: &str) -> Result<Config, ConfigError> {
        match self {
            Self::Toml => Ok(toml::from_str(data)?),
            Self::Json => {
                let stripped = json_comments::StripComments::new(data.as_bytes());
                Ok(serde_json::from_reader(stripped)?)
            }
            Self::Yaml if data.trim().is_empty() => Ok(Config::default()),
            Self::Yaml => Ok(serde_yaml::from_str(data)?),
        }
    }
}

/// Load the dialer, classifier and logging settings from `path`.
///
/// The format is checked before the file is read, so a typo in the
/// extension is reported as such rather than as a parse error.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&data)
}
