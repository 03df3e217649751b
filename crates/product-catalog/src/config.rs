//! # Configuration
//!
//! Runtime settings read from the environment. The binary loads a `.env`
//! file first (via `dotenvy`), so either source works.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CATALOG_DATA_DIR` | `data` | Directory holding the catalog file |
//! | `CATALOG_FILE` | `data.json` | File name inside that directory |
//! | `CATALOG_CHANNEL_BUFFER` | `32` | Mailbox capacity of the repository actor |

use std::path::PathBuf;
use thiserror::Error;

pub const DATA_DIR_VAR: &str = "CATALOG_DATA_DIR";
pub const FILE_VAR: &str = "CATALOG_FILE";
pub const CHANNEL_BUFFER_VAR: &str = "CATALOG_CHANNEL_BUFFER";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidBuffer { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    pub channel_buffer: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: "data.json".to_string(),
            channel_buffer: 32,
        }
    }
}

impl CatalogConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from any variable source; unset variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(non_empty(DATA_DIR_VAR, dir)?);
        }

        if let Some(file) = lookup(FILE_VAR) {
            config.file_name = non_empty(FILE_VAR, file)?;
        }

        if let Some(buffer) = lookup(CHANNEL_BUFFER_VAR) {
            config.channel_buffer = match buffer.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidBuffer {
                        var: CHANNEL_BUFFER_VAR,
                        value: buffer,
                    })
                }
            };
        }

        Ok(config)
    }

    /// A configuration rooted at `data_dir`, other settings at their defaults.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.file_path(), PathBuf::from("data").join("data.json"));
    }

    #[test]
    fn test_overrides() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/tmp/catalog"),
            (FILE_VAR, "products.json"),
            (CHANNEL_BUFFER_VAR, " 8 "),
        ]))
        .unwrap();

        assert_eq!(config.file_path(), PathBuf::from("/tmp/catalog/products.json"));
        assert_eq!(config.channel_buffer, 8);
    }

    #[test]
    fn test_invalid_values() {
        for bad in ["0", "-1", "lots"] {
            let err = CatalogConfig::from_lookup(lookup(&[(CHANNEL_BUFFER_VAR, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBuffer { .. }));
        }

        let err = CatalogConfig::from_lookup(lookup(&[(FILE_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { var: FILE_VAR });
    }
}
