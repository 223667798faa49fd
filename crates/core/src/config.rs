use std::path::{Path, PathBuf};

use miette::Diagnostic;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::SizeTracker;
use crate::provider::ProviderOptions;
use crate::version::CURRENT_DATA_VERSION;

/// Tool settings, read from `nbt.toml`. Missing tables and keys take
/// their defaults, so an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct NbtConfig {
    /// Stamped into trees compiled from SNBT.
    pub data_version: i32,
    pub limits: LimitsConfig,
    pub pretty: PrettyConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_bytes: u64,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct PrettyConfig {
    /// Print array values instead of a placeholder.
    pub array_contents: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct ProviderConfig {
    pub sort_entities: bool,
}

impl Default for NbtConfig {
    fn default() -> Self {
        Self {
            data_version: CURRENT_DATA_VERSION,
            limits: LimitsConfig::default(),
            pretty: PrettyConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_bytes: SizeTracker::DEFAULT_MAX_BYTES,
            max_depth: SizeTracker::DEFAULT_MAX_DEPTH,
        }
    }
}

impl LimitsConfig {
    pub fn tracker(&self) -> SizeTracker {
        SizeTracker::new(self.max_bytes, self.max_depth)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            sort_entities: ProviderOptions::default().sort_entities,
        }
    }
}

impl ProviderConfig {
    pub fn options(&self) -> ProviderOptions {
        ProviderOptions {
            sort_entities: self.sort_entities,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    #[diagnostic(
        code(config::not_found),
        help("Create an 'nbt.toml' file or drop the --config flag")
    )]
    NotFound(PathBuf),

    #[error("failed to parse config: {0}")]
    #[diagnostic(code(config::parse_error))]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(config::serialize_error))]
    SerializeError(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    #[diagnostic(code(config::io_error))]
    IoError(#[from] std::io::Error),
}

impl NbtConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(NbtConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_takes_defaults() {
        let config = NbtConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, NbtConfig::default());
        assert_eq!(config.data_version, CURRENT_DATA_VERSION);
        assert!(!config.pretty.array_contents);
        assert!(config.provider.sort_entities);
        assert_eq!(config.limits.tracker(), SizeTracker::default());
    }

    #[test]
    fn partial_tables_merge_with_defaults() {
        let config = NbtConfig::from_toml_str(
            "data_version = 3700\n\n[limits]\nmax_depth = 64\n\n[provider]\nsort_entities = false\n",
        )
        .expect("partial config");
        assert_eq!(config.data_version, 3700);
        assert_eq!(config.limits.max_depth, 64);
        assert_eq!(config.limits.max_bytes, SizeTracker::DEFAULT_MAX_BYTES);
        assert!(!config.provider.options().sort_entities);
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = NbtConfig::default();
        config.pretty.array_contents = true;
        let text = config.to_toml_string().expect("serialize");
        assert_eq!(NbtConfig::from_toml_str(&text).expect("parse"), config);
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = NbtConfig::from_toml_str("data_version = \"new\"").expect_err("string version");
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nbt.toml");
        assert!(matches!(NbtConfig::load(&path), Err(ConfigError::NotFound(_))));

        NbtConfig::default().save(&path).expect("save");
        assert_eq!(NbtConfig::load(&path).expect("load"), NbtConfig::default());
    }

    #[test]
    fn schema_names_every_table() {
        let schema = serde_json::to_value(NbtConfig::json_schema()).expect("schema json");
        let properties = &schema["properties"];
        for key in ["data_version", "limits", "pretty", "provider"] {
            assert!(properties.get(key).is_some(), "schema is missing {key}");
        }
    }
}
