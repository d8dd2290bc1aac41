use crate::{DEFAULT_MAX_CONTENT_BYTES, serialize::ContentFormat};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// SettingsError
///

#[derive(Debug, ThisError)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

///
/// MappingSettings
///
/// Defaults applied by `TableMapping` when a registration call does not
/// specify them. Every field is optional in TOML.
///
/// ```toml
/// content_format = "cbor"
/// max_content_bytes = 32768
/// table_prefix = "app"
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MappingSettings {
    /// Serializer used by `TableMapping::content`.
    pub content_format: ContentFormat,

    /// Upper bound on an encoded Content column, checked in both directions.
    pub max_content_bytes: usize,

    /// Prefix for type-derived table names.
    pub table_prefix: Option<String>,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            content_format: ContentFormat::default(),
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            table_prefix: None,
        }
    }
}

impl MappingSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_content_bytes == 0 {
            return Err(SettingsError::Invalid(
                "max_content_bytes must be greater than zero".to_string(),
            ));
        }

        if let Some(prefix) = &self.table_prefix
            && !prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(SettingsError::Invalid(format!(
                "table_prefix '{prefix}' must be ASCII alphanumeric"
            )));
        }

        Ok(())
    }
}

///
/// TESTS
///
