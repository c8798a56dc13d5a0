//! Configuration loader
//!
//! This module implements the settings pipeline:
//! 1. Size check and raw read
//! 2. YAML parsing into [`FileConfig`]
//! 3. Layering of CLI/environment [`Overrides`]
//! 4. Duration parsing and validation into [`Settings`]

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::{DurationValue, FileConfig, Overrides, Settings};
use crate::error::ConfigError;
use crate::phase::Durations;

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum configuration file size in bytes.
    pub max_config_size: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_config_size: env_or("POMOTICK_MAX_CONFIG_SIZE", 64 * 1024),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, too large, or not valid
    /// settings YAML.
    pub fn load_file(&self, path: &Path) -> Result<FileConfig, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        if metadata.len() > self.options.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{} bytes", metadata.len()),
                expected: format!("at most {} bytes", self.options.max_config_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        Self::parse(&raw, path)
    }

    /// Parses settings YAML. An empty document yields all defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` on malformed YAML or unknown keys.
    pub fn parse(raw: &str, path: &Path) -> Result<FileConfig, ConfigError> {
        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        if raw.trim().is_empty() {
            return Ok(FileConfig::default());
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if value.is_null() {
            return Ok(FileConfig::default());
        }

        serde_yaml::from_value(value).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: format!("failed to deserialize settings: {e}"),
        })
    }

    /// Produces effective settings: defaults < file < overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or any resulting
    /// duration is invalid.
    pub fn resolve(
        &self,
        file: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Settings, ConfigError> {
        let file_config = match file {
            Some(path) => {
                debug!(path = %path.display(), "loading settings file");
                self.load_file(path)?
            }
            None => FileConfig::default(),
        };
        merge(&file_config, overrides, file.map(Path::to_path_buf))
    }
}

/// Layers `overrides` over `file` and validates the result.
///
/// # Errors
///
/// Returns an error if any duration fails to parse or is rejected.
pub fn merge(
    file: &FileConfig,
    overrides: &Overrides,
    source: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let defaults = Durations::default();

    let work = pick("work", overrides.work.as_deref(), file.work.as_ref(), defaults.work())?;
    let short_break = pick(
        "short_break",
        overrides.short_break.as_deref(),
        file.short_break.as_ref(),
        defaults.short_break(),
    )?;
    let long_break = pick(
        "long_break",
        overrides.long_break.as_deref(),
        file.long_break.as_ref(),
        defaults.long_break(),
    )?;

    Ok(Settings {
        durations: Durations::new(work, short_break, long_break)?,
        auto_continue: overrides.auto_continue || file.auto_continue.unwrap_or(false),
        source,
    })
}

fn pick(
    field: &str,
    cli: Option<&str>,
    file: Option<&DurationValue>,
    default: u64,
) -> Result<u64, ConfigError> {
    match (cli, file) {
        (Some(text), _) => crate::clock::parse_duration(field, text),
        (None, Some(value)) => value.to_seconds(field),
        (None, None) => Ok(default),
    }
}

/// Reads an environment variable and parses it, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
