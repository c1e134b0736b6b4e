//! Loader Settings
//!
//! User-level settings for descriptor loading, stored as `config.toml` in
//! the droidspec configuration directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use droidspec_descriptor::{DescriptorFormat, LoaderOptions};

use crate::error::{DroidSpecError, Result};

/// Loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Configuration version for migrations
    pub version: u32,
    /// Treat lenient findings as errors
    pub strict: bool,
    /// Signing configs that need no declaration
    pub implicit_signing_configs: Vec<String>,
    /// Output format for merged descriptors (`toml` or `json`)
    pub default_format: String,
    /// Upper bound for SDK levels
    pub max_sdk_level: u32,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        let options = LoaderOptions::default();
        Self {
            version: 1,
            strict: options.strict,
            implicit_signing_configs: options.implicit_signing_configs,
            default_format: DescriptorFormat::Toml.extension().to_string(),
            max_sdk_level: options.max_sdk_level,
        }
    }
}

impl LoaderSettings {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "droidspec", "droidspec").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load settings from the user configuration file, or defaults
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| DroidSpecError::Settings("Cannot determine config path".into()))?;
        Self::load_from(&config_file).await
    }

    /// Load settings from a specific file; a missing file yields defaults
    pub async fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading settings from {:?}", path);
            let contents = tokio::fs::read_to_string(path).await?;
            let settings: LoaderSettings = toml::from_str(&contents)?;
            settings.check()?;
            Ok(settings)
        } else {
            info!("Settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Settings saved to {:?}", path);
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.output_format().is_none() {
            return Err(DroidSpecError::Settings(format!(
                "unknown default_format '{}'",
                self.default_format
            )));
        }
        if self.max_sdk_level == 0 {
            return Err(DroidSpecError::Settings("max_sdk_level must be positive".into()));
        }
        Ok(())
    }

    /// Parsed `default_format`
    pub fn output_format(&self) -> Option<DescriptorFormat> {
        DescriptorFormat::parse(&self.default_format)
    }

    /// Options for a descriptor loader
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            strict: self.strict,
            implicit_signing_configs: self.implicit_signing_configs.clone(),
            max_sdk_level: self.max_sdk_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LoaderSettings::default();
        assert!(!settings.strict);
        assert_eq!(settings.implicit_signing_configs, vec!["debug".to_string()]);
        assert_eq!(settings.output_format(), Some(DescriptorFormat::Toml));
        assert_eq!(settings.loader_options(), LoaderOptions::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            tokio_test::block_on(LoaderSettings::load_from(&dir.path().join("config.toml"))).unwrap();
        assert_eq!(settings, LoaderSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let settings = LoaderSettings {
            strict: true,
            implicit_signing_configs: Vec::new(),
            ..Default::default()
        };
        tokio_test::block_on(settings.save_to(&path)).unwrap();

        let loaded = tokio_test::block_on(LoaderSettings::load_from(&path)).unwrap();
        assert_eq!(loaded, settings);
        assert!(loaded.loader_options().strict);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "strict = true\n").unwrap();

        let loaded = tokio_test::block_on(LoaderSettings::load_from(&path)).unwrap();
        assert!(loaded.strict);
        assert_eq!(loaded.max_sdk_level, 100);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_format = \"yaml\"\n").unwrap();

        assert!(matches!(
            tokio_test::block_on(LoaderSettings::load_from(&path)),
            Err(DroidSpecError::Settings(_))
        ));
    }
}
