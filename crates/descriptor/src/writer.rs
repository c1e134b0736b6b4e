//! Descriptor Writer
//!
//! Renders a [`BuildConfig`] as a canonical TOML or JSON descriptor.

use std::path::Path;

use tracing::info;

use crate::config::BuildConfig;
use crate::loader::DescriptorFormat;

/// Writer errors
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("TOML write error: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Descriptor writer
#[derive(Debug, Clone, Default)]
pub struct DescriptorWriter {
    format: DescriptorFormat,
}

impl DescriptorWriter {
    /// Create a TOML writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output format
    pub fn with_format(mut self, format: DescriptorFormat) -> Self {
        self.format = format;
        self
    }

    /// Write descriptor to string
    pub fn write_to_string(&self, config: &BuildConfig) -> Result<String, WriteError> {
        let doc = config.to_document();
        let text = match self.format {
            DescriptorFormat::Toml => toml::to_string_pretty(&doc)?,
            DescriptorFormat::Json => {
                let mut text = serde_json::to_string_pretty(&doc)?;
                text.push('\n');
                text
            }
        };
        Ok(text)
    }

    /// Write descriptor to file
    pub async fn write_to_file(&self, config: &BuildConfig, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let content = self.write_to_string(config)?;
        tokio::fs::write(path.as_ref(), content).await?;
        info!("Descriptor written to {:?}", path.as_ref());
        Ok(())
    }
}
