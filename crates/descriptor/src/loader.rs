//! Build Descriptor Loader
//!
//! Parses descriptor documents, merges them and resolves them into a
//! validated [`BuildConfig`].

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::document::{BuildDocument, Merge};
use crate::signing::DEBUG_SIGNING_CONFIG;
use crate::ValidationError;

/// File-level loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported descriptor file: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Document syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorFormat {
    #[default]
    Toml,
    Json,
}

impl DescriptorFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DescriptorFormat::Toml => "toml",
            DescriptorFormat::Json => "json",
        }
    }

    /// Detect from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(DescriptorFormat::Toml),
            "json" => Some(DescriptorFormat::Json),
            _ => None,
        }
    }

    /// Parse a format name (`toml` / `json`)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Some(DescriptorFormat::Toml),
            "json" => Some(DescriptorFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorFormat::Toml => f.write_str("TOML"),
            DescriptorFormat::Json => f.write_str("JSON"),
        }
    }
}

/// Descriptor text together with its syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSource {
    pub format: DescriptorFormat,
    pub text: String,
    /// Where the text came from, for log messages
    pub origin: Option<PathBuf>,
}

impl DescriptorSource {
    pub fn toml(text: impl Into<String>) -> Self {
        Self {
            format: DescriptorFormat::Toml,
            text: text.into(),
            origin: None,
        }
    }

    pub fn json(text: impl Into<String>) -> Self {
        Self {
            format: DescriptorFormat::Json,
            text: text.into(),
            origin: None,
        }
    }

    /// Read a descriptor file; the extension selects the format
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let format = DescriptorFormat::from_path(path)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            format,
            text,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Label used in log messages
    pub fn label(&self) -> String {
        match self.origin {
            Some(ref path) => path.display().to_string(),
            None => format!("<inline {}>", self.format),
        }
    }

    /// Parse into a document without validating it
    pub fn parse(&self) -> Result<BuildDocument, ValidationError> {
        let syntax = |message: String| ValidationError::Syntax {
            format: self.format,
            message,
        };

        match self.format {
            DescriptorFormat::Toml => toml::from_str(&self.text).map_err(|e| syntax(e.to_string())),
            DescriptorFormat::Json => serde_json::from_str(&self.text).map_err(|e| syntax(e.to_string())),
        }
    }
}

/// Loader behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Treat lenient findings (unused desugaring library, jvmTarget
    /// mismatch) as errors
    pub strict: bool,
    /// Signing configs that count as declared without a declaration
    pub implicit_signing_configs: Vec<String>,
    /// Upper bound accepted for any SDK level
    pub max_sdk_level: u32,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            strict: false,
            implicit_signing_configs: vec![DEBUG_SIGNING_CONFIG.to_string()],
            max_sdk_level: 100,
        }
    }
}

/// Build descriptor loader
#[derive(Debug, Clone, Default)]
pub struct DescriptorLoader {
    options: LoaderOptions,
}

impl DescriptorLoader {
    /// Create a loader with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Enable or disable strict mode
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Parse and validate one descriptor
    pub fn load(&self, source: &DescriptorSource) -> Result<BuildConfig, ValidationError> {
        debug!("Loading descriptor {}", source.label());
        let config = self.resolve(source.parse()?)?;
        info!(
            "Loaded '{}' from {} (sdk {}..={}, compile {})",
            config.namespace(),
            source.label(),
            config.min_sdk(),
            config.target_sdk(),
            config.compile_sdk()
        );
        Ok(config)
    }

    /// Read, parse and validate a descriptor file
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<BuildConfig, LoadError> {
        let source = DescriptorSource::from_file(path).await?;
        Ok(self.load(&source)?)
    }

    /// Validate an already-parsed document
    pub fn resolve(&self, doc: BuildDocument) -> Result<BuildConfig, ValidationError> {
        BuildConfig::from_document(doc, &self.options)
    }

    /// Apply `over` atop `base` field by field, then validate
    pub fn merge(
        &self,
        base: &DescriptorSource,
        over: &DescriptorSource,
    ) -> Result<BuildConfig, ValidationError> {
        self.merge_all([base, over])
    }

    /// Left fold of [`merge`](Self::merge): later sources win
    pub fn merge_all<'a, I>(&self, sources: I) -> Result<BuildConfig, ValidationError>
    where
        I: IntoIterator<Item = &'a DescriptorSource>,
    {
        let mut merged: Option<BuildDocument> = None;
        let mut count = 0usize;

        for source in sources {
            let doc = source.parse()?;
            debug!("Merging {}", source.label());
            merged = Some(match merged {
                Some(base) => base.merge(doc),
                None => doc,
            });
            count += 1;
        }

        let doc = merged.ok_or(ValidationError::EmptyMerge)?;
        let config = self.resolve(doc)?;
        info!("Merged {} descriptor(s) into '{}'", count, config.namespace());
        Ok(config)
    }

    /// Read and merge descriptor files in order
    pub async fn merge_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BuildConfig, LoadError> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(DescriptorSource::from_file(path).await?);
        }
        Ok(self.merge_all(&sources)?)
    }
}
