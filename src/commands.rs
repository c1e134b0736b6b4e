//! CLI commands for droidspec
//!
//! Command structs the binary dispatches to; usable from scripts and tests.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use tracing::{error, info, warn};

use droidspec_core::{DroidSpecError, Result};
use droidspec_descriptor::sdk::android_release;
use droidspec_descriptor::{
    BuildConfig, DescriptorFormat, DescriptorLoader, DescriptorWriter, VersionCode, VersionName,
};

/// Check command options
pub struct CheckCommand {
    pub files: Vec<PathBuf>,
}

/// Per-file outcome of a check
#[derive(Debug)]
pub struct CheckReport {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

impl CheckCommand {
    /// Load every file independently and report each outcome
    pub async fn execute(&self, loader: &DescriptorLoader) -> Result<Vec<CheckReport>> {
        let mut reports = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let error = match loader.load_file(path).await {
                Ok(config) => {
                    info!("{}: ok ({})", path.display(), config.namespace());
                    None
                }
                Err(e) => {
                    let e = DroidSpecError::from(e);
                    if e.is_descriptor_error() {
                        warn!("{}: {}", path.display(), e);
                    } else {
                        error!("{}: {}", path.display(), e);
                    }
                    Some(e.user_message())
                }
            };
            reports.push(CheckReport {
                path: path.clone(),
                error,
            });
        }

        Ok(reports)
    }
}

/// Merge command options
pub struct MergeCommand {
    pub files: Vec<PathBuf>,
    pub format: DescriptorFormat,
    pub output: Option<PathBuf>,
}

impl MergeCommand {
    /// Merge files in order and return the canonical descriptor text
    pub async fn execute(&self, loader: &DescriptorLoader) -> Result<String> {
        let config = loader.merge_files(&self.files).await?;

        let writer = DescriptorWriter::new().with_format(self.format);
        let text = writer.write_to_string(&config)?;

        if let Some(ref output) = self.output {
            writer.write_to_file(&config, output).await?;
            info!("Merged descriptor written to {}", output.display());
        }

        Ok(text)
    }
}

/// Show command options
pub struct ShowCommand {
    pub file: PathBuf,
}

impl ShowCommand {
    pub async fn execute(&self, loader: &DescriptorLoader) -> Result<String> {
        let config = loader.load_file(&self.file).await?;
        Ok(summarize(&config))
    }
}

fn sdk_label(level: u32) -> String {
    match android_release(level) {
        Some(release) => format!("{} (Android {})", level, release),
        None => level.to_string(),
    }
}

/// Human-readable summary of a descriptor
pub fn summarize(config: &BuildConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_summary(&mut out, config);
    out
}

fn write_summary(out: &mut String, config: &BuildConfig) -> fmt::Result {
    let options = config.compile_options();

    writeln!(out, "namespace:      {}", config.namespace())?;
    if config.application_id() != config.namespace() {
        writeln!(out, "applicationId:  {}", config.application_id())?;
    }
    writeln!(out, "minSdk:         {}", sdk_label(config.min_sdk()))?;
    writeln!(out, "targetSdk:      {}", sdk_label(config.target_sdk()))?;
    writeln!(out, "compileSdk:     {}", sdk_label(config.compile_sdk()))?;
    if let Some(ndk) = config.ndk_version() {
        writeln!(out, "ndkVersion:     {}", ndk)?;
    }
    writeln!(
        out,
        "java:           source {} / target {}",
        options.source_compatibility, options.target_compatibility
    )?;

    match config.version_code() {
        Some(VersionCode::Literal(code)) => writeln!(out, "versionCode:    {}", code)?,
        Some(VersionCode::Delegated { from }) => writeln!(out, "versionCode:    from {:?}", from)?,
        None => {}
    }
    match config.version_name() {
        Some(VersionName::Literal(name)) => writeln!(out, "versionName:    {}", name)?,
        Some(VersionName::Delegated { from }) => writeln!(out, "versionName:    from {:?}", from)?,
        None => {}
    }

    let desugaring = match (config.desugaring_enabled(), config.desugaring_library()) {
        (true, Some(lib)) => format!("enabled ({})", lib),
        (true, None) => "enabled".to_string(),
        (false, _) => "disabled".to_string(),
    };
    writeln!(out, "desugaring:     {}", desugaring)?;

    for (name, build_type) in config.build_types() {
        let signing = match config.signing_config_for(name) {
            Some(_) if build_type.signed_with_debug_key() => "debug key".to_string(),
            Some(signing) => format!("{} ({})", signing.name, signing.store_type.as_str()),
            None => "-".to_string(),
        };
        writeln!(out, "buildType:      {} (signing: {})", name, signing)?;
    }

    if !config.plugins().is_empty() {
        writeln!(out, "plugins:")?;
        for plugin in config.plugins() {
            let suffix = if plugin.legacy_apply { " (applied late)" } else { "" };
            writeln!(out, "  - {}{}", plugin.id, suffix)?;
        }
    }

    if !config.dependencies().is_empty() {
        writeln!(out, "dependencies:")?;
        for dependency in config.dependencies() {
            let suffix = if dependency.configuration.is_packaged() { "" } else { " (not packaged)" };
            writeln!(out, "  - {}{}", dependency, suffix)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidspec_descriptor::{DescriptorSource, LoadError, ValidationError};

    const VARIANT_A: &str = include_str!("../crates/descriptor/fixtures/variant_a.toml");
    const VARIANT_C: &str = include_str!("../crates/descriptor/fixtures/variant_c.toml");

    #[test]
    fn test_summarize() {
        let config = DescriptorLoader::new()
            .load(&DescriptorSource::toml(VARIANT_A))
            .unwrap();
        let summary = summarize(&config);

        assert!(summary.contains("namespace:      com.miniProjet.mini_projet"));
        assert!(summary.contains("minSdk:         26 (Android 8.0)"));
        assert!(summary.contains("desugaring:     enabled (com.android.tools:desugar_jdk_libs:2.0.4)"));
        assert!(summary.contains("com.google.gms.google-services (applied late)"));
        assert!(summary.contains("implementation(\"org.tensorflow:tensorflow-lite-gpu:2.12.0\")"));
        assert!(summary.contains("buildType:      release (signing: debug key)"));
        assert!(!summary.contains("not packaged"));
    }

    #[test]
    fn test_summarize_signing_and_test_dependencies() {
        let config = DescriptorLoader::new()
            .load(&DescriptorSource::toml(
                r#"
namespace = "com.example.app"
compileSdk = 34
minSdk = 24

[signingConfigs.upload]
storeFile = "keys/upload.p12"

[buildTypes.debug]
signingConfig = "debug"

[buildTypes.release]
signingConfig = "upload"

[[dependencies]]
configuration = "testImplementation"
coordinate = "junit:junit:4.13.2"
"#,
            ))
            .unwrap();
        let summary = summarize(&config);

        assert!(summary.contains("buildType:      debug (signing: debug (JKS))"));
        assert!(summary.contains("buildType:      release (signing: upload (PKCS12))"));
        assert!(summary.contains("testImplementation(\"junit:junit:4.13.2\") (not packaged)"));
    }

    #[test]
    fn test_check_and_merge_commands() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.toml");
        let c = dir.path().join("c.toml");
        let bad = dir.path().join("bad.toml");
        std::fs::write(&a, VARIANT_A).unwrap();
        std::fs::write(&c, VARIANT_C).unwrap();
        std::fs::write(&bad, "namespace = \"com.example.app\"\ncompileSdk = 33\nminSdk = 40\n").unwrap();

        let loader = DescriptorLoader::new();

        let check = CheckCommand {
            files: vec![a.clone(), bad.clone()],
        };
        let reports = tokio_test::block_on(check.execute(&loader)).unwrap();
        assert!(reports[0].is_valid());
        assert!(!reports[1].is_valid());

        let output = dir.path().join("merged.toml");
        let merge = MergeCommand {
            files: vec![a, c],
            format: DescriptorFormat::Toml,
            output: Some(output.clone()),
        };
        let text = tokio_test::block_on(merge.execute(&loader)).unwrap();
        assert!(text.contains("minSdk = 23"));

        let merged = tokio_test::block_on(loader.load_file(&output)).unwrap();
        assert_eq!(merged.min_sdk(), 23);
    }

    #[test]
    fn test_merge_requires_files() {
        let merge = MergeCommand {
            files: Vec::new(),
            format: DescriptorFormat::Toml,
            output: None,
        };
        let err = tokio_test::block_on(merge.execute(&DescriptorLoader::new())).unwrap_err();
        assert!(matches!(
            err,
            DroidSpecError::Load(LoadError::Validation(ValidationError::EmptyMerge))
        ));
    }

    #[test]
    fn test_show_reports_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DescriptorLoader::new();

        let missing = ShowCommand {
            file: dir.path().join("missing.toml"),
        };
        let err = tokio_test::block_on(missing.execute(&loader)).unwrap_err();
        assert!(!err.is_descriptor_error());
        assert!(err.user_message().starts_with("Cannot read"));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "namespace = \"com.example.app\"\ncompileSdk = 33\nminSdk = 40\n").unwrap();
        let err = tokio_test::block_on(ShowCommand { file: bad }.execute(&loader)).unwrap_err();
        assert!(err.is_descriptor_error());
        assert!(err.user_message().starts_with("Descriptor rejected"));
    }
}
