//! Resolved Build Configuration
//!
//! A [`BuildConfig`] is built once from a validated [`BuildDocument`] and
//! never mutated afterwards.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dependency::{Coordinate, Dependency, DependencyConfiguration};
use crate::document::{
    BuildDocument, BuildTypeSection, CompileOptionsSection, DependencyEntry, FlutterSection,
    KotlinOptionsSection, PluginEntry, PluginSpec, SigningConfigSection,
};
use crate::java::{CompileOptions, KotlinOptions};
use crate::loader::LoaderOptions;
use crate::plugin::{self, Plugin};
use crate::sdk::SdkVersions;
use crate::signing::{self, BuildType, KeyStoreType, SigningConfig};
use crate::validate;
use crate::ValidationError;

/// Tool that supplies a version value at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionProvider {
    /// `flutter.versionCode` / `flutter.versionName` from pubspec.yaml
    Flutter,
}

/// `versionCode`: a literal or delegated to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionCode {
    Literal(u32),
    Delegated { from: VersionProvider },
}

/// `versionName`: a literal or delegated to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionName {
    Literal(String),
    Delegated { from: VersionProvider },
}

/// Flutter module settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterConfig {
    /// Path to the Flutter module, relative to the app module
    pub source: PathBuf,
}

/// Validated build descriptor handed to the build orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    namespace: String,
    application_id: String,
    sdk: SdkVersions,
    ndk_version: Option<String>,
    version_code: Option<VersionCode>,
    version_name: Option<VersionName>,
    plugins: Vec<Plugin>,
    compile_options: CompileOptions,
    kotlin_options: KotlinOptions,
    signing_configs: IndexMap<String, SigningConfig>,
    build_types: IndexMap<String, BuildType>,
    flutter: Option<FlutterConfig>,
    dependencies: Vec<Dependency>,
}

impl BuildConfig {
    /// Resolve and validate a document
    pub fn from_document(doc: BuildDocument, options: &LoaderOptions) -> Result<Self, ValidationError> {
        let namespace = validate::require(doc.namespace, "namespace")?;
        validate::check_identifier("namespace", &namespace)?;

        let application_id = doc.application_id.unwrap_or_else(|| namespace.clone());
        validate::check_identifier("applicationId", &application_id)?;

        let compile = validate::require(doc.compile_sdk, "compileSdk")?;
        let min = validate::require(doc.min_sdk, "minSdk")?;
        let target = doc.target_sdk.unwrap_or(compile);
        let sdk = SdkVersions::new(min, target, compile, options.max_sdk_level)?;

        if let Some(ref ndk) = doc.ndk_version {
            validate::check_ndk_version(ndk)?;
        }

        let plugins: Vec<Plugin> = doc
            .plugins
            .unwrap_or_default()
            .iter()
            .map(|p| Plugin {
                id: p.id().to_string(),
                legacy_apply: p.legacy_apply(),
            })
            .collect();
        plugin::validate_plugins(&plugins)?;

        let compile_options = doc
            .compile_options
            .map(|c| CompileOptions {
                source_compatibility: c.source_compatibility.unwrap_or_default(),
                target_compatibility: c.target_compatibility.unwrap_or_default(),
                core_library_desugaring: c.core_library_desugaring_enabled.unwrap_or(false),
            })
            .unwrap_or_default();
        let kotlin_options = KotlinOptions {
            jvm_target: doc.kotlin_options.and_then(|k| k.jvm_target),
        };

        let mut signing_configs: IndexMap<String, SigningConfig> = doc
            .signing_configs
            .unwrap_or_default()
            .into_iter()
            .map(|(name, section)| {
                let config = signing_config_from_section(&name, section)?;
                Ok((name, config))
            })
            .collect::<Result<_, ValidationError>>()?;
        let build_types: IndexMap<String, BuildType> = doc
            .build_types
            .unwrap_or_default()
            .into_iter()
            .map(|(name, section)| {
                let build_type = build_type_from_section(&name, section);
                (name, build_type)
            })
            .collect();
        signing::resolve_signing_refs(
            &mut signing_configs,
            &build_types,
            &options.implicit_signing_configs,
        )?;

        let dependencies = validate::parse_dependencies(&doc.dependencies.unwrap_or_default())?;
        validate::check_desugaring(&compile_options, &dependencies, options.strict)?;
        validate::check_jvm_target(&compile_options, &kotlin_options, options.strict)?;

        let flutter = doc
            .flutter
            .and_then(|f| f.source)
            .map(|source| FlutterConfig { source: PathBuf::from(source) });

        debug!(
            "Resolved '{}': {} plugin(s), {} dependency(ies)",
            namespace,
            plugins.len(),
            dependencies.len()
        );

        Ok(Self {
            namespace,
            application_id,
            sdk,
            ndk_version: doc.ndk_version,
            version_code: doc.version_code,
            version_name: doc.version_name,
            plugins,
            compile_options,
            kotlin_options,
            signing_configs,
            build_types,
            flutter,
            dependencies,
        })
    }

    /// Canonical document form; implicit signing configs are left out
    pub fn to_document(&self) -> BuildDocument {
        let plugins = self
            .plugins
            .iter()
            .map(|p| {
                if p.legacy_apply {
                    PluginEntry::Detailed(PluginSpec {
                        id: p.id.clone(),
                        legacy_apply: true,
                    })
                } else {
                    PluginEntry::Id(p.id.clone())
                }
            })
            .collect();

        let signing_configs: IndexMap<String, SigningConfigSection> = self
            .signing_configs
            .iter()
            .filter(|(_, c)| !c.implicit)
            .map(|(name, c)| {
                let section = SigningConfigSection {
                    store_file: c.store_file.as_ref().map(|p| p.to_string_lossy().into_owned()),
                    store_type: Some(c.store_type.as_str().to_string()),
                    key_alias: c.key_alias.clone(),
                    store_password_env: c.store_password_env.clone(),
                    key_password_env: c.key_password_env.clone(),
                };
                (name.clone(), section)
            })
            .collect();

        let build_types: IndexMap<String, BuildTypeSection> = self
            .build_types
            .iter()
            .map(|(name, b)| {
                let section = BuildTypeSection {
                    signing_config: b.signing_config.clone(),
                    minify_enabled: Some(b.minify_enabled),
                    debuggable: Some(b.debuggable),
                };
                (name.clone(), section)
            })
            .collect();

        let dependencies = self
            .dependencies
            .iter()
            .map(|d| DependencyEntry {
                configuration: d.configuration.to_string(),
                coordinate: d.coordinate.to_string(),
            })
            .collect();

        BuildDocument {
            namespace: Some(self.namespace.clone()),
            application_id: Some(self.application_id.clone()),
            compile_sdk: Some(self.sdk.compile),
            ndk_version: self.ndk_version.clone(),
            min_sdk: Some(self.sdk.min),
            target_sdk: Some(self.sdk.target),
            version_code: self.version_code.clone(),
            version_name: self.version_name.clone(),
            plugins: Some(plugins),
            compile_options: Some(CompileOptionsSection {
                source_compatibility: Some(self.compile_options.source_compatibility),
                target_compatibility: Some(self.compile_options.target_compatibility),
                core_library_desugaring_enabled: Some(self.compile_options.core_library_desugaring),
            }),
            kotlin_options: self.kotlin_options.jvm_target.map(|jvm_target| KotlinOptionsSection {
                jvm_target: Some(jvm_target),
            }),
            signing_configs: (!signing_configs.is_empty()).then_some(signing_configs),
            build_types: (!build_types.is_empty()).then_some(build_types),
            flutter: self.flutter.as_ref().map(|f| FlutterSection {
                source: Some(f.source.to_string_lossy().into_owned()),
            }),
            dependencies: Some(dependencies),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn sdk(&self) -> SdkVersions {
        self.sdk
    }

    pub fn min_sdk(&self) -> u32 {
        self.sdk.min
    }

    pub fn target_sdk(&self) -> u32 {
        self.sdk.target
    }

    pub fn compile_sdk(&self) -> u32 {
        self.sdk.compile
    }

    pub fn ndk_version(&self) -> Option<&str> {
        self.ndk_version.as_deref()
    }

    pub fn version_code(&self) -> Option<&VersionCode> {
        self.version_code.as_ref()
    }

    pub fn version_name(&self) -> Option<&VersionName> {
        self.version_name.as_ref()
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id == id)
    }

    pub fn compile_options(&self) -> &CompileOptions {
        &self.compile_options
    }

    pub fn kotlin_options(&self) -> &KotlinOptions {
        &self.kotlin_options
    }

    pub fn desugaring_enabled(&self) -> bool {
        self.compile_options.core_library_desugaring
    }

    pub fn signing_configs(&self) -> &IndexMap<String, SigningConfig> {
        &self.signing_configs
    }

    pub fn build_types(&self) -> &IndexMap<String, BuildType> {
        &self.build_types
    }

    /// Signing identity a build type uses, if any
    pub fn signing_config_for(&self, build_type: &str) -> Option<&SigningConfig> {
        let name = self.build_types.get(build_type)?.signing_config.as_ref()?;
        self.signing_configs.get(name)
    }

    pub fn flutter(&self) -> Option<&FlutterConfig> {
        self.flutter.as_ref()
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Dependencies declared under one configuration, in order
    pub fn dependencies_in(&self, configuration: DependencyConfiguration) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .filter(move |d| d.configuration == configuration)
    }

    /// The `coreLibraryDesugaring` library, if declared
    pub fn desugaring_library(&self) -> Option<&Coordinate> {
        self.dependencies_in(DependencyConfiguration::CoreLibraryDesugaring)
            .next()
            .map(|d| &d.coordinate)
    }
}

fn signing_config_from_section(
    name: &str,
    section: SigningConfigSection,
) -> Result<SigningConfig, ValidationError> {
    let store_file = section.store_file.map(PathBuf::from);
    let store_type = match section.store_type {
        Some(value) => KeyStoreType::parse(&value).ok_or_else(|| ValidationError::InvalidStoreType {
            name: name.to_string(),
            value,
        })?,
        None => store_file
            .as_deref()
            .map(KeyStoreType::from_path)
            .unwrap_or_default(),
    };

    Ok(SigningConfig {
        store_file,
        store_type,
        key_alias: section.key_alias,
        store_password_env: section.store_password_env,
        key_password_env: section.key_password_env,
        ..SigningConfig::new(name)
    })
}

fn build_type_from_section(name: &str, section: BuildTypeSection) -> BuildType {
    let defaults = BuildType::new(name);
    BuildType {
        signing_config: section.signing_config,
        minify_enabled: section.minify_enabled.unwrap_or(defaults.minify_enabled),
        debuggable: section.debuggable.unwrap_or(defaults.debuggable),
        ..defaults
    }
}
