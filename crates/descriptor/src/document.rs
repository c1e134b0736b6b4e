//! Descriptor documents
//!
//! The serde-facing, partial form of a descriptor. Every field is optional
//! so a document can act as an overlay; [`BuildConfig`](crate::BuildConfig)
//! is the resolved form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{VersionCode, VersionName};
use crate::java::JavaVersion;

/// Right-biased field-wise merge
pub trait Merge {
    /// Fields present in `over` replace those in `self`
    fn merge(self, over: Self) -> Self;
}

impl<T: Merge> Merge for Option<T> {
    fn merge(self, over: Self) -> Self {
        match (self, over) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (base, over) => over.or(base),
        }
    }
}

/// Named entries merge per name; new names are appended in override order
impl<V: Merge + Default> Merge for IndexMap<String, V> {
    fn merge(mut self, over: Self) -> Self {
        for (name, entry) in over {
            let slot = self.entry(name).or_default();
            let base = std::mem::take(slot);
            *slot = base.merge(entry);
        }
        self
    }
}

/// A plugin given as a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginSpec {
    pub id: String,
    /// Applied after the `plugins` block
    #[serde(default)]
    pub legacy_apply: bool,
}

/// A plugin entry: a bare id or a table with flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginEntry {
    Id(String),
    Detailed(PluginSpec),
}

impl PluginEntry {
    pub fn id(&self) -> &str {
        match self {
            PluginEntry::Id(id) => id,
            PluginEntry::Detailed(spec) => &spec.id,
        }
    }

    pub fn legacy_apply(&self) -> bool {
        matches!(self, PluginEntry::Detailed(spec) if spec.legacy_apply)
    }
}

/// `compileOptions` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompileOptionsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_compatibility: Option<JavaVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_compatibility: Option<JavaVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_library_desugaring_enabled: Option<bool>,
}

impl Merge for CompileOptionsSection {
    fn merge(self, over: Self) -> Self {
        Self {
            source_compatibility: over.source_compatibility.or(self.source_compatibility),
            target_compatibility: over.target_compatibility.or(self.target_compatibility),
            core_library_desugaring_enabled: over
                .core_library_desugaring_enabled
                .or(self.core_library_desugaring_enabled),
        }
    }
}

/// `kotlinOptions` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KotlinOptionsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<JavaVersion>,
}

impl Merge for KotlinOptionsSection {
    fn merge(self, over: Self) -> Self {
        Self {
            jvm_target: over.jvm_target.or(self.jvm_target),
        }
    }
}

/// One entry of `signingConfigs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SigningConfigSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_password_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_password_env: Option<String>,
}

impl Merge for SigningConfigSection {
    fn merge(self, over: Self) -> Self {
        Self {
            store_file: over.store_file.or(self.store_file),
            store_type: over.store_type.or(self.store_type),
            key_alias: over.key_alias.or(self.key_alias),
            store_password_env: over.store_password_env.or(self.store_password_env),
            key_password_env: over.key_password_env.or(self.key_password_env),
        }
    }
}

/// One entry of `buildTypes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildTypeSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debuggable: Option<bool>,
}

impl Merge for BuildTypeSection {
    fn merge(self, over: Self) -> Self {
        Self {
            signing_config: over.signing_config.or(self.signing_config),
            minify_enabled: over.minify_enabled.or(self.minify_enabled),
            debuggable: over.debuggable.or(self.debuggable),
        }
    }
}

/// `flutter` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlutterSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Merge for FlutterSection {
    fn merge(self, over: Self) -> Self {
        Self {
            source: over.source.or(self.source),
        }
    }
}

/// One entry of `dependencies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyEntry {
    pub configuration: String,
    pub coordinate: String,
}

/// A whole descriptor document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_code: Option<VersionCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name: Option<VersionName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_options: Option<CompileOptionsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kotlin_options: Option<KotlinOptionsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_configs: Option<IndexMap<String, SigningConfigSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_types: Option<IndexMap<String, BuildTypeSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flutter: Option<FlutterSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<DependencyEntry>>,
}

impl Merge for BuildDocument {
    /// Scalars and lists are replaced whole; sections and named entries
    /// merge field by field
    fn merge(self, over: Self) -> Self {
        Self {
            namespace: over.namespace.or(self.namespace),
            application_id: over.application_id.or(self.application_id),
            compile_sdk: over.compile_sdk.or(self.compile_sdk),
            ndk_version: over.ndk_version.or(self.ndk_version),
            min_sdk: over.min_sdk.or(self.min_sdk),
            target_sdk: over.target_sdk.or(self.target_sdk),
            version_code: over.version_code.or(self.version_code),
            version_name: over.version_name.or(self.version_name),
            plugins: over.plugins.or(self.plugins),
            compile_options: self.compile_options.merge(over.compile_options),
            kotlin_options: self.kotlin_options.merge(over.kotlin_options),
            signing_configs: self.signing_configs.merge(over.signing_configs),
            build_types: self.build_types.merge(over.build_types),
            flutter: self.flutter.merge(over.flutter),
            dependencies: over.dependencies.or(self.dependencies),
        }
    }
}

impl BuildDocument {
    /// Coordinate of the first `coreLibraryDesugaring` dependency
    pub fn desugaring_library(&self) -> Option<&str> {
        self.dependencies
            .as_ref()?
            .iter()
            .find(|d| d.configuration == "coreLibraryDesugaring")
            .map(|d| d.coordinate.as_str())
    }
}
