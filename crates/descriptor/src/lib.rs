//! Android Build Descriptor
//!
//! Parses, validates and merges declarative Android app build descriptors
//! (plugins, SDK levels, compile options, signing, dependencies) into an
//! immutable [`BuildConfig`] for an external build orchestrator.

pub mod config;
pub mod dependency;
pub mod document;
pub mod java;
pub mod loader;
pub mod plugin;
pub mod sdk;
pub mod signing;
pub mod validate;
pub mod writer;

pub use config::{BuildConfig, FlutterConfig, VersionCode, VersionName, VersionProvider};
pub use dependency::{Coordinate, Dependency, DependencyConfiguration};
pub use document::{BuildDocument, Merge};
pub use java::{CompileOptions, JavaVersion, KotlinOptions};
pub use loader::{DescriptorFormat, DescriptorLoader, DescriptorSource, LoadError, LoaderOptions};
pub use plugin::Plugin;
pub use sdk::SdkVersions;
pub use signing::{BuildType, KeyStoreType, SigningConfig};
pub use writer::{DescriptorWriter, WriteError};

/// Descriptor validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{format} syntax error: {message}")]
    Syntax {
        format: DescriptorFormat,
        message: String,
    },
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid {field}: '{value}' is not a dotted identifier")]
    InvalidIdentifier { field: &'static str, value: String },
    #[error("{field} {value} is outside the supported range 1..={max}")]
    SdkOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("minSdk ({min}) is greater than targetSdk ({target})")]
    MinAboveTarget { min: u32, target: u32 },
    #[error("targetSdk ({target}) is greater than compileSdk ({compile})")]
    TargetAboveCompile { target: u32, compile: u32 },
    #[error("Invalid NDK version: {0}")]
    InvalidNdkVersion(String),
    #[error("Invalid plugin id: {0}")]
    InvalidPluginId(String),
    #[error("Duplicate plugin: {0}")]
    DuplicatePlugin(String),
    #[error("Signing config '{name}' has unknown store type '{value}'")]
    InvalidStoreType { name: String, value: String },
    #[error("Build type '{build_type}' references undeclared signing config '{name}'")]
    UnknownSigningConfig { build_type: String, name: String },
    #[error("Unknown dependency configuration: {0}")]
    UnknownConfiguration(String),
    #[error("Malformed dependency coordinate '{coordinate}': {reason}")]
    MalformedCoordinate { coordinate: String, reason: String },
    #[error("Duplicate dependency: {0}")]
    DuplicateDependency(String),
    #[error("Core library desugaring is enabled but no coreLibraryDesugaring dependency is declared")]
    DesugaringLibraryMissing,
    #[error("Only one coreLibraryDesugaring dependency may be declared, found {0}")]
    MultipleDesugaringLibraries(usize),
    #[error("coreLibraryDesugaring dependency '{0}' declared while desugaring is disabled")]
    DesugaringDisabled(String),
    #[error("jvmTarget {jvm_target} does not match targetCompatibility {target_compat}")]
    JvmTargetMismatch {
        jvm_target: JavaVersion,
        target_compat: JavaVersion,
    },
    #[error("No descriptors to merge")]
    EmptyMerge,
}

impl ValidationError {
    /// Whether this finding is only an error in strict mode
    pub fn is_strict_only(&self) -> bool {
        matches!(
            self,
            ValidationError::DesugaringDisabled(_) | ValidationError::JvmTargetMismatch { .. }
        )
    }
}

/// Well-known plugin identifiers
pub mod common_plugins {
    pub const ANDROID_APPLICATION: &str = "com.android.application";
    pub const ANDROID_LIBRARY: &str = "com.android.library";
    pub const KOTLIN_ANDROID: &str = "kotlin-android";
    pub const KOTLIN_ANDROID_QUALIFIED: &str = "org.jetbrains.kotlin.android";
    pub const FLUTTER_GRADLE: &str = "dev.flutter.flutter-gradle-plugin";
    pub const GOOGLE_SERVICES: &str = "com.google.gms.google-services";
}
