//! Signing identities and build types
//!
//! Signing configs are declared by name; build types refer to them by name.
//! Passwords never live in the descriptor, only the names of the environment
//! variables the orchestrator reads them from.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::ValidationError;

/// Name of Android's built-in debug signing identity
pub const DEBUG_SIGNING_CONFIG: &str = "debug";

/// Keystore type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStoreType {
    #[default]
    Jks,
    Pkcs12,
}

impl KeyStoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStoreType::Jks => "JKS",
            KeyStoreType::Pkcs12 => "PKCS12",
        }
    }

    /// Parse a declared store type name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "JKS" => Some(KeyStoreType::Jks),
            "PKCS12" | "P12" => Some(KeyStoreType::Pkcs12),
            _ => None,
        }
    }

    /// Guess from the keystore file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("p12") | Some("pfx") => KeyStoreType::Pkcs12,
            _ => KeyStoreType::Jks,
        }
    }
}

/// A named signing identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub name: String,
    /// Keystore file; `None` lets the orchestrator use its default
    pub store_file: Option<PathBuf>,
    pub store_type: KeyStoreType,
    pub key_alias: Option<String>,
    /// Environment variable holding the keystore password
    pub store_password_env: Option<String>,
    /// Environment variable holding the key password
    pub key_password_env: Option<String>,
    /// Supplied by the loader rather than declared
    pub implicit: bool,
}

impl SigningConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_file: None,
            store_type: KeyStoreType::Jks,
            key_alias: None,
            store_password_env: None,
            key_password_env: None,
            implicit: false,
        }
    }

    /// Loader-supplied identity for a name listed as implicitly declared
    pub fn implicit(name: impl Into<String>) -> Self {
        let name = name.into();
        let key_alias = (name == DEBUG_SIGNING_CONFIG).then(|| "androiddebugkey".to_string());
        Self {
            key_alias,
            implicit: true,
            ..Self::new(name)
        }
    }

    /// Whether this is Android's debug identity
    pub fn is_debug(&self) -> bool {
        self.name == DEBUG_SIGNING_CONFIG
    }
}

/// A build type (`debug`, `release`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildType {
    pub name: String,
    /// Name of the signing config this variant uses
    pub signing_config: Option<String>,
    pub minify_enabled: bool,
    pub debuggable: bool,
}

impl BuildType {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let debuggable = name == "debug";
        Self {
            name,
            signing_config: None,
            minify_enabled: false,
            debuggable,
        }
    }

    /// Release build signed with the debug identity
    pub fn signed_with_debug_key(&self) -> bool {
        !self.debuggable && self.signing_config.as_deref() == Some(DEBUG_SIGNING_CONFIG)
    }
}

/// Check every build type's signing reference, adding implicit identities
/// that are referenced but not declared
pub fn resolve_signing_refs(
    signing_configs: &mut IndexMap<String, SigningConfig>,
    build_types: &IndexMap<String, BuildType>,
    implicit_names: &[String],
) -> Result<(), ValidationError> {
    for build_type in build_types.values() {
        let Some(ref name) = build_type.signing_config else {
            continue;
        };

        if signing_configs.contains_key(name) {
            continue;
        }

        if implicit_names.iter().any(|n| n == name) {
            debug!("Using implicit signing config '{}' for '{}'", name, build_type.name);
            signing_configs.insert(name.clone(), SigningConfig::implicit(name.clone()));
            continue;
        }

        return Err(ValidationError::UnknownSigningConfig {
            build_type: build_type.name.clone(),
            name: name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_with(signing: &str) -> IndexMap<String, BuildType> {
        let mut release = BuildType::new("release");
        release.signing_config = Some(signing.to_string());
        IndexMap::from([("release".to_string(), release)])
    }

    #[test]
    fn test_store_type_detection() {
        assert_eq!(KeyStoreType::from_path(Path::new("upload.p12")), KeyStoreType::Pkcs12);
        assert_eq!(KeyStoreType::from_path(Path::new("upload.jks")), KeyStoreType::Jks);
        assert_eq!(KeyStoreType::parse("pkcs12"), Some(KeyStoreType::Pkcs12));
        assert_eq!(KeyStoreType::parse("bks"), None);
    }

    #[test]
    fn test_implicit_debug_identity() {
        let mut configs = IndexMap::new();
        let build_types = release_with("debug");

        resolve_signing_refs(&mut configs, &build_types, &["debug".to_string()]).unwrap();

        let debug = &configs["debug"];
        assert!(debug.implicit);
        assert!(debug.is_debug());
        assert_eq!(debug.key_alias.as_deref(), Some("androiddebugkey"));
        assert!(build_types["release"].signed_with_debug_key());
    }

    #[test]
    fn test_declared_identity() {
        let mut configs = IndexMap::from([("upload".to_string(), SigningConfig::new("upload"))]);
        resolve_signing_refs(&mut configs, &release_with("upload"), &[]).unwrap();
        assert_eq!(configs.len(), 1);
        assert!(!configs["upload"].implicit);
    }

    #[test]
    fn test_undeclared_identity() {
        let mut configs = IndexMap::new();
        let err = resolve_signing_refs(&mut configs, &release_with("upload"), &["debug".to_string()])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownSigningConfig {
                build_type: "release".into(),
                name: "upload".into(),
            }
        );
    }

    #[test]
    fn test_debug_not_implicit_when_disabled() {
        let mut configs = IndexMap::new();
        assert!(resolve_signing_refs(&mut configs, &release_with("debug"), &[]).is_err());
    }
}
