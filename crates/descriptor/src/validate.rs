//! Validation rules
//!
//! Each rule returns the first violation it finds. Rules run in a fixed
//! order so the same document always reports the same error.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::dependency::{Dependency, DependencyConfiguration};
use crate::document::DependencyEntry;
use crate::java::{CompileOptions, KotlinOptions};
use crate::ValidationError;

static JAVA_PACKAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)+$").expect("valid regex")
});

static NDK_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+){1,3}$").expect("valid regex"));

/// Unwrap a required field
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Raise a finding, or only log it when it is lenient-mode tolerated
pub fn report(finding: ValidationError, strict: bool) -> Result<(), ValidationError> {
    if strict || !finding.is_strict_only() {
        return Err(finding);
    }
    warn!("{}", finding);
    Ok(())
}

/// Dotted Java package name with at least two segments
pub fn check_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if JAVA_PACKAGE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

pub fn check_ndk_version(version: &str) -> Result<(), ValidationError> {
    if NDK_VERSION.is_match(version) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNdkVersion(version.to_string()))
    }
}

/// Parse dependency entries in order, rejecting duplicates
pub fn parse_dependencies(entries: &[DependencyEntry]) -> Result<Vec<Dependency>, ValidationError> {
    let mut seen = HashSet::new();
    let mut dependencies = Vec::with_capacity(entries.len());

    for entry in entries {
        let dependency = Dependency::parse(&entry.configuration, &entry.coordinate)?;
        if !seen.insert(dependency.key()) {
            return Err(ValidationError::DuplicateDependency(dependency.to_string()));
        }
        dependencies.push(dependency);
    }

    Ok(dependencies)
}

/// Desugaring needs exactly one desugaring library, and a library without
/// desugaring is dead weight
pub fn check_desugaring(
    options: &CompileOptions,
    dependencies: &[Dependency],
    strict: bool,
) -> Result<(), ValidationError> {
    let libraries: Vec<&Dependency> = dependencies
        .iter()
        .filter(|d| d.configuration == DependencyConfiguration::CoreLibraryDesugaring)
        .collect();

    if options.core_library_desugaring {
        return match libraries.len() {
            0 => Err(ValidationError::DesugaringLibraryMissing),
            1 => Ok(()),
            n => Err(ValidationError::MultipleDesugaringLibraries(n)),
        };
    }

    match libraries.first() {
        Some(library) => report(
            ValidationError::DesugaringDisabled(library.coordinate.to_string()),
            strict,
        ),
        None => Ok(()),
    }
}

/// Kotlin and Java should emit the same bytecode level
pub fn check_jvm_target(
    compile: &CompileOptions,
    kotlin: &KotlinOptions,
    strict: bool,
) -> Result<(), ValidationError> {
    match kotlin.jvm_target {
        Some(jvm_target) if jvm_target != compile.target_compatibility => report(
            ValidationError::JvmTargetMismatch {
                jvm_target,
                target_compat: compile.target_compatibility,
            },
            strict,
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::JavaVersion;

    fn entry(configuration: &str, coordinate: &str) -> DependencyEntry {
        DependencyEntry {
            configuration: configuration.into(),
            coordinate: coordinate.into(),
        }
    }

    fn desugar_lib() -> Vec<Dependency> {
        parse_dependencies(&[entry("coreLibraryDesugaring", "com.android.tools:desugar_jdk_libs:2.0.4")])
            .unwrap()
    }

    fn options(desugaring: bool) -> CompileOptions {
        CompileOptions {
            source_compatibility: JavaVersion::Java11,
            target_compatibility: JavaVersion::Java11,
            core_library_desugaring: desugaring,
        }
    }

    #[test]
    fn test_identifiers() {
        assert!(check_identifier("namespace", "com.miniProjet.mini_projet").is_ok());
        assert!(check_identifier("namespace", "app").is_err());
        assert!(check_identifier("namespace", "com.1example.app").is_err());
        assert!(check_identifier("namespace", "com.example-app").is_err());
    }

    #[test]
    fn test_ndk_version() {
        assert!(check_ndk_version("27.0.12077973").is_ok());
        assert!(check_ndk_version("25.1").is_ok());
        assert_eq!(
            check_ndk_version("r27").unwrap_err(),
            ValidationError::InvalidNdkVersion("r27".into())
        );
    }

    #[test]
    fn test_duplicate_dependency() {
        let err = parse_dependencies(&[
            entry("implementation", "androidx.core:core-ktx:1.12.0"),
            entry("implementation", "androidx.core:core-ktx:1.13.0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateDependency(_)));

        // Same module under another configuration is fine
        assert!(parse_dependencies(&[
            entry("implementation", "androidx.core:core-ktx:1.12.0"),
            entry("testImplementation", "androidx.core:core-ktx:1.12.0"),
        ])
        .is_ok());
    }

    #[test]
    fn test_desugaring_rules() {
        assert!(check_desugaring(&options(true), &desugar_lib(), false).is_ok());
        assert_eq!(
            check_desugaring(&options(true), &[], false).unwrap_err(),
            ValidationError::DesugaringLibraryMissing
        );

        let two = parse_dependencies(&[
            entry("coreLibraryDesugaring", "com.android.tools:desugar_jdk_libs:2.0.4"),
            entry("coreLibraryDesugaring", "com.android.tools:desugar_jdk_libs_nio:2.0.4"),
        ])
        .unwrap();
        assert_eq!(
            check_desugaring(&options(true), &two, false).unwrap_err(),
            ValidationError::MultipleDesugaringLibraries(2)
        );
    }

    #[test]
    fn test_desugaring_disabled_is_strict_only() {
        assert!(check_desugaring(&options(false), &desugar_lib(), false).is_ok());
        assert!(matches!(
            check_desugaring(&options(false), &desugar_lib(), true),
            Err(ValidationError::DesugaringDisabled(_))
        ));
    }

    #[test]
    fn test_jvm_target_mismatch() {
        let kotlin = KotlinOptions {
            jvm_target: Some(JavaVersion::Java17),
        };
        assert!(check_jvm_target(&options(true), &kotlin, false).is_ok());
        assert!(check_jvm_target(&options(true), &kotlin, true).is_err());

        let matching = KotlinOptions {
            jvm_target: Some(JavaVersion::Java11),
        };
        assert!(check_jvm_target(&options(true), &matching, true).is_ok());
    }
}
