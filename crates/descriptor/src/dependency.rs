//! Dependency coordinates
//!
//! Maven-style `group:artifact:version[:classifier][@extension]` coordinates
//! and the Gradle configuration they are declared under.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ValidationError;

static NAME_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("valid regex"));

static VERSION_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.+\-\[\](),]+$").expect("valid regex"));

/// Gradle dependency configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyConfiguration {
    Implementation,
    Api,
    CompileOnly,
    RuntimeOnly,
    TestImplementation,
    AndroidTestImplementation,
    CoreLibraryDesugaring,
}

impl DependencyConfiguration {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyConfiguration::Implementation => "implementation",
            DependencyConfiguration::Api => "api",
            DependencyConfiguration::CompileOnly => "compileOnly",
            DependencyConfiguration::RuntimeOnly => "runtimeOnly",
            DependencyConfiguration::TestImplementation => "testImplementation",
            DependencyConfiguration::AndroidTestImplementation => "androidTestImplementation",
            DependencyConfiguration::CoreLibraryDesugaring => "coreLibraryDesugaring",
        }
    }

    /// Whether the dependency ends up in the packaged app
    pub fn is_packaged(&self) -> bool {
        matches!(
            self,
            DependencyConfiguration::Implementation
                | DependencyConfiguration::Api
                | DependencyConfiguration::RuntimeOnly
                | DependencyConfiguration::CoreLibraryDesugaring
        )
    }
}

impl fmt::Display for DependencyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyConfiguration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "implementation" => Ok(DependencyConfiguration::Implementation),
            "api" => Ok(DependencyConfiguration::Api),
            "compileOnly" => Ok(DependencyConfiguration::CompileOnly),
            "runtimeOnly" => Ok(DependencyConfiguration::RuntimeOnly),
            "testImplementation" => Ok(DependencyConfiguration::TestImplementation),
            "androidTestImplementation" => Ok(DependencyConfiguration::AndroidTestImplementation),
            "coreLibraryDesugaring" => Ok(DependencyConfiguration::CoreLibraryDesugaring),
            other => Err(ValidationError::UnknownConfiguration(other.to_string())),
        }
    }
}

/// Parsed library coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub classifier: Option<String>,
    pub extension: Option<String>,
}

impl Coordinate {
    /// `group:artifact`, the identity used for duplicate detection
    pub fn module(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    fn malformed(coordinate: &str, reason: impl Into<String>) -> ValidationError {
        ValidationError::MalformedCoordinate {
            coordinate: coordinate.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for Coordinate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, extension) = match s.split_once('@') {
            Some((body, ext)) => {
                if !NAME_SEGMENT.is_match(ext) {
                    return Err(Self::malformed(s, "invalid extension"));
                }
                (body, Some(ext.to_string()))
            }
            None => (s, None),
        };

        let parts: Vec<&str> = body.split(':').collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(Self::malformed(
                s,
                format!("expected group:artifact:version, found {} segment(s)", parts.len()),
            ));
        }

        let names = [("group", parts[0]), ("artifact", parts[1])];
        for (label, value) in names {
            if value.is_empty() {
                return Err(Self::malformed(s, format!("empty {}", label)));
            }
            if !NAME_SEGMENT.is_match(value) {
                return Err(Self::malformed(s, format!("invalid characters in {}", label)));
            }
        }

        if parts[2].is_empty() {
            return Err(Self::malformed(s, "empty version"));
        }
        if !VERSION_SEGMENT.is_match(parts[2]) {
            return Err(Self::malformed(s, "invalid characters in version"));
        }

        let classifier = match parts.get(3) {
            Some(c) if !NAME_SEGMENT.is_match(c) => {
                return Err(Self::malformed(s, "invalid classifier"));
            }
            Some(c) => Some(c.to_string()),
            None => None,
        };

        Ok(Self {
            group: parts[0].to_string(),
            artifact: parts[1].to_string(),
            version: parts[2].to_string(),
            classifier,
            extension,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
        if let Some(ref classifier) = self.classifier {
            write!(f, ":{}", classifier)?;
        }
        if let Some(ref ext) = self.extension {
            write!(f, "@{}", ext)?;
        }
        Ok(())
    }
}

/// A declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub configuration: DependencyConfiguration,
    pub coordinate: Coordinate,
}

impl Dependency {
    pub fn new(configuration: DependencyConfiguration, coordinate: Coordinate) -> Self {
        Self { configuration, coordinate }
    }

    /// Parse a configuration name and a coordinate string
    pub fn parse(configuration: &str, coordinate: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            configuration: configuration.parse()?,
            coordinate: coordinate.parse()?,
        })
    }

    /// Key used to reject duplicates: configuration plus module
    pub fn key(&self) -> String {
        format!("{} {}", self.configuration, self.coordinate.module())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.configuration, self.coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let c: Coordinate = "com.android.tools:desugar_jdk_libs:2.0.4".parse().unwrap();
        assert_eq!(c.group, "com.android.tools");
        assert_eq!(c.artifact, "desugar_jdk_libs");
        assert_eq!(c.version, "2.0.4");
        assert_eq!(c.classifier, None);
        assert_eq!(c.module(), "com.android.tools:desugar_jdk_libs");
        assert_eq!(c.to_string(), "com.android.tools:desugar_jdk_libs:2.0.4");
    }

    #[test]
    fn test_parse_classifier_and_extension() {
        let c: Coordinate = "org.example:native-lib:1.0:arm64@aar".parse().unwrap();
        assert_eq!(c.classifier.as_deref(), Some("arm64"));
        assert_eq!(c.extension.as_deref(), Some("aar"));
        assert_eq!(c.to_string(), "org.example:native-lib:1.0:arm64@aar");
    }

    #[test]
    fn test_dynamic_versions() {
        assert!("androidx.core:core-ktx:1.+".parse::<Coordinate>().is_ok());
        assert!("androidx.core:core-ktx:[1.9,2.0)".parse::<Coordinate>().is_ok());
    }

    #[test]
    fn test_malformed_coordinates() {
        for bad in [
            "com.google.firebase:firebase-messaging",
            "firebase-messaging",
            ":artifact:1.0",
            "group::1.0",
            "group:artifact:",
            "group:artifact:1.0:c:extra",
            "group name:artifact:1.0",
            "group:artifact:1 0",
            "group:artifact:1.0@",
        ] {
            let err = bad.parse::<Coordinate>().unwrap_err();
            assert!(
                matches!(err, ValidationError::MalformedCoordinate { .. }),
                "{} should be malformed",
                bad
            );
        }
    }

    #[test]
    fn test_configuration_names() {
        assert_eq!(
            "coreLibraryDesugaring".parse::<DependencyConfiguration>().unwrap(),
            DependencyConfiguration::CoreLibraryDesugaring
        );
        assert_eq!(
            "kapt".parse::<DependencyConfiguration>().unwrap_err(),
            ValidationError::UnknownConfiguration("kapt".into())
        );
        assert!(!DependencyConfiguration::TestImplementation.is_packaged());
    }

    #[test]
    fn test_dependency_display_and_key() {
        let dep = Dependency::parse("implementation", "org.tensorflow:tensorflow-lite-gpu:2.12.0").unwrap();
        assert_eq!(dep.to_string(), "implementation(\"org.tensorflow:tensorflow-lite-gpu:2.12.0\")");
        assert_eq!(dep.key(), "implementation org.tensorflow:tensorflow-lite-gpu");
    }
}
