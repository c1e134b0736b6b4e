//! Java language levels and compile options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Java language level (`JavaVersion.VERSION_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum JavaVersion {
    #[default]
    Java8,
    Java11,
    Java17,
    Java21,
}

impl JavaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            JavaVersion::Java8 => "1.8",
            JavaVersion::Java11 => "11",
            JavaVersion::Java17 => "17",
            JavaVersion::Java21 => "21",
        }
    }

    /// Feature release number (8, 11, 17, 21)
    pub fn feature_release(&self) -> u32 {
        match self {
            JavaVersion::Java8 => 8,
            JavaVersion::Java11 => 11,
            JavaVersion::Java17 => 17,
            JavaVersion::Java21 => 21,
        }
    }

    fn from_feature_release(release: u32) -> Option<Self> {
        match release {
            8 => Some(JavaVersion::Java8),
            11 => Some(JavaVersion::Java11),
            17 => Some(JavaVersion::Java17),
            21 => Some(JavaVersion::Java21),
            _ => None,
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JavaVersion {
    type Err = String;

    /// Accepts `1.8`, `8`, `11`, `VERSION_1_8`, `VERSION_11` and friends
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unqualified = trimmed.strip_prefix("JavaVersion.").unwrap_or(trimmed);
        let bare = unqualified
            .strip_prefix("VERSION_")
            .map(|v| v.replace('_', "."))
            .unwrap_or_else(|| unqualified.to_string());
        let release = bare.strip_prefix("1.").unwrap_or(&bare);

        release
            .parse::<u32>()
            .ok()
            .and_then(Self::from_feature_release)
            .ok_or_else(|| format!("unsupported Java version '{}'", s))
    }
}

impl Serialize for JavaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JavaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Release(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Release(release) => JavaVersion::from_feature_release(release)
                .ok_or_else(|| serde::de::Error::custom(format!("unsupported Java version {}", release))),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Resolved `compileOptions` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Language level of the sources
    pub source_compatibility: JavaVersion,
    /// Bytecode level produced
    pub target_compatibility: JavaVersion,
    /// Inject core library desugaring shims
    pub core_library_desugaring: bool,
}

/// Resolved `kotlinOptions` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KotlinOptions {
    pub jvm_target: Option<JavaVersion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_java_versions() {
        assert_eq!("1.8".parse::<JavaVersion>().unwrap(), JavaVersion::Java8);
        assert_eq!("8".parse::<JavaVersion>().unwrap(), JavaVersion::Java8);
        assert_eq!("VERSION_1_8".parse::<JavaVersion>().unwrap(), JavaVersion::Java8);
        assert_eq!("VERSION_11".parse::<JavaVersion>().unwrap(), JavaVersion::Java11);
        assert_eq!("JavaVersion.VERSION_17".parse::<JavaVersion>().unwrap(), JavaVersion::Java17);
        assert_eq!("21".parse::<JavaVersion>().unwrap(), JavaVersion::Java21);
        assert!("9".parse::<JavaVersion>().is_err());
        assert!("latest".parse::<JavaVersion>().is_err());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        #[derive(Deserialize)]
        struct Holder {
            a: JavaVersion,
            b: JavaVersion,
        }

        let holder: Holder = toml::from_str("a = 11\nb = \"VERSION_17\"").unwrap();
        assert_eq!(holder.a, JavaVersion::Java11);
        assert_eq!(holder.b, JavaVersion::Java17);

        assert!(toml::from_str::<Holder>("a = 9\nb = \"11\"").is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(JavaVersion::Java8 < JavaVersion::Java11);
        assert_eq!(JavaVersion::default(), JavaVersion::Java8);
        assert_eq!(JavaVersion::Java11.to_string(), "11");
    }
}
