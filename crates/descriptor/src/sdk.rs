//! SDK level bounds

use tracing::debug;

use crate::ValidationError;

/// Resolved SDK levels of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkVersions {
    /// Lowest API level the app installs on
    pub min: u32,
    /// API level the app is tested against
    pub target: u32,
    /// API level used to compile
    pub compile: u32,
}

impl SdkVersions {
    /// Build and check `min <= target <= compile`, each within `1..=max_level`
    pub fn new(min: u32, target: u32, compile: u32, max_level: u32) -> Result<Self, ValidationError> {
        for (field, value) in [("minSdk", min), ("targetSdk", target), ("compileSdk", compile)] {
            if value == 0 || value > max_level {
                return Err(ValidationError::SdkOutOfRange {
                    field,
                    value,
                    max: max_level,
                });
            }
        }

        if min > target {
            return Err(ValidationError::MinAboveTarget { min, target });
        }
        if target > compile {
            return Err(ValidationError::TargetAboveCompile { target, compile });
        }

        debug!("SDK range {}..={} (compile {})", min, target, compile);
        Ok(Self { min, target, compile })
    }
}

/// Marketing version of an API level, when known
pub fn android_release(level: u32) -> Option<&'static str> {
    match level {
        21 => Some("5.0"),
        22 => Some("5.1"),
        23 => Some("6.0"),
        24 => Some("7.0"),
        25 => Some("7.1"),
        26 => Some("8.0"),
        27 => Some("8.1"),
        28 => Some("9"),
        29 => Some("10"),
        30 => Some("11"),
        31 => Some("12"),
        32 => Some("12L"),
        33 => Some("13"),
        34 => Some("14"),
        35 => Some("15"),
        36 => Some("16"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let sdk = SdkVersions::new(26, 33, 35, 100).unwrap();
        assert_eq!((sdk.min, sdk.target, sdk.compile), (26, 33, 35));
    }

    #[test]
    fn test_equal_levels_allowed() {
        assert!(SdkVersions::new(35, 35, 35, 100).is_ok());
    }

    #[test]
    fn test_min_above_target() {
        let err = SdkVersions::new(40, 33, 35, 100).unwrap_err();
        assert_eq!(err, ValidationError::MinAboveTarget { min: 40, target: 33 });
    }

    #[test]
    fn test_target_above_compile() {
        let err = SdkVersions::new(21, 35, 34, 100).unwrap_err();
        assert_eq!(err, ValidationError::TargetAboveCompile { target: 35, compile: 34 });
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            SdkVersions::new(0, 33, 35, 100),
            Err(ValidationError::SdkOutOfRange { field: "minSdk", .. })
        ));
        assert!(matches!(
            SdkVersions::new(21, 33, 135, 100),
            Err(ValidationError::SdkOutOfRange { field: "compileSdk", value: 135, .. })
        ));
    }

    #[test]
    fn test_android_release() {
        assert_eq!(android_release(33), Some("13"));
        assert_eq!(android_release(3), None);
    }
}
