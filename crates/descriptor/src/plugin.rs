//! Build plugins

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ValidationError;

static PLUGIN_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*(\.[A-Za-z0-9_\-]+)*$").expect("valid regex"));

/// A plugin applied to the app module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plugin {
    /// Plugin identifier, e.g. `com.android.application`
    pub id: String,
    /// Applied after the build script is evaluated (`apply(plugin = ...)`)
    /// rather than from the `plugins {}` block
    pub legacy_apply: bool,
}

impl Plugin {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            legacy_apply: false,
        }
    }

    pub fn legacy(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            legacy_apply: true,
        }
    }
}

/// Check plugin ids and reject duplicates, preserving declaration order
pub fn validate_plugins(plugins: &[Plugin]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for plugin in plugins {
        if !PLUGIN_ID.is_match(&plugin.id) {
            return Err(ValidationError::InvalidPluginId(plugin.id.clone()));
        }
        if !seen.insert(plugin.id.as_str()) {
            return Err(ValidationError::DuplicatePlugin(plugin.id.clone()));
        }
    }
    Ok(())
}
