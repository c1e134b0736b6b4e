//! droidspec - Android build descriptor loader
//!
//! Reads declarative Android app build descriptors (TOML or JSON), checks
//! them and reconciles drifted copies into one canonical descriptor for an
//! external build orchestrator.
//!
//! ## Architecture
//!
//! - `droidspec-descriptor`: data model, validation, merge and writer
//! - `droidspec-core`: shared error type and loader settings
//!
//! ## Example
//!
//! ```
//! use droidspec::prelude::*;
//!
//! let source = DescriptorSource::toml(
//!     "namespace = \"com.example.app\"\nminSdk = 26\ntargetSdk = 33\ncompileSdk = 35\n",
//! );
//! let config = DescriptorLoader::new().load(&source).unwrap();
//! assert_eq!(config.min_sdk(), 26);
//! ```

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use droidspec_core as core;
pub use droidspec_descriptor as descriptor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidspec_core::{DroidSpecError, LoaderSettings};
    pub use droidspec_descriptor::{
        BuildConfig, BuildDocument, DescriptorFormat, DescriptorLoader, DescriptorSource,
        DescriptorWriter, LoaderOptions, Merge, ValidationError,
    };
}
