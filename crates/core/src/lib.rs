//! droidspec core - shared error type and loader settings

pub mod config;
pub mod error;

pub use config::LoaderSettings;
pub use error::{DroidSpecError, Result};

/// droidspec version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "droidspec";
