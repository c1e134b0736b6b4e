//! droidspec errors
//!
//! Settings problems and descriptor problems share one type so the binary
//! can tell a bad descriptor from a broken environment.

use thiserror::Error;

use droidspec_descriptor::{LoadError, ValidationError, WriteError};

#[derive(Error, Debug)]
pub enum DroidSpecError {
    #[error("Cannot access settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Malformed settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Cannot encode settings: {0}")]
    SettingsEncode(#[from] toml::ser::Error),

    #[error("Invalid descriptor: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("Cannot write descriptor: {0}")]
    Write(#[from] WriteError),
}

pub type Result<T> = std::result::Result<T, DroidSpecError>;

impl DroidSpecError {
    /// Whether the descriptor itself is at fault, as opposed to the environment
    pub fn is_descriptor_error(&self) -> bool {
        matches!(
            self,
            DroidSpecError::Validation(_) | DroidSpecError::Load(LoadError::Validation(_))
        )
    }

    /// Message printed by the CLI
    pub fn user_message(&self) -> String {
        match self {
            DroidSpecError::Validation(e) | DroidSpecError::Load(LoadError::Validation(e)) => {
                format!("Descriptor rejected: {}", e)
            }
            DroidSpecError::Load(LoadError::Io { path, source }) => {
                format!("Cannot read {}: {}", path.display(), source)
            }
            _ => self.to_string(),
        }
    }
}
