use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    /// Source spreadsheet could not be read or parsed.
    LoadError(String),
    /// A row operation was attempted before any dataset was loaded.
    NotLoaded(String),
    /// Row index outside the loaded dataset.
    RangeError(String),
    /// Missing or empty API credential, fatal at client construction.
    CredentialError(String),
    /// Transport or service failure while calling the model.
    GenerationError(String),
    /// Model reply did not decode as the required schema.
    DecodeError(String),
    /// A processing run is already active, or no run exists to act on.
    Busy(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::LoadError(msg) => write!(f, "Load error: {}", msg),
            AppError::NotLoaded(msg) => write!(f, "No data loaded: {}", msg),
            AppError::RangeError(msg) => write!(f, "Range error: {}", msg),
            AppError::CredentialError(msg) => write!(f, "Credential error: {}", msg),
            AppError::GenerationError(msg) => write!(f, "Generation error: {}", msg),
            AppError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            AppError::Busy(msg) => write!(f, "Busy: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
