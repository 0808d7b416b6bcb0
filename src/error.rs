// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for the desktop pet
//!
//! Errors propagate with `?` inside the crate. The chat path and the GUI
//! never surface them to the user directly: they are turned into a
//! scripted bubble line or a log entry at the boundary.

use thiserror::Error;

/// Main error type for pet operations
#[derive(Error, Debug)]
pub enum PetError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model file missing or unusable
    #[error("Model error: {0}")]
    Model(String),

    /// Inference backend failure
    #[error("Inference error: {0}")]
    Inference(String),

    /// Auto-start registration failure
    #[error("Auto-start error: {0}")]
    AutoStart(String),

    /// Desktop window errors
    #[error("GUI error: {0}")]
    Gui(String),
}

/// Result type alias for pet operations
pub type Result<T> = std::result::Result<T, PetError>;

impl From<eframe::Error> for PetError {
    fn from(err: eframe::Error) -> Self {
        PetError::Gui(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_display() {
        let err = PetError::Model("not found".to_string());
        assert!(err.to_string().contains("Model error"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_inference_error_display() {
        let err = PetError::Inference("decode failed".to_string());
        assert_eq!(err.to_string(), "Inference error: decode failed");
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PetError = io_err.into();
        assert!(matches!(err, PetError::Io(_)));
    }

    #[test]
    fn test_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PetError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
