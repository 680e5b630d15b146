//! Error Types
//!
//! This module defines the error types used by the outer surfaces of the
//! runtime.
//!
//! # Overview
//!
//! The animation core (tracks, clips, poses, skinning) never fails: degenerate
//! input produces a documented default instead. [`MarionetteError`] covers the
//! places where real failures can occur:
//! - Reading asset files and their buffers
//! - glTF parsing and data-URI decoding
//! - Settings (JSON) parsing
//! - Out-of-range references inside imported documents
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, MarionetteError>`.
//!
//! ```rust,ignore
//! use marionette::errors::Result;
//!
//! fn load() -> Result<()> {
//!     let settings = marionette::settings::RuntimeSettings::from_json_str("{}")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the runtime.
#[derive(Error, Debug)]
pub enum MarionetteError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset (file, external buffer) was not found or is not
    /// reachable from the document being loaded.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// An index inside an imported document points past the data it refers to.
    #[error("Asset index out of bounds: {context} (index: {index})")]
    AssetIndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    /// A required attribute or accessor is missing from an imported document.
    #[error("Missing asset data: {0}")]
    MissingData(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base64 decoding error.
    #[cfg(feature = "gltf")]
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// JSON parse error (settings files).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

#[cfg(feature = "gltf")]
impl From<gltf::Error> for MarionetteError {
    fn from(err: gltf::Error) -> Self {
        MarionetteError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, MarionetteError>`.
pub type Result<T> = std::result::Result<T, MarionetteError>;
