//! Runtime & Import Configuration
//!
//! Two small configuration structs, both `serde`-deserializable so they can be
//! shipped as JSON next to the assets:
//!
//! - [`RuntimeSettings`]: how an [`AnimationPlayer`](crate::animation::AnimationPlayer)
//!   advances time and which skinning path it feeds.
//! - [`ImportSettings`]: how the glTF importer fills gaps in source documents.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use marionette::settings::{RuntimeSettings, SkinningPath};
//!
//! // Default: GPU skinning, real-time playback, clip decides looping
//! let settings = RuntimeSettings::default();
//!
//! // Half-speed CPU skinning, always looping
//! let settings = RuntimeSettings {
//!     skinning: SkinningPath::Cpu,
//!     time_scale: 0.5,
//!     looping_override: Some(true),
//! };
//!
//! // Missing fields fall back to their defaults
//! let settings = RuntimeSettings::from_json_str(r#"{ "skinning": "cpu" }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ---------------------------------------------------------------------------
// SkinningPath
// ---------------------------------------------------------------------------

/// Where vertices are deformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinningPath {
    /// The pose palette and inverse bind matrices are handed to the renderer
    /// and the vertex shader blends them.
    #[default]
    Gpu,
    /// Vertices are skinned on the CPU every frame and re-uploaded.
    Cpu,
}

// ---------------------------------------------------------------------------
// RuntimeSettings
// ---------------------------------------------------------------------------

/// Playback configuration.
///
/// | Field              | Description                                   | Default |
/// |--------------------|-----------------------------------------------|---------|
/// | `skinning`         | Skinning path                                 | `Gpu`   |
/// | `time_scale`       | Multiplier applied to every frame delta       | `1.0`   |
/// | `looping_override` | Forces looping on/off instead of the clip flag | `None`  |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub skinning: SkinningPath,
    pub time_scale: f32,
    pub looping_override: Option<bool>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            skinning: SkinningPath::Gpu,
            time_scale: 1.0,
            looping_override: None,
        }
    }
}

impl RuntimeSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// ImportSettings
// ---------------------------------------------------------------------------

/// Importer configuration.
///
/// | Field                       | Description                                 | Default        |
/// |-----------------------------|---------------------------------------------|----------------|
/// | `fallback_joint_name`       | Name given to unnamed nodes                  | `"EMPTY NODE"` |
/// | `repair_degenerate_normals` | Replace near-zero normals with +Y            | `true`         |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub fallback_joint_name: String,
    pub repair_degenerate_normals: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            fallback_joint_name: "EMPTY NODE".to_string(),
            repair_degenerate_normals: true,
        }
    }
}

impl ImportSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
