#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;

pub use animation::{
    AnimationPlayer, Clip, Interpolatable, InterpolationMode, Keyframe, KeyframeTrack,
    QuaternionTrack, ScalarTrack, TransformTrack, VectorTrack,
};
#[cfg(feature = "gltf")]
pub use assets::GltfImporter;
pub use errors::{MarionetteError, Result};
pub use renderer::{AttributeData, RenderBackend, SkinningUniforms, StagingBackend};
pub use resources::Mesh;
pub use scene::{Pose, Skeleton, Transform};
pub use settings::{ImportSettings, RuntimeSettings, SkinningPath};
