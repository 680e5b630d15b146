pub mod values;
pub mod tracks;
pub mod transform_track;
pub mod clip;
pub mod player;

pub use values::Interpolatable;
pub use tracks::{
    InterpolationMode, Keyframe, KeyframeTrack, QuaternionTrack, ScalarTrack, VectorTrack,
};
pub use transform_track::TransformTrack;
pub use clip::Clip;
pub use player::AnimationPlayer;
