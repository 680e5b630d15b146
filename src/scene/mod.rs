//! Joint hierarchy: transforms, poses and skeletons.

pub mod pose;
pub mod skeleton;
pub mod transform;

pub use pose::Pose;
pub use skeleton::Skeleton;
pub use transform::{Transform, checked_inverse, same_orientation};
