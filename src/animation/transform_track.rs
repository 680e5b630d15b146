use crate::animation::tracks::{QuaternionTrack, VectorTrack};
use crate::scene::transform::Transform;

/// Position, rotation and scale curves driving one joint.
///
/// A channel with fewer than two keyframes is not animated: sampling keeps
/// the reference transform's value for it. This is how rotation-only joints
/// compose with the rest or bind pose.
#[derive(Debug, Clone, Default)]
pub struct TransformTrack {
    id: u32,
    position: VectorTrack,
    rotation: QuaternionTrack,
    scale: VectorTrack,
}

impl TransformTrack {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Joint index this track writes to.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    #[must_use]
    pub fn position_track(&self) -> &VectorTrack {
        &self.position
    }

    #[must_use]
    pub fn rotation_track(&self) -> &QuaternionTrack {
        &self.rotation
    }

    #[must_use]
    pub fn scale_track(&self) -> &VectorTrack {
        &self.scale
    }

    pub fn position_track_mut(&mut self) -> &mut VectorTrack {
        &mut self.position
    }

    pub fn rotation_track_mut(&mut self) -> &mut QuaternionTrack {
        &mut self.rotation
    }

    pub fn scale_track_mut(&mut self) -> &mut VectorTrack {
        &mut self.scale
    }

    /// True when at least one channel is animated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.is_animated() || self.rotation.is_animated() || self.scale.is_animated()
    }

    /// Earliest start time of the animated channels, 0 when none is animated.
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.animated_ranges()
            .map(|(start, _)| start)
            .reduce(f32::min)
            .unwrap_or(0.0)
    }

    /// Latest end time of the animated channels, 0 when none is animated.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.animated_ranges()
            .map(|(_, end)| end)
            .reduce(f32::max)
            .unwrap_or(0.0)
    }

    fn animated_ranges(&self) -> impl Iterator<Item = (f32, f32)> {
        let position = self
            .position
            .is_animated()
            .then(|| (self.position.start_time(), self.position.end_time()));
        let rotation = self
            .rotation
            .is_animated()
            .then(|| (self.rotation.start_time(), self.rotation.end_time()));
        let scale = self
            .scale
            .is_animated()
            .then(|| (self.scale.start_time(), self.scale.end_time()));

        [position, rotation, scale].into_iter().flatten()
    }

    /// Samples every animated channel, keeping `reference` for the others.
    #[must_use]
    pub fn sample(&self, reference: &Transform, time: f32, looping: bool) -> Transform {
        let mut result = *reference;

        if self.position.is_animated() {
            result.position = self.position.sample(time, looping);
        }
        if self.rotation.is_animated() {
            result.rotation = self.rotation.sample(time, looping);
        }
        if self.scale.is_animated() {
            result.scale = self.scale.sample(time, looping);
        }

        result
    }
}
