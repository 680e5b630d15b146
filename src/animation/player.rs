use glam::Mat4;

use crate::animation::clip::Clip;
use crate::renderer::{RenderBackend, SkinningUniforms, uniform_names};
use crate::resources::mesh::Mesh;
use crate::scene::pose::Pose;
use crate::scene::skeleton::Skeleton;
use crate::scene::transform::Transform;
use crate::settings::{RuntimeSettings, SkinningPath};

/// Playback state of one animated model instance.
///
/// Owns the animated pose and its matrix palette. Clips, the skeleton and the
/// meshes are shared and only borrowed per call, so any number of players can
/// sample the same clip set.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    pub pose: Pose,
    pub palette: Vec<Mat4>,
    pub clip: usize,
    /// Time returned by the last sample, already wrapped or clamped.
    pub playback: f32,
    /// Placement of the whole model.
    pub model: Transform,
    pub settings: RuntimeSettings,
}

impl AnimationPlayer {
    /// A player whose pose starts at the skeleton's rest pose.
    #[must_use]
    pub fn new(skeleton: &Skeleton, settings: RuntimeSettings) -> Self {
        let pose = skeleton.rest_pose().clone();
        let palette = vec![Mat4::IDENTITY; pose.len()];

        Self {
            pose,
            palette,
            clip: 0,
            playback: 0.0,
            model: Transform::IDENTITY,
            settings,
        }
    }

    /// Selects the first clip called `name` and rewinds. Returns false (and
    /// keeps the current clip) when there is none.
    pub fn select_clip_by_name(&mut self, clips: &[Clip], name: &str) -> bool {
        let Some(index) = clips.iter().position(|c| c.name() == name) else {
            log::warn!("No clip named '{name}'");
            return false;
        };

        self.clip = index;
        self.playback = 0.0;
        true
    }

    /// Advances playback by `dt` seconds and samples the current clip into the
    /// pose. Does nothing when the clip index is out of range.
    pub fn update(&mut self, clips: &[Clip], dt: f32) {
        let Some(clip) = clips.get(self.clip) else {
            return;
        };

        let looping = self.settings.looping_override.unwrap_or(clip.looping());
        let time = self.playback + dt * self.settings.time_scale;
        self.playback = clip.sample_with_looping(&mut self.pose, time, looping);
    }

    /// Rebuilds the matrix palette from the current pose.
    pub fn refresh_palette(&mut self) {
        self.pose.matrix_palette(&mut self.palette);
    }

    /// Hands the current pose to the renderer along the configured skinning
    /// path: CPU-skinned vertices for [`SkinningPath::Cpu`], the palette and
    /// inverse bind matrices for [`SkinningPath::Gpu`]. The model matrix is
    /// uploaded on both paths; skinned data stays in model space.
    pub fn submit(
        &mut self,
        skeleton: &Skeleton,
        meshes: &mut [Mesh],
        backend: &mut impl RenderBackend,
    ) {
        match self.settings.skinning {
            SkinningPath::Cpu => {
                for mesh in meshes.iter_mut() {
                    mesh.cpu_skin(skeleton, &self.pose);
                    mesh.upload_skinned(backend);
                }
            }
            SkinningPath::Gpu => {
                self.refresh_palette();
                SkinningUniforms::new(&self.palette, skeleton).bind(backend);
            }
        }

        backend.upload_uniform(uniform_names::MODEL, &[self.model.to_matrix()]);
    }
}
