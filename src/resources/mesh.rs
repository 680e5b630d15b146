use glam::{Mat4, UVec4, Vec2, Vec3, Vec4};

use crate::renderer::{AttributeData, RenderBackend, attribute_names};
use crate::scene::pose::Pose;
use crate::scene::skeleton::Skeleton;

/// Skinned triangle mesh.
///
/// Per-vertex arrays are parallel: `position[i]`, `normal[i]`,
/// `influences[i]` (four joint indices) and `weights[i]` (four weights that
/// should sum to 1) all describe vertex `i`. Weights are never renormalized;
/// malformed input deforms visibly but does not panic as long as the joint
/// indices are in range.
///
/// The skinned arrays are scratch output of [`cpu_skin`](Self::cpu_skin),
/// rebuilt every call.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,

    // === Rest-pose data ===
    pub position: Vec<Vec3>,
    pub normal: Vec<Vec3>,
    pub tex_coord: Vec<Vec2>,
    pub weights: Vec<Vec4>,
    pub influences: Vec<UVec4>,
    pub indices: Vec<u32>,

    // === CPU skinning output ===
    skinned_position: Vec<Vec3>,
    skinned_normal: Vec<Vec3>,
    pose_palette: Vec<Mat4>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.position.len()
    }

    #[must_use]
    pub fn skinned_position(&self) -> &[Vec3] {
        &self.skinned_position
    }

    #[must_use]
    pub fn skinned_normal(&self) -> &[Vec3] {
        &self.skinned_normal
    }

    /// Deforms every vertex by `pose`, relative to the skeleton's bind pose.
    ///
    /// For each vertex the four `palette[j] * inv_bind[j]` matrices are scaled
    /// by their weights and summed. The sum is applied to the position as a
    /// point and to the normal as a direction. Normals are not renormalized,
    /// so non-uniform scale skews them.
    pub fn cpu_skin(&mut self, skeleton: &Skeleton, pose: &Pose) {
        let vertex_count = self.position.len();
        if vertex_count == 0 {
            return;
        }

        self.skinned_position.resize(vertex_count, Vec3::ZERO);
        self.skinned_normal.resize(vertex_count, Vec3::ZERO);
        pose.matrix_palette(&mut self.pose_palette);

        let inv_bind_pose = skeleton.inv_bind_pose();

        for i in 0..vertex_count {
            let joints = self.influences[i];
            let weights = self.weights[i];

            let skin = skin_matrix(&self.pose_palette, inv_bind_pose, joints, weights);

            self.skinned_position[i] = skin.transform_point3(self.position[i]);
            self.skinned_normal[i] = self
                .normal
                .get(i)
                .map_or(Vec3::ZERO, |&n| skin.transform_vector3(n));
        }
    }

    /// Uploads the rest-pose arrays. Empty arrays are skipped.
    pub fn upload(&self, backend: &mut impl RenderBackend) {
        let attributes = [
            (attribute_names::POSITION, AttributeData::Vec3(&self.position)),
            (attribute_names::NORMAL, AttributeData::Vec3(&self.normal)),
            (attribute_names::TEX_COORD, AttributeData::Vec2(&self.tex_coord)),
            (attribute_names::WEIGHTS, AttributeData::Vec4(&self.weights)),
            (attribute_names::JOINTS, AttributeData::UVec4(&self.influences)),
        ];

        for (name, data) in attributes {
            if !data.is_empty() {
                backend.upload_attribute(name, data);
            }
        }

        if !self.indices.is_empty() {
            backend.upload_indices(&self.indices);
        }
    }

    /// Uploads the output of the last [`cpu_skin`](Self::cpu_skin) in place of
    /// the rest positions and normals.
    pub fn upload_skinned(&self, backend: &mut impl RenderBackend) {
        if !self.skinned_position.is_empty() {
            backend.upload_attribute(
                attribute_names::POSITION,
                AttributeData::Vec3(&self.skinned_position),
            );
        }
        if !self.skinned_normal.is_empty() {
            backend.upload_attribute(
                attribute_names::NORMAL,
                AttributeData::Vec3(&self.skinned_normal),
            );
        }
    }
}

/// Weighted sum of the four influencing joints' skin matrices.
#[inline]
#[must_use]
pub fn skin_matrix(palette: &[Mat4], inv_bind_pose: &[Mat4], joints: UVec4, weights: Vec4) -> Mat4 {
    let weighted = |joint: u32, weight: f32| {
        let j = joint as usize;
        (palette[j] * inv_bind_pose[j]) * weight
    };

    weighted(joints.x, weights.x)
        + weighted(joints.y, weights.y)
        + weighted(joints.z, weights.z)
        + weighted(joints.w, weights.w)
}
