//! Render collaborator interface
//!
//! The animation core never talks to a graphics API. It hands raw arrays to a
//! [`RenderBackend`] instead:
//!
//! - per-vertex attributes (rest or CPU-skinned) via
//!   [`RenderBackend::upload_attribute`]
//! - index data via [`RenderBackend::upload_indices`]
//! - the pose palette and inverse bind matrices for GPU skinning via
//!   [`RenderBackend::upload_uniform`] (see [`SkinningUniforms`])
//! - the model placement matrix, also as a uniform
//!
//! [`StagingBackend`] keeps byte copies on the CPU, for tests and headless
//! drivers.

pub mod staging;

use glam::{Mat4, UVec4, Vec2, Vec3, Vec4};

use crate::scene::skeleton::Skeleton;

pub use staging::StagingBackend;

/// Attribute names shared with the skinning shaders.
pub mod attribute_names {
    pub const POSITION: &str = "position";
    pub const NORMAL: &str = "normal";
    pub const TEX_COORD: &str = "texCoord";
    pub const WEIGHTS: &str = "weights";
    pub const JOINTS: &str = "joints";
}

/// Uniform names shared with the skinning shaders.
pub mod uniform_names {
    pub const POSE: &str = "pose";
    pub const INV_BIND_POSE: &str = "invBindPose";
    pub const MODEL: &str = "model";
}

/// Borrowed per-vertex data, tagged with its element type.
#[derive(Debug, Clone, Copy)]
pub enum AttributeData<'a> {
    Vec2(&'a [Vec2]),
    Vec3(&'a [Vec3]),
    Vec4(&'a [Vec4]),
    UVec4(&'a [UVec4]),
}

impl AttributeData<'_> {
    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Vec2(v) => v.len(),
            Self::Vec3(v) => v.len(),
            Self::Vec4(v) => v.len(),
            Self::UVec4(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tightly packed bytes, ready for a vertex buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Vec2(v) => bytemuck::cast_slice(v),
            Self::Vec3(v) => bytemuck::cast_slice(v),
            Self::Vec4(v) => bytemuck::cast_slice(v),
            Self::UVec4(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Receives data produced by the animation core.
pub trait RenderBackend {
    fn upload_attribute(&mut self, name: &str, data: AttributeData<'_>);

    fn upload_indices(&mut self, indices: &[u32]);

    fn upload_uniform(&mut self, name: &str, matrices: &[Mat4]);
}

/// The two matrix arrays a skinning vertex shader needs.
#[derive(Debug, Clone, Copy)]
pub struct SkinningUniforms<'a> {
    /// Global joint matrices of the animated pose.
    pub pose: &'a [Mat4],
    pub inv_bind_pose: &'a [Mat4],
}

impl<'a> SkinningUniforms<'a> {
    #[must_use]
    pub fn new(palette: &'a [Mat4], skeleton: &'a Skeleton) -> Self {
        Self {
            pose: palette,
            inv_bind_pose: skeleton.inv_bind_pose(),
        }
    }

    pub fn bind(&self, backend: &mut impl RenderBackend) {
        backend.upload_uniform(uniform_names::POSE, self.pose);
        backend.upload_uniform(uniform_names::INV_BIND_POSE, self.inv_bind_pose);
    }
}
