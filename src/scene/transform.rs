use glam::{Mat4, Quat, Vec3};

/// Scale components smaller than this invert to zero instead of infinity.
const SCALE_EPSILON: f32 = 1e-6;

/// Tolerance used by [`same_orientation`].
const ORIENTATION_EPSILON: f32 = 1e-5;

/// Joint transform: position, rotation and scale (TRS).
///
/// This is a plain value type. A [`Pose`](crate::scene::Pose) stores one per
/// joint in the joint's parent space; [`Transform::combine`] composes them
/// into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Applies `b` inside the local frame of `a` (`a` is the outer/parent
    /// transform).
    ///
    /// Scale multiplies component-wise, rotations compose parent-first and the
    /// child position is scaled and rotated by the parent before being offset.
    #[must_use]
    pub fn combine(a: &Transform, b: &Transform) -> Transform {
        Transform {
            position: a.position + a.rotation * (a.scale * b.position),
            rotation: a.rotation * b.rotation,
            scale: a.scale * b.scale,
        }
    }

    /// Inverse transform. Near-zero scale components invert to zero.
    #[must_use]
    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        let invert = |s: f32| if s.abs() < SCALE_EPSILON { 0.0 } else { 1.0 / s };
        let scale = Vec3::new(invert(self.scale.x), invert(self.scale.y), invert(self.scale.z));
        let position = rotation * (scale * -self.position);

        Transform {
            position,
            rotation,
            scale,
        }
    }

    /// Blends two transforms: positions and scales are lerped, rotations use a
    /// neighborhood-corrected nlerp.
    #[must_use]
    pub fn mix(a: &Transform, b: &Transform, t: f32) -> Transform {
        let mut b_rotation = b.rotation;
        if a.rotation.dot(b_rotation) < 0.0 {
            b_rotation = -b_rotation;
        }

        Transform {
            position: a.position.lerp(b.position, t),
            rotation: (a.rotation + (b_rotation - a.rotation) * t).normalize(),
            scale: a.scale.lerp(b.scale, t),
        }
    }

    /// Column-major matrix with the scaled rotation basis and the position in
    /// the last column.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decomposes an affine matrix. Shear is lost.
    #[must_use]
    pub fn from_matrix(mat: &Mat4) -> Transform {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Transform {
            position,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    #[must_use]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (self.scale * vector)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Inverts `mat`, falling back to the identity when the matrix is singular.
///
/// A singular matrix typically comes from a joint with a zero scale
/// component. The failure is logged rather than propagated.
#[must_use]
pub fn checked_inverse(mat: &Mat4) -> Mat4 {
    let det = mat.determinant();
    if det == 0.0 || !det.is_finite() {
        log::warn!("Trying to invert a matrix with a zero determinant, using identity");
        return Mat4::IDENTITY;
    }
    mat.inverse()
}

/// True when `a` and `b` describe the same rotation, including the `q` / `-q`
/// double cover.
#[must_use]
pub fn same_orientation(a: Quat, b: Quat) -> bool {
    let a = a.normalize();
    let b = b.normalize();
    (a.dot(b).abs() - 1.0).abs() < ORIENTATION_EPSILON
}
