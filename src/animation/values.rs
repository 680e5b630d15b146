use glam::{Quat, Vec3};

/// Element kinds a [`KeyframeTrack`](crate::animation::KeyframeTrack) can
/// carry.
///
/// Implementors only supply the arithmetic (`add`, `scale`) and, for
/// quaternions, neighborhood correction and renormalization. Linear and
/// Hermite interpolation are shared by every element kind.
pub trait Interpolatable: Copy {
    /// Value of a track that cannot be sampled. For quaternions this is the
    /// all-zero quaternion, not a valid rotation.
    fn zero() -> Self;

    fn add(self, other: Self) -> Self;

    fn scale(self, factor: f32) -> Self;

    /// Returns `value`, flipped if needed so that it lies in the same
    /// hemisphere as `reference`.
    #[inline]
    fn neighborhood(_reference: Self, value: Self) -> Self {
        value
    }

    /// Applied to stored key values and to blended results.
    #[inline]
    fn renormalize(self) -> Self {
        self
    }

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let end = Self::neighborhood(start, end);
        start.scale(1.0 - t).add(end.scale(t)).renormalize()
    }

    /// Cubic Hermite between `v0` and `v1`.
    ///
    /// Tangents are stored per unit of normalized frame time, so they are
    /// scaled by the frame duration `dt` first.
    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;

        let h1 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h2 = -2.0 * t3 + 3.0 * t2;
        let h3 = t3 - 2.0 * t2 + t;
        let h4 = t3 - t2;

        let m0 = out_tangent0.scale(dt);
        let m1 = in_tangent1.scale(dt);
        let v1 = Self::neighborhood(v0, v1);

        v0.scale(h1)
            .add(v1.scale(h2))
            .add(m0.scale(h3))
            .add(m1.scale(h4))
            .renormalize()
    }
}

impl Interpolatable for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn scale(self, factor: f32) -> Self {
        self * factor
    }
}

impl Interpolatable for Vec3 {
    #[inline]
    fn zero() -> Self {
        Vec3::ZERO
    }

    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn scale(self, factor: f32) -> Self {
        self * factor
    }
}

impl Interpolatable for Quat {
    #[inline]
    fn zero() -> Self {
        Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn scale(self, factor: f32) -> Self {
        self * factor
    }

    #[inline]
    fn neighborhood(reference: Self, value: Self) -> Self {
        if reference.dot(value) < 0.0 { -value } else { value }
    }

    #[inline]
    fn renormalize(self) -> Self {
        self.normalize()
    }
}
