use glam::Mat4;

use crate::scene::pose::Pose;
use crate::scene::transform::checked_inverse;

/// Immutable joint reference data shared by every animated instance of a
/// model.
///
/// Holds the rest pose (the unanimated default), the bind pose (the pose the
/// mesh was skinned against), one inverse bind matrix per joint and the joint
/// names. All four are indexed by joint.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    rest_pose: Pose,
    bind_pose: Pose,

    // Inverse of each joint's *global* bind transform.
    // Transforms mesh-space vertices into joint-local space.
    inv_bind_pose: Vec<Mat4>,

    joint_names: Vec<String>,
}

impl Skeleton {
    #[must_use]
    pub fn new(rest: Pose, bind: Pose, names: Vec<String>) -> Self {
        let mut skeleton = Self::default();
        skeleton.set(rest, bind, names);
        skeleton
    }

    /// Replaces all reference data and recomputes the inverse bind matrices.
    pub fn set(&mut self, rest: Pose, bind: Pose, names: Vec<String>) {
        if rest.len() != bind.len() || names.len() != bind.len() {
            log::warn!(
                "Skeleton arrays disagree: rest={}, bind={}, names={}",
                rest.len(),
                bind.len(),
                names.len()
            );
        }

        self.rest_pose = rest;
        self.bind_pose = bind;
        self.joint_names = names;
        self.update_inverse_bind_pose();
    }

    fn update_inverse_bind_pose(&mut self) {
        let size = self.bind_pose.len();
        self.inv_bind_pose.clear();
        self.inv_bind_pose.reserve(size);

        for i in 0..size {
            let world = self.bind_pose.global_transform(i).to_matrix();
            self.inv_bind_pose.push(checked_inverse(&world));
        }
    }

    #[inline]
    #[must_use]
    pub fn rest_pose(&self) -> &Pose {
        &self.rest_pose
    }

    #[inline]
    #[must_use]
    pub fn bind_pose(&self) -> &Pose {
        &self.bind_pose
    }

    #[inline]
    #[must_use]
    pub fn inv_bind_pose(&self) -> &[Mat4] {
        &self.inv_bind_pose
    }

    #[inline]
    #[must_use]
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    #[must_use]
    pub fn joint_name(&self, index: usize) -> Option<&str> {
        self.joint_names.get(index).map(String::as_str)
    }

    /// Index of the first joint called `name`.
    #[must_use]
    pub fn find_joint(&self, name: &str) -> Option<usize> {
        self.joint_names.iter().position(|n| n == name)
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.bind_pose.len()
    }
}
