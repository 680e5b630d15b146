use glam::Mat4;

use crate::scene::transform::Transform;

/// Local transforms of every joint of a skeleton at one instant.
///
/// The hierarchy is stored as a flat parent-index array parallel to the
/// transforms: `parent(i) == None` marks a root. Parents may appear after
/// their children in the array. The graph must be acyclic; this is a
/// precondition established by whoever builds the pose (normally the
/// importer), checked only in debug builds.
///
/// `Clone` is a deep copy of both arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    joints: Vec<Transform>,
    parents: Vec<Option<usize>>,
}

impl Pose {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A pose of `joint_count` root joints with identity transforms.
    #[must_use]
    pub fn with_joint_count(joint_count: usize) -> Self {
        let mut pose = Self::new();
        pose.resize(joint_count);
        pose
    }

    /// Grows with identity root joints, or truncates.
    pub fn resize(&mut self, joint_count: usize) {
        self.joints.resize(joint_count, Transform::IDENTITY);
        self.parents.resize(joint_count, None);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn local_transform(&self, index: usize) -> Transform {
        self.joints[index]
    }

    #[inline]
    pub fn set_local_transform(&mut self, index: usize, transform: Transform) {
        self.joints[index] = transform;
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents[index]
    }

    #[inline]
    pub fn set_parent(&mut self, index: usize, parent: Option<usize>) {
        self.parents[index] = parent;
    }

    /// All local transforms, indexed by joint.
    #[inline]
    #[must_use]
    pub fn local_transforms(&self) -> &[Transform] {
        &self.joints
    }

    /// World-space transform of joint `index`.
    ///
    /// Starts from the joint's local transform and wraps it with each ancestor
    /// in turn, so the result is `root * ... * parent * local`. Every call walks
    /// the full parent chain; nothing is cached between joints.
    #[must_use]
    pub fn global_transform(&self, index: usize) -> Transform {
        let mut result = self.joints[index];
        let mut parent = self.parents[index];

        #[cfg(debug_assertions)]
        let mut steps = 0usize;

        while let Some(p) = parent {
            #[cfg(debug_assertions)]
            {
                steps += 1;
                debug_assert!(
                    steps <= self.joints.len(),
                    "cycle in pose hierarchy reached from joint {index}"
                );
            }

            result = Transform::combine(&self.joints[p], &result);
            parent = self.parents[p];
        }

        result
    }

    /// Fills `out` with the global matrix of every joint, resizing it to the
    /// joint count when needed.
    pub fn matrix_palette(&self, out: &mut Vec<Mat4>) {
        let size = self.len();
        if out.len() != size {
            out.resize(size, Mat4::IDENTITY);
        }

        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.global_transform(i).to_matrix();
        }
    }
}
