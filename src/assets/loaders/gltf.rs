use std::fs;
use std::path::Path;

use base64::Engine as _;
use glam::{Mat4, Quat, UVec4, Vec2, Vec3, Vec4};
use gltf::animation::Interpolation;
use gltf::animation::util::ReadOutputs;

use crate::animation::{Clip, InterpolationMode, KeyframeTrack};
use crate::errors::{MarionetteError, Result};
use crate::resources::Mesh;
use crate::scene::{Pose, Skeleton, Transform, checked_inverse};
use crate::settings::ImportSettings;

/// Squared length below which an imported normal counts as degenerate.
const DEGENERATE_NORMAL_LENGTH_SQ: f32 = 1e-6;

/// Imports skeletons, clips and skinned meshes from a glTF 2.0 document.
///
/// Every glTF node becomes one joint, indexed by its node index, so clips,
/// poses and mesh influences all share the same joint numbering.
pub struct GltfImporter {
    document: gltf::Document,
    buffers: Vec<Vec<u8>>,
    settings: ImportSettings,
}

impl GltfImporter {
    /// Reads a `.gltf` or `.glb` file. External buffers are resolved relative
    /// to the file's directory.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => {
                MarionetteError::AssetNotFound(path.display().to_string())
            }
            _ => MarionetteError::IoError(err),
        })?;

        let gltf = gltf::Gltf::from_slice_without_validation(&bytes)?;
        Self::from_gltf(gltf, path.parent())
    }

    /// Parses an in-memory document. Only embedded buffers (GLB chunk or
    /// `data:` URIs) can be resolved.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;
        Self::from_gltf(gltf, None)
    }

    fn from_gltf(gltf: gltf::Gltf, base_path: Option<&Path>) -> Result<Self> {
        let gltf::Gltf { document, blob } = gltf;
        let buffers = load_buffers(&document, blob, base_path)?;

        Ok(Self {
            document,
            buffers,
            settings: ImportSettings::default(),
        })
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ImportSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    #[must_use]
    pub fn document(&self) -> &gltf::Document {
        &self.document
    }

    // ------------------------------------------------------------------------
    // Skeleton
    // ------------------------------------------------------------------------

    /// One joint per node: local TRS from the node, parent from the node tree.
    #[must_use]
    pub fn load_rest_pose(&self) -> Pose {
        let mut pose = Pose::with_joint_count(self.document.nodes().count());

        for node in self.document.nodes() {
            pose.set_local_transform(node.index(), node_local_transform(&node));
            for child in node.children() {
                pose.set_parent(child.index(), Some(node.index()));
            }
        }

        pose
    }

    #[must_use]
    pub fn load_joint_names(&self) -> Vec<String> {
        self.document
            .nodes()
            .map(|node| {
                node.name()
                    .map_or_else(|| self.settings.fallback_joint_name.clone(), str::to_string)
            })
            .collect()
    }

    /// Rest pose with every skinned joint moved to the pose described by its
    /// inverse bind matrix.
    ///
    /// Joints not referenced by any skin keep their rest transform. A skin
    /// without inverse bind matrices binds its joints at the origin.
    pub fn load_bind_pose(&self) -> Result<Pose> {
        let rest_pose = self.load_rest_pose();
        let mut world_bind_pose: Vec<Transform> = (0..rest_pose.len())
            .map(|i| rest_pose.global_transform(i))
            .collect();

        for skin in self.document.skins() {
            let reader = skin.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
            let inverse_bind_matrices: Vec<Mat4> = reader
                .read_inverse_bind_matrices()
                .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
                .unwrap_or_default();

            for (j, joint) in skin.joints().enumerate() {
                let inverse_bind = inverse_bind_matrices.get(j).copied().unwrap_or(Mat4::IDENTITY);
                let bind_matrix = checked_inverse(&inverse_bind);

                let slot = world_bind_pose.get_mut(joint.index()).ok_or_else(|| {
                    MarionetteError::AssetIndexOutOfBounds {
                        context: format!("skin {} joint", skin.index()),
                        index: joint.index(),
                    }
                })?;
                *slot = Transform::from_matrix(&bind_matrix);
            }
        }

        // Back from world space into each joint's parent space.
        let mut bind_pose = rest_pose;
        for i in 0..bind_pose.len() {
            let mut current = world_bind_pose[i];
            if let Some(parent) = bind_pose.parent(i) {
                current = Transform::combine(&world_bind_pose[parent].inverse(), &current);
            }
            bind_pose.set_local_transform(i, current);
        }

        Ok(bind_pose)
    }

    pub fn load_skeleton(&self) -> Result<Skeleton> {
        Ok(Skeleton::new(
            self.load_rest_pose(),
            self.load_bind_pose()?,
            self.load_joint_names(),
        ))
    }

    // ------------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------------

    pub fn load_animation_clips(&self) -> Result<Vec<Clip>> {
        let mut clips = Vec::with_capacity(self.document.animations().count());

        for animation in self.document.animations() {
            let name = animation
                .name()
                .map_or_else(|| format!("animation_{}", animation.index()), str::to_string);
            let mut clip = Clip::new(name);

            for (channel_index, channel) in animation.channels().enumerate() {
                let reader =
                    channel.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
                let node_index = channel.target().node().index();
                let joint = u32::try_from(node_index).map_err(|_| {
                    MarionetteError::AssetIndexOutOfBounds {
                        context: format!("animation '{}' target node", clip.name()),
                        index: node_index,
                    }
                })?;

                let interpolation = match channel.sampler().interpolation() {
                    Interpolation::Step => InterpolationMode::Constant,
                    Interpolation::Linear => InterpolationMode::Linear,
                    Interpolation::CubicSpline => InterpolationMode::Cubic,
                };

                let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
                else {
                    log::warn!(
                        "Skipping channel {} of '{}': missing sampler data",
                        channel_index,
                        clip.name()
                    );
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                match outputs {
                    ReadOutputs::Translations(iter) => {
                        let values: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                        *clip.track_mut(joint).position_track_mut() =
                            KeyframeTrack::from_samples(&times, &values, interpolation);
                    }
                    ReadOutputs::Rotations(iter) => {
                        let values: Vec<Quat> = iter.into_f32().map(Quat::from_array).collect();
                        *clip.track_mut(joint).rotation_track_mut() =
                            KeyframeTrack::from_samples(&times, &values, interpolation);
                    }
                    ReadOutputs::Scales(iter) => {
                        let values: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                        *clip.track_mut(joint).scale_track_mut() =
                            KeyframeTrack::from_samples(&times, &values, interpolation);
                    }
                    ReadOutputs::MorphTargetWeights(_) => {
                        log::warn!(
                            "Skipping morph target weights channel {} of '{}'",
                            channel_index,
                            clip.name()
                        );
                    }
                }
            }

            clip.recalculate_duration();
            log::debug!(
                "Loaded clip '{}': {} joint tracks, [{:.3}, {:.3}]",
                clip.name(),
                clip.len(),
                clip.start_time(),
                clip.end_time()
            );
            clips.push(clip);
        }

        Ok(clips)
    }

    // ------------------------------------------------------------------------
    // Meshes
    // ------------------------------------------------------------------------

    /// One [`Mesh`] per primitive of every node carrying both a mesh and a
    /// skin. Joint influences are remapped from skin-relative indices to node
    /// (joint) indices.
    pub fn load_meshes(&self) -> Result<Vec<Mesh>> {
        let mut meshes = Vec::new();

        for node in self.document.nodes() {
            let (Some(gltf_mesh), Some(skin)) = (node.mesh(), node.skin()) else {
                continue;
            };

            let joint_nodes = skin
                .joints()
                .map(|joint| {
                    u32::try_from(joint.index()).map_err(|_| MarionetteError::AssetIndexOutOfBounds {
                        context: format!("skin {} joint", skin.index()),
                        index: joint.index(),
                    })
                })
                .collect::<Result<Vec<u32>>>()?;

            for primitive in gltf_mesh.primitives() {
                let name = format!(
                    "{}#{}",
                    gltf_mesh.name().unwrap_or("mesh"),
                    primitive.index()
                );
                let reader =
                    primitive.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));

                let positions = reader
                    .read_positions()
                    .ok_or_else(|| MarionetteError::MissingData(format!("{name}: POSITION")))?;

                let mut mesh = Mesh::new(name);
                mesh.position = positions.map(Vec3::from_array).collect();

                if let Some(normals) = reader.read_normals() {
                    mesh.normal = normals
                        .map(|n| self.prepare_normal(Vec3::from_array(n)))
                        .collect();
                }

                if let Some(tex_coords) = reader.read_tex_coords(0) {
                    mesh.tex_coord = tex_coords.into_f32().map(Vec2::from_array).collect();
                }

                if let Some(weights) = reader.read_weights(0) {
                    mesh.weights = weights.into_f32().map(Vec4::from_array).collect();
                }

                if let Some(joints) = reader.read_joints(0) {
                    mesh.influences = joints
                        .into_u16()
                        .map(|j| {
                            UVec4::from_array(
                                j.map(|i| joint_nodes.get(usize::from(i)).copied().unwrap_or(0)),
                            )
                        })
                        .collect();
                }

                if let Some(indices) = reader.read_indices() {
                    mesh.indices = indices.into_u32().collect();
                }

                // Rigidly bound to the first joint when skin attributes are absent.
                let vertex_count = mesh.vertex_count();
                if mesh.influences.len() != vertex_count || mesh.weights.len() != vertex_count {
                    log::warn!(
                        "Mesh '{}' has incomplete skin attributes, binding to joint {}",
                        mesh.name,
                        joint_nodes.first().copied().unwrap_or(0)
                    );
                    let root = joint_nodes.first().copied().unwrap_or(0);
                    mesh.influences = vec![UVec4::splat(root); vertex_count];
                    mesh.weights = vec![Vec4::X; vertex_count];
                }

                log::debug!(
                    "Loaded mesh '{}': {} vertices, {} indices",
                    mesh.name,
                    vertex_count,
                    mesh.indices.len()
                );
                meshes.push(mesh);
            }
        }

        Ok(meshes)
    }

    fn prepare_normal(&self, normal: Vec3) -> Vec3 {
        if !self.settings.repair_degenerate_normals {
            return normal;
        }
        if normal.length_squared() < DEGENERATE_NORMAL_LENGTH_SQ {
            Vec3::Y
        } else {
            normal.normalize()
        }
    }
}

fn node_local_transform(node: &gltf::Node) -> Transform {
    let (translation, rotation, scale) = node.transform().decomposed();
    Transform::new(
        Vec3::from_array(translation),
        Quat::from_array(rotation),
        Vec3::from_array(scale),
    )
}

fn load_buffers(
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
    base_path: Option<&Path>,
) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();

    for buffer in document.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => blob
                .take()
                .ok_or_else(|| MarionetteError::MissingData("GLB binary chunk".to_string()))?,
            gltf::buffer::Source::Uri(uri) => {
                if let Some(data_uri) = uri.strip_prefix("data:") {
                    decode_data_uri(data_uri)?
                } else {
                    let base_path =
                        base_path.ok_or_else(|| MarionetteError::AssetNotFound(uri.to_string()))?;
                    let buffer_path = base_path.join(uri);
                    fs::read(&buffer_path).map_err(|_| {
                        MarionetteError::AssetNotFound(buffer_path.display().to_string())
                    })?
                }
            }
        };

        if data.len() < buffer.length() {
            return Err(MarionetteError::MissingData(format!(
                "buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffer_data.push(data);
    }

    Ok(buffer_data)
}

/// Decodes the part of a `data:` URI after the scheme.
fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let (media_type, payload) = data_uri
        .split_once(',')
        .ok_or_else(|| MarionetteError::DataUriError("missing ',' separator".to_string()))?;

    if !media_type.ends_with(";base64") {
        return Err(MarionetteError::DataUriError(format!(
            "unsupported encoding '{media_type}'"
        )));
    }

    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}
