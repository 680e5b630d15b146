//! glTF import tests
//!
//! Builds a small skinned document in memory (buffer embedded as a base64
//! data URI) and checks what the importer produces:
//! - Rest pose, parents and joint names
//! - Bind pose recovered from inverse bind matrices
//! - Animation channels, interpolation modes and cubic tangent triples
//! - Skinned meshes, joint remapping and normal repair
//! - Error reporting

#![cfg(feature = "gltf")]

use std::f32::consts::FRAC_PI_4;
use std::path::Path;

use base64::Engine as _;
use glam::{Mat4, Quat, UVec4, Vec3};
use serde_json::{Value, json};

use marionette::animation::InterpolationMode;
use marionette::assets::GltfImporter;
use marionette::errors::MarionetteError;
use marionette::scene::same_orientation;
use marionette::settings::ImportSettings;

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

// ============================================================================
// Document builder
// ============================================================================

const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;

#[derive(Default)]
struct BufferBuilder {
    bytes: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    /// Appends `data` as its own buffer view and returns the accessor index.
    fn push<T: bytemuck::Pod>(&mut self, data: &[T], component_type: u32, ty: &str, count: usize) -> usize {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(bytemuck::cast_slice(data));

        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": self.bytes.len() - offset,
        }));
        self.accessors.push(json!({
            "bufferView": self.views.len() - 1,
            "componentType": component_type,
            "count": count,
            "type": ty,
        }));
        self.accessors.len() - 1
    }
}

/// Two-joint chain ("root" -> "tip") plus an unnamed node carrying the mesh.
/// The skin lists its joints in reverse node order.
fn skinned_document() -> String {
    let mut b = BufferBuilder::default();

    let times = b.push(&[0.0_f32, 1.0], FLOAT, "SCALAR", 2);
    let rotations = b.push(
        &[0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.707_106_77, 0.707_106_77],
        FLOAT,
        "VEC4",
        2,
    );
    let translations = b.push(&[0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0], FLOAT, "VEC3", 2);
    let scales = b.push(
        &[
            0.0_f32, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 0.0, 0.0,
        ],
        FLOAT,
        "VEC3",
        6,
    );

    let mut ibm = Vec::new();
    ibm.extend_from_slice(&Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)).to_cols_array());
    ibm.extend_from_slice(&Mat4::IDENTITY.to_cols_array());
    let inverse_bind = b.push(&ibm, FLOAT, "MAT4", 2);

    let positions = b.push(
        &[0.0_f32, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 0.0],
        FLOAT,
        "VEC3",
        3,
    );
    let normals = b.push(
        &[1.0_f32, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0],
        FLOAT,
        "VEC3",
        3,
    );
    let joints = b.push(
        &[1_u16, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
        UNSIGNED_SHORT,
        "VEC4",
        3,
    );
    let weights = b.push(
        &[1.0_f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        FLOAT,
        "VEC4",
        3,
    );
    let indices = b.push(&[0_u32, 1, 2], UNSIGNED_INT, "SCALAR", 3);

    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&b.bytes)
    );

    json!({
        "asset": { "version": "2.0" },
        "nodes": [
            { "name": "root", "children": [1] },
            { "name": "tip", "translation": [0.0, 1.0, 0.0] },
            { "mesh": 0, "skin": 0 },
        ],
        "skins": [
            { "joints": [1, 0], "inverseBindMatrices": inverse_bind },
        ],
        "meshes": [{
            "name": "body",
            "primitives": [{
                "attributes": {
                    "POSITION": positions,
                    "NORMAL": normals,
                    "JOINTS_0": joints,
                    "WEIGHTS_0": weights,
                },
                "indices": indices,
            }],
        }],
        "animations": [{
            "name": "wave",
            "samplers": [
                { "input": times, "output": rotations, "interpolation": "LINEAR" },
                { "input": times, "output": translations, "interpolation": "STEP" },
                { "input": times, "output": scales, "interpolation": "CUBICSPLINE" },
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 1, "path": "rotation" } },
                { "sampler": 1, "target": { "node": 0, "path": "translation" } },
                { "sampler": 2, "target": { "node": 1, "path": "scale" } },
            ],
        }],
        "buffers": [{ "byteLength": b.bytes.len(), "uri": uri }],
        "bufferViews": b.views,
        "accessors": b.accessors,
    })
    .to_string()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn importer() -> GltfImporter {
    init_logging();
    GltfImporter::from_slice(skinned_document().as_bytes()).expect("valid document")
}

// ============================================================================
// Skeleton
// ============================================================================

#[test]
fn rest_pose_follows_node_tree() {
    let rest = importer().load_rest_pose();

    assert_eq!(rest.len(), 3);
    assert_eq!(rest.parent(0), None);
    assert_eq!(rest.parent(1), Some(0));
    assert_eq!(rest.parent(2), None);
    assert!(vec3_approx(rest.local_transform(1).position, Vec3::Y));
}

#[test]
fn joint_names_use_fallback_for_unnamed_nodes() {
    let names = importer().load_joint_names();
    assert_eq!(names, vec!["root", "tip", "EMPTY NODE"]);
}

#[test]
fn import_settings_change_fallback_name() {
    let settings = ImportSettings {
        fallback_joint_name: "unnamed".to_string(),
        ..ImportSettings::default()
    };
    let names = importer().with_settings(settings).load_joint_names();
    assert_eq!(names[2], "unnamed");
}

#[test]
fn bind_pose_comes_from_inverse_bind_matrices() {
    let importer = importer();
    let bind = importer.load_bind_pose().expect("bind pose");

    // The tip is bound two units up although it rests one unit up.
    assert!(vec3_approx(bind.local_transform(1).position, Vec3::new(0.0, 2.0, 0.0)));
    assert!(vec3_approx(bind.global_transform(1).position, Vec3::new(0.0, 2.0, 0.0)));
    assert_eq!(bind.parent(1), Some(0));
    // Not part of the skin: keeps its rest transform.
    assert_eq!(bind.local_transform(2), importer.load_rest_pose().local_transform(2));
}

#[test]
fn skeleton_inverse_bind_matches_document() {
    let skeleton = importer().load_skeleton().expect("skeleton");

    assert_eq!(skeleton.joint_count(), 3);
    let tip = skeleton.inv_bind_pose()[1];
    assert!(vec3_approx(tip.transform_point3(Vec3::new(0.0, 2.0, 0.0)), Vec3::ZERO));
}

// ============================================================================
// Animation
// ============================================================================

#[test]
fn animation_channels_become_joint_tracks() {
    let clips = importer().load_animation_clips().expect("clips");
    assert_eq!(clips.len(), 1);

    let clip = &clips[0];
    assert_eq!(clip.name(), "wave");
    assert_eq!(clip.len(), 2);
    assert_eq!(clip.start_time(), 0.0);
    assert_eq!(clip.end_time(), 1.0);

    let tip = clip.track(1).expect("tip track");
    assert_eq!(tip.rotation_track().len(), 2);
    assert_eq!(tip.rotation_track().interpolation(), InterpolationMode::Linear);
    assert!(!tip.position_track().is_animated());

    let root = clip.track(0).expect("root track");
    assert_eq!(root.position_track().interpolation(), InterpolationMode::Constant);
}

#[test]
fn cubic_outputs_are_split_into_tangent_triples() {
    let clips = importer().load_animation_clips().expect("clips");
    let scale = clips[0].track(1).expect("tip track").scale_track();

    assert_eq!(scale.interpolation(), InterpolationMode::Cubic);
    assert_eq!(scale.len(), 2);
    assert!(vec3_approx(scale[0].value, Vec3::ONE));
    assert!(vec3_approx(scale[1].value, Vec3::splat(2.0)));
    assert!(vec3_approx(scale[1].in_tangent, Vec3::ZERO));
}

#[test]
fn sampling_imported_clip_moves_joints() {
    let importer = importer();
    let skeleton = importer.load_skeleton().expect("skeleton");
    let clips = importer.load_animation_clips().expect("clips");

    let mut pose = skeleton.rest_pose().clone();
    clips[0].sample(&mut pose, 0.5);

    let tip = pose.local_transform(1);
    assert!(same_orientation(tip.rotation, Quat::from_rotation_z(FRAC_PI_4)));
    assert!(vec3_approx(tip.scale, Vec3::splat(1.5)));
    // Position is not animated on the tip: rest value is kept.
    assert!(vec3_approx(tip.position, Vec3::Y));
    // Step interpolation holds the first key.
    assert!(vec3_approx(pose.local_transform(0).position, Vec3::ZERO));
}

// ============================================================================
// Meshes
// ============================================================================

#[test]
fn meshes_are_loaded_for_skinned_nodes() {
    let meshes = importer().load_meshes().expect("meshes");
    assert_eq!(meshes.len(), 1);

    let mesh = &meshes[0];
    assert_eq!(mesh.name, "body#0");
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.weights.len(), 3);
}

#[test]
fn joint_influences_are_remapped_to_nodes() {
    let meshes = importer().load_meshes().expect("meshes");
    let influences = &meshes[0].influences;

    // Skin slot 0 is node 1, slot 1 is node 0.
    assert_eq!(influences[0], UVec4::new(0, 1, 1, 1));
    assert_eq!(influences[1], UVec4::splat(1));
}

#[test]
fn degenerate_normals_are_repaired() {
    let meshes = importer().load_meshes().expect("meshes");
    let normals = &meshes[0].normal;

    assert!(vec3_approx(normals[0], Vec3::X));
    assert!(vec3_approx(normals[1], Vec3::Y));
    assert!(vec3_approx(normals[2], Vec3::Z));
}

#[test]
fn normal_repair_can_be_disabled() {
    let settings = ImportSettings {
        repair_degenerate_normals: false,
        ..ImportSettings::default()
    };
    let meshes = importer().with_settings(settings).load_meshes().expect("meshes");

    assert_eq!(meshes[0].normal[1], Vec3::ZERO);
    assert_eq!(meshes[0].normal[2], Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn imported_mesh_is_unchanged_at_bind_pose() {
    let importer = importer();
    let skeleton = importer.load_skeleton().expect("skeleton");
    let mut meshes = importer.load_meshes().expect("meshes");
    let mesh = &mut meshes[0];

    mesh.cpu_skin(&skeleton, skeleton.bind_pose());

    for (skinned, rest) in mesh.skinned_position().iter().zip(&mesh.position) {
        assert!(vec3_approx(*skinned, *rest), "{skinned:?} vs {rest:?}");
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn invalid_json_is_a_gltf_error() {
    let err = GltfImporter::from_slice(b"{ not json").err().expect("parse failure");
    assert!(matches!(err, MarionetteError::GltfError(_)));
}

#[test]
fn non_base64_data_uri_is_rejected() {
    let document = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4, "uri": "data:text/plain,abcd" }],
    })
    .to_string();

    let err = GltfImporter::from_slice(document.as_bytes()).err().expect("bad uri");
    assert!(matches!(err, MarionetteError::DataUriError(_)));
}

#[test]
fn external_buffer_without_base_path_is_not_found() {
    let document = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4, "uri": "model.bin" }],
    })
    .to_string();

    let err = GltfImporter::from_slice(document.as_bytes()).err().expect("missing buffer");
    assert!(matches!(err, MarionetteError::AssetNotFound(_)));
}

#[test]
fn opening_missing_file_is_not_found() {
    let err = GltfImporter::open(Path::new("does/not/exist.gltf")).err().expect("missing file");
    assert!(matches!(err, MarionetteError::AssetNotFound(_)));
}
