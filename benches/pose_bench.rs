//! Per-frame costs of the animation core: clip sampling, palette generation
//! and CPU skinning on a synthetic chain skeleton.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Quat, UVec4, Vec3, Vec4};

use marionette::animation::{Clip, InterpolationMode, QuaternionTrack};
use marionette::resources::Mesh;
use marionette::scene::{Pose, Skeleton, Transform};

const JOINTS: usize = 64;
const VERTICES: usize = 4096;

fn chain_skeleton() -> Skeleton {
    let mut pose = Pose::with_joint_count(JOINTS);
    for i in 1..JOINTS {
        pose.set_local_transform(i, Transform::from_translation(Vec3::Y));
        pose.set_parent(i, Some(i - 1));
    }
    let names = (0..JOINTS).map(|i| format!("joint_{i}")).collect();
    Skeleton::new(pose.clone(), pose, names)
}

fn sway_clip() -> Clip {
    let mut clip = Clip::new("sway");
    for joint in 0..JOINTS as u32 {
        *clip.track_mut(joint).rotation_track_mut() = QuaternionTrack::from_samples(
            &[0.0, 0.5, 1.0],
            &[
                Quat::from_rotation_z(-0.1),
                Quat::from_rotation_z(0.1),
                Quat::from_rotation_z(-0.1),
            ],
            InterpolationMode::Linear,
        );
    }
    clip.recalculate_duration();
    clip
}

fn strip_mesh() -> Mesh {
    let mut mesh = Mesh::new("strip");
    for i in 0..VERTICES {
        let height = i as f32 / VERTICES as f32 * JOINTS as f32;
        let joint = (height as u32).min(JOINTS as u32 - 1);
        mesh.position.push(Vec3::new(0.1, height, 0.0));
        mesh.normal.push(Vec3::X);
        mesh.influences.push(UVec4::new(joint, joint.saturating_sub(1), 0, 0));
        mesh.weights.push(Vec4::new(0.75, 0.25, 0.0, 0.0));
    }
    mesh
}

fn bench_clip_sample(c: &mut Criterion) {
    let skeleton = chain_skeleton();
    let clip = sway_clip();
    let mut pose = skeleton.rest_pose().clone();

    c.bench_function("clip_sample_64_joints", |b| {
        b.iter(|| clip.sample(black_box(&mut pose), black_box(0.37)));
    });
}

fn bench_matrix_palette(c: &mut Criterion) {
    let skeleton = chain_skeleton();
    let mut palette = Vec::new();

    c.bench_function("matrix_palette_64_joints", |b| {
        b.iter(|| skeleton.rest_pose().matrix_palette(black_box(&mut palette)));
    });
}

fn bench_cpu_skin(c: &mut Criterion) {
    let skeleton = chain_skeleton();
    let clip = sway_clip();
    let mut pose = skeleton.rest_pose().clone();
    clip.sample(&mut pose, 0.25);
    let mut mesh = strip_mesh();

    c.bench_function("cpu_skin_4096_vertices", |b| {
        b.iter(|| mesh.cpu_skin(black_box(&skeleton), black_box(&pose)));
    });
}

criterion_group!(benches, bench_clip_sample, bench_matrix_palette, bench_cpu_skin);
criterion_main!(benches);
