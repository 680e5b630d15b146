//! Headless playback driver.
//!
//! ```text
//! playback <file.gltf|glb> [clip-name] [--cpu]
//! ```
//!
//! Loads a skinned model, plays one clip for two seconds of simulated time at
//! 60 Hz and logs where the root joint ends up. With `--cpu` every mesh is
//! skinned on the CPU and uploaded into a staging backend each tick.

use std::path::PathBuf;

use anyhow::{Context, bail};
use glam::Vec3;

use marionette::animation::AnimationPlayer;
use marionette::assets::GltfImporter;
use marionette::renderer::{StagingBackend, attribute_names};
use marionette::settings::{RuntimeSettings, SkinningPath};

const TICKS: usize = 120;
const DT: f32 = 1.0 / 60.0;

struct Args {
    path: PathBuf,
    clip: Option<String>,
    cpu: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut path = None;
    let mut clip = None;
    let mut cpu = false;

    for arg in std::env::args().skip(1) {
        if arg == "--cpu" {
            cpu = true;
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else if clip.is_none() {
            clip = Some(arg);
        } else {
            bail!("unexpected argument '{arg}'");
        }
    }

    let Some(path) = path else {
        bail!("usage: playback <file.gltf|glb> [clip-name] [--cpu]");
    };

    Ok(Args { path, clip, cpu })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let importer = GltfImporter::open(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;
    let skeleton = importer.load_skeleton()?;
    let clips = importer.load_animation_clips()?;
    let mut meshes = importer.load_meshes()?;

    println!(
        "Loaded {}: {} joints, {} clips, {} meshes",
        args.path.display(),
        skeleton.joint_count(),
        clips.len(),
        meshes.len()
    );
    for clip in &clips {
        println!("  clip '{}' [{:.3}, {:.3}]", clip.name(), clip.start_time(), clip.end_time());
    }

    if clips.is_empty() {
        bail!("{} has no animations", args.path.display());
    }

    let settings = RuntimeSettings {
        skinning: if args.cpu { SkinningPath::Cpu } else { SkinningPath::Gpu },
        ..RuntimeSettings::default()
    };
    let mut player = AnimationPlayer::new(&skeleton, settings);
    if let Some(name) = &args.clip {
        if !player.select_clip_by_name(&clips, name) {
            bail!("no clip named '{name}'");
        }
    }
    println!("Playing '{}'", clips[player.clip].name());

    let mut backend = StagingBackend::new();
    for tick in 0..TICKS {
        player.update(&clips, DT);
        player.submit(&skeleton, &mut meshes, &mut backend);

        if tick % 10 == 0 && !player.pose.is_empty() {
            let root = player.model.transform_point(player.pose.global_transform(0).position);
            log::info!("t={:.3} root={:?}", player.playback, root);
        }
    }

    let root = if player.pose.is_empty() {
        Vec3::ZERO
    } else {
        player.model.transform_point(player.pose.global_transform(0).position)
    };
    println!("Finished at t={:.3}, root joint at {root:?}", player.playback);

    if let Some(positions) = backend.attribute(attribute_names::POSITION) {
        println!(
            "Last skinned upload: {} vertices (version {})",
            positions.count, positions.version
        );
    }

    Ok(())
}
