//! Sample scene: a box dropped onto the ground that plays a crash sound on
//! first impact.
//!
//! Usage: `bab [config.ron|config.json]`

use std::f32::consts::PI;

use bab::prelude::*;

/// Frames to run when the config sets no limit
const DEFAULT_FRAMES: u64 = 600;

fn build_scene(engine: &mut Engine, audio: Option<&mut AudioManager>) -> Result<(), EngineError> {
    let gm = &mut engine.context_mut().graphics;
    gm.set_sky_dome("Examples/CloudySky", 5.0, 8.0);
    gm.add_mesh(
        "ninja.mesh",
        Vec3::ZERO,
        Quat::from_axis_angle(Vec3::Y, PI),
        true,
    );
    gm.add_plane(1500.0, 1500.0, 20, 20, false, "Examples/Rockwall");
    gm.add_material("box_material", "box.png")?;
    gm.add_spot_light(
        Vec3::new(200.0, 200.0, 0.0),
        Vec3::new(-1.0, -1.0, 0.0),
        Colour::BLUE,
        35.0,
        50.0,
    );
    gm.add_directional_light(Vec3::new(0.0, -1.0, 1.0), Colour::rgb(0.4, 0.0, 0.0));
    gm.add_point_light(Vec3::new(0.0, 150.0, 250.0), Colour::WHITE * 0.3);

    engine
        .context_mut()
        .physics
        .add_static_rigid_body(Vec3::new(750.0, 1.0, 750.0), Vec3::new(0.0, -1.0, 0.0));

    let crash = audio.and_then(|am| match am.load("assets/box-crash.wav") {
        Ok(clip) => Some(clip),
        Err(e) => {
            log::warn!("Crash sound unavailable: {e}");
            None
        }
    });

    let scene = SceneManager::attach(engine);
    scene.add_cube(
        engine.context_mut(),
        Vec3::new(10.0, 200.0, 10.0),
        0.5,
        "box_material",
        10.0,
        move || {
            log::info!("Box hit the ground");
            if let Some(Err(e)) = crash.as_ref().map(AudioClip::play) {
                log::warn!("{e}");
            }
            true
        },
    )?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error: {e}");
                return;
            }
        },
        None => EngineConfig::default().with_title("bab_sample"),
    };
    let config = if config.max_frames.is_none() {
        config.with_max_frames(DEFAULT_FRAMES)
    } else {
        config
    };

    // Kept alive for the whole run; clips stop playing once it drops
    let mut audio = match AudioManager::new() {
        Ok(audio) => Some(audio),
        Err(e) => {
            eprintln!("Audio disabled: {e}");
            None
        }
    };

    let mut engine = Engine::new(config);
    if let Err(e) = build_scene(&mut engine, audio.as_mut()) {
        eprintln!("Scene error: {e}");
        return;
    }

    if let Err(e) = engine.run() {
        eprintln!("Engine error: {e}");
    }
}
