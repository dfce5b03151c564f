//! Headless demo: story points with hover look-around, driven by scripted
//! input. Usage: `camera-controls [options.toml] [pois.json]`.

use std::path::Path;

use camera_controls::controls::{PoiEvent, StoryPointsControls, ThreeDofControls};
use camera_controls::input::{InputEvent, PointerInput, PointerKind};
use camera_controls::options::Options;
use camera_controls::poi::{PoiDocument, StoryPoint};
use camera_controls::rig::Camera;
use camera_controls::{CameraRig, ControlScheme, RigError};
use glam::{Quat, Vec3};
use web_time::{Duration, Instant};

const VIEWPORT: (f32, f32) = (1280.0, 720.0);
const FRAME: Duration = Duration::from_micros(16_667);

/// Three POIs circling the origin.
fn default_pois() -> Vec<StoryPoint> {
    [0.0_f32, 120.0, 240.0]
        .into_iter()
        .map(|degrees| {
            let rotation = Quat::from_rotation_y(degrees.to_radians());
            StoryPoint::new(rotation * Vec3::new(0.0, 1.0, 6.0), rotation)
        })
        .collect()
}

fn load_pois(path: Option<&str>) -> Vec<StoryPoint> {
    let Some(path) = path else {
        return default_pois();
    };
    match std::fs::read_to_string(path)
        .map_err(RigError::from)
        .and_then(|json| PoiDocument::from_json(&json))
    {
        Ok(document) => document.pois,
        Err(e) => {
            log::error!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

/// Synthetic host input for frame `frame`.
fn scripted_input(frame: u32) -> Vec<InputEvent> {
    match frame {
        // Step forward through the POIs twice
        1 | 90 => vec![InputEvent::KeyUp {
            key: "ArrowRight".into(),
        }],
        // Sweep the mouse across the viewport while flying
        10..=70 => {
            let x = VIEWPORT.0 * (frame - 10) as f32 / 60.0;
            vec![InputEvent::PointerMove(PointerInput::at(
                PointerKind::Mouse,
                1,
                x,
                VIEWPORT.1 / 2.0,
            ))]
        }
        _ => Vec::new(),
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let options = match args.next() {
        Some(preset) => match Options::load(Path::new(&preset)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{preset}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };
    let pois = load_pois(args.next().as_deref());
    log::info!("{} story points", pois.len());

    let camera = Camera::default().with_pose(Vec3::new(0.0, 1.0, 10.0), Quat::IDENTITY);
    let mut rig = CameraRig::new(camera, options.rig.clone());
    let mut story = StoryPointsControls::new(pois, options.story_points.clone());
    let mut look = ThreeDofControls::new(options.three_dof.clone(), VIEWPORT.0, VIEWPORT.1);
    let poi_events = story.subscribe();
    story.enable(&mut rig);
    look.enable(&mut rig);

    let start = Instant::now();
    for frame in 0..240 {
        let now = start + FRAME * frame;
        for event in scripted_input(frame) {
            let _ = story.handle_event(&event, now);
            let _ = look.handle_event(&event, now);
        }
        story.update(&mut rig, now);
        look.update(&mut rig, now);
        rig.update(now);

        for event in poi_events.drain() {
            match event {
                PoiEvent::Update {
                    current_index,
                    upcoming_index: None,
                    ..
                } => log::info!("frame {frame}: arrived at POI {current_index:?}"),
                PoiEvent::ExitPois { exit_from } => {
                    log::info!("frame {frame}: left the POIs at {exit_from:?}");
                }
                PoiEvent::Update { .. } => {}
            }
        }
        if frame % 30 == 0 {
            let pose = rig.camera_world_transform();
            log::info!(
                "frame {frame}: position {:.2} moving {}",
                pose.translation,
                rig.is_moving()
            );
        }
    }
}
