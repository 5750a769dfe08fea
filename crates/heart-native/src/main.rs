use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use glam::Vec2;
use heart_core::{Canvas, Color, ParamFamily, Raster, Scene, SceneConfig, Viewport};
use image::RgbaImage;
use instant::Instant;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 720;
const BACKGROUND: [u8; 3] = [0x0a, 0x0a, 0x0a];
const FRAME: Duration = Duration::from_micros(16_667);

/// What happens at a given frame of the scripted session.
enum Cue {
    Say(&'static str),
    Key(char),
    KeyFamily(ParamFamily),
}

const SCRIPT: &[(u32, Cue)] = &[
    (10, Cue::Say("I feel nothing")),
    (20, Cue::Say("mostly happiness today")),
    (90, Cue::Key('h')),
    (92, Cue::Key('h')), // debounced
    (110, Cue::Key('a')),
    (130, Cue::Key('r')),
    (200, Cue::Say("and then rage")),
    (260, Cue::KeyFamily(ParamFamily::Texture)),
    (270, Cue::Key('h')),
    (290, Cue::Key('t')),
    (330, Cue::Say("trust")),
];
const TOTAL_FRAMES: u32 = 420;

/// Microphone envelope: a swell every two seconds.
fn volume_at(frame: u32) -> f32 {
    let t = frame as f32 / 60.0;
    0.2 + 0.18 * (t * std::f32::consts::PI).sin()
}

/// Stand-in body mask: head, torso and legs drawn into an opaque-on-clear image.
fn default_silhouette() -> RgbaImage {
    let mut r = Raster::new(100, 200);
    let white = Color::WHITE.into();
    r.fill_circle(Vec2::new(50.0, 22.0), 18.0, &white);
    r.fill_square(Vec2::new(50.0, 80.0), 56.0, 0.0, &white);
    r.line(Vec2::new(38.0, 108.0), Vec2::new(34.0, 190.0), 18.0, &white);
    r.line(Vec2::new(62.0, 108.0), Vec2::new(66.0, 190.0), 18.0, &white);
    r.line(Vec2::new(24.0, 60.0), Vec2::new(10.0, 120.0), 12.0, &white);
    r.line(Vec2::new(76.0, 60.0), Vec2::new(90.0, 120.0), 12.0, &white);
    r.into_image()
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let out = PathBuf::from(args.next().unwrap_or_else(|| "heart.png".to_string()));
    let silhouette = match args.next() {
        Some(path) => image::open(&path)
            .with_context(|| format!("loading silhouette {path}"))?
            .to_rgba8(),
        None => default_silhouette(),
    };

    let config = SceneConfig {
        viewport: Viewport::new(WIDTH as f32, HEIGHT as f32),
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(config)?;
    scene.set_silhouette(Some(silhouette));

    let start = Instant::now();
    let mut cues = SCRIPT.iter().peekable();
    for frame in 0..TOTAL_FRAMES {
        let now = start + FRAME * frame;
        while let Some((_, cue)) = cues.next_if(|(at, _)| *at == frame) {
            match cue {
                Cue::Say(words) => {
                    if scene.on_word(words).is_none() {
                        log::info!("heard {words:?}, no emotion");
                    }
                }
                Cue::Key(k) => {
                    if let Some(name) = scene.handle_key(*k, now) {
                        log::info!("key {k} -> {name}");
                    }
                }
                Cue::KeyFamily(family) => scene.set_key_family(*family),
            }
        }
        scene.set_volume(volume_at(frame));
        scene.tick(FRAME);

        if frame % 60 == 0 {
            for line in scene.hud_lines() {
                log::info!("hud | {line}");
            }
        }
    }

    let mut raster = Raster::new(WIDTH, HEIGHT);
    raster.clear(Color::from_rgb8(BACKGROUND));
    scene.display(&mut raster);
    log::info!(
        "{} particles, {} pixels painted",
        scene.particle_count(),
        raster.count_differing(Color::from_rgb8(BACKGROUND))
    );
    raster
        .into_image()
        .save(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote {}", out.display());
    Ok(())
}
