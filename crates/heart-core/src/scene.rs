//! One running installation: the selected emotion, its particle fields, the
//! smoothed parameters behind them and the body hotspot fill.

use crate::canvas::{Canvas, Paint};
use crate::constants::*;
use crate::emotion::Emotion;
use crate::error::Result;
use crate::field::{FieldConfig, ParticleField, Viewport};
use crate::keys::{key_for_param, ParameterController};
use crate::params::{ParamFamily, ParamName, ParamVector, ParameterState};
use crate::sampler::ShapeSource;
use crate::texture::TextureTileGenerator;
use crate::volume::VolumeFill;
use glam::Vec2;
use image::RgbaImage;
use instant::Instant;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub viewport: Viewport,
    pub text_size: f32,
    pub text_y: f32,
    pub body_y: f32,
    pub body_height: f32,
    pub text_field: FieldConfig,
    pub body_field: FieldConfig,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1280.0, 720.0),
            text_size: TEXT_SIZE,
            text_y: TEXT_Y_FACTOR,
            body_y: BODY_Y_FACTOR,
            body_height: BODY_HEIGHT,
            text_field: FieldConfig::text(),
            body_field: FieldConfig::silhouette(),
            seed: 0x4845_4152_54,
        }
    }
}

impl SceneConfig {
    pub fn text_anchor(&self) -> Vec2 {
        Vec2::new(self.viewport.width * 0.5, self.viewport.height * self.text_y)
    }

    pub fn body_center(&self) -> Vec2 {
        Vec2::new(self.viewport.width * 0.5, self.viewport.height * self.body_y)
    }

    pub fn body_size(&self) -> Vec2 {
        Vec2::new(self.body_height * 0.5, self.body_height)
    }
}

pub struct Scene {
    config: SceneConfig,
    emotion: Option<Emotion>,
    text: Option<ParticleField>,
    body: Option<ParticleField>,
    silhouette: Option<Rc<RgbaImage>>,
    particle_params: ParameterState,
    texture_params: ParameterState,
    key_family: ParamFamily,
    keys: ParameterController,
    last_key: Option<ParamName>,
    fill: VolumeFill,
    tiles: TextureTileGenerator,
    pattern: Option<Paint>,
    time_ms: f32,
    builds: u64,
}

impl Scene {
    /// Fails when either field config is invalid.
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.text_field.validate()?;
        config.body_field.validate()?;
        Ok(Self {
            config,
            emotion: None,
            text: None,
            body: None,
            silhouette: None,
            particle_params: ParameterState::new(ParamVector::neutral(ParamFamily::Particle)),
            texture_params: ParameterState::new(ParamVector::neutral(ParamFamily::Texture)),
            key_family: ParamFamily::Particle,
            keys: ParameterController::new(),
            last_key: None,
            fill: VolumeFill::new(),
            tiles: TextureTileGenerator::new(),
            pattern: None,
            time_ms: 0.0,
            builds: 0,
        })
    }

    /// Body mask for the silhouette field; takes effect on the next emotion.
    pub fn set_silhouette(&mut self, mask: Option<RgbaImage>) {
        self.silhouette = mask.map(Rc::new);
    }

    /// Pick the emotion named anywhere in a recognized utterance.
    pub fn on_word(&mut self, utterance: &str) -> Option<Emotion> {
        let Some(emotion) = Emotion::from_word(utterance) else {
            log::debug!("[scene] no emotion in {utterance:?}");
            return None;
        };
        self.select_emotion(emotion);
        Some(emotion)
    }

    /// Load the emotion's presets and rebuild both fields from scratch.
    pub fn select_emotion(&mut self, emotion: Emotion) {
        log::info!("[scene] emotion -> {emotion}");
        self.emotion = Some(emotion);
        self.particle_params.load_preset(emotion.particle_preset());
        self.texture_params.load_preset(emotion.texture_preset());
        self.fill.reset();
        self.last_key = None;
        self.rebuild_fields(emotion);
        self.refresh_pattern(emotion);
    }

    fn rebuild_fields(&mut self, emotion: Emotion) {
        self.builds += 1;
        let seed = self.config.seed.wrapping_add(self.builds);

        let text = ShapeSource::text(
            emotion.key().to_uppercase(),
            self.config.text_size,
            self.config.text_anchor(),
        );
        self.text = self.build_field(text, emotion, &self.config.text_field, seed);

        self.body = match &self.silhouette {
            Some(mask) => {
                let shape = ShapeSource::image(
                    Rc::clone(mask),
                    self.config.body_center(),
                    self.config.body_size(),
                );
                self.build_field(shape, emotion, &self.config.body_field, seed.rotate_left(17))
            }
            None => None,
        };
    }

    fn build_field(
        &self,
        shape: ShapeSource,
        emotion: Emotion,
        config: &FieldConfig,
        seed: u64,
    ) -> Option<ParticleField> {
        let field = ParticleField::new(
            shape,
            emotion.variant(),
            self.particle_params.current(),
            config.clone(),
            self.config.viewport,
            seed,
        );
        match field {
            Ok(field) => Some(field),
            Err(err) => {
                // configs are checked in Scene::new
                log::error!("[scene] field rejected: {err}");
                None
            }
        }
    }

    fn refresh_pattern(&mut self, emotion: Emotion) {
        let tile = self
            .tiles
            .generate(emotion.key(), emotion.color(), &self.texture_params.current());
        self.pattern = Some(self.tiles.create_pattern(&tile));
    }

    /// Route H/E/A/R/T to the active key family. Ignored before any emotion.
    pub fn handle_key(&mut self, key: char, now: Instant) -> Option<ParamName> {
        self.emotion?;
        let state = match self.key_family {
            ParamFamily::Particle => &mut self.particle_params,
            ParamFamily::Texture => &mut self.texture_params,
        };
        let changed = self.keys.handle_key(key, now, state)?;
        self.last_key = Some(changed);
        Some(changed)
    }

    /// Which parameter family the H/E/A/R/T keys adjust.
    pub fn set_key_family(&mut self, family: ParamFamily) {
        self.key_family = family;
    }

    pub fn key_family(&self) -> ParamFamily {
        self.key_family
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.fill.set_volume(volume);
    }

    /// Resize; fields are recentered by rebuilding them.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        if let Some(emotion) = self.emotion {
            self.rebuild_fields(emotion);
        }
    }

    /// One frame: parameters settle, then particles move, then the fill rises.
    pub fn tick(&mut self, dt: Duration) {
        let frames = step_frames(dt);
        if !(frames > 0.0) {
            return;
        }
        self.time_ms += frames * 1000.0 / NOMINAL_FPS;

        // fields see the smoothed vector every frame and decide on
        // regeneration from its amount
        self.particle_params.tick();
        let current = self.particle_params.current();
        for field in self.text.iter_mut().chain(self.body.iter_mut()) {
            field.update_params(current);
        }

        // unchanged keys hit the tile cache
        self.texture_params.tick();
        if let Some(emotion) = self.emotion {
            self.refresh_pattern(emotion);
        }

        for field in self.text.iter_mut().chain(self.body.iter_mut()) {
            field.update(dt);
        }

        if self.emotion.is_some() {
            self.fill.advance(frames);
        }
    }

    /// Body first, then the hotspot, then the word on top.
    pub fn display<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if let Some(body) = &self.body {
            body.display(canvas);
        }
        if let Some(emotion) = self.emotion {
            if self.fill.level() > HOTSPOT_MIN_FILL {
                if let Some(pattern) = &self.pattern {
                    let breath = (self.time_ms * BREATHING_FREQUENCY).sin();
                    let diameter =
                        remap(breath, -1.0, 1.0, HOTSPOT_DIAMETER_MIN, HOTSPOT_DIAMETER_MAX);
                    let radius = diameter * 0.5 * self.fill.level() / FILL_LEVEL_MAX;
                    let center = self.config.body_center() + emotion.body_offset();
                    canvas.fill_circle(center, radius, pattern);
                }
            }
        }
        if let Some(text) = &self.text {
            text.display(canvas);
        }
    }

    pub fn emotion(&self) -> Option<Emotion> {
        self.emotion
    }

    pub fn text_field(&self) -> Option<&ParticleField> {
        self.text.as_ref()
    }

    pub fn body_field(&self) -> Option<&ParticleField> {
        self.body.as_ref()
    }

    pub fn particle_params(&self) -> &ParameterState {
        &self.particle_params
    }

    pub fn texture_params(&self) -> &ParameterState {
        &self.texture_params
    }

    pub fn pattern(&self) -> Option<&Paint> {
        self.pattern.as_ref()
    }

    pub fn tiles(&self) -> &TextureTileGenerator {
        &self.tiles
    }

    pub fn fill_level(&self) -> f32 {
        self.fill.level()
    }

    pub fn particle_count(&self) -> usize {
        self.text.iter().chain(self.body.iter()).map(|f| f.particle_count()).sum()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Parameter panel text: one `KEY: value` line per bound parameter, the
    /// last adjusted one marked with `*`.
    pub fn hud_lines(&self) -> Vec<String> {
        let Some(emotion) = self.emotion else {
            return vec!["Say: Happiness, Anger, Envy, Rage, Trust".to_string()];
        };
        let state = match self.key_family {
            ParamFamily::Particle => &self.particle_params,
            ParamFamily::Texture => &self.texture_params,
        };
        let mut lines = vec![format!(
            "[{}] {}  fill {:.0}%  particles {}",
            emotion.letter(),
            emotion.key().to_uppercase(),
            self.fill.level(),
            self.particle_count()
        )];
        for (name, value) in state.target().iter() {
            let key = key_for_param(name, self.key_family).unwrap_or('?');
            let mark = if self.last_key == Some(name) { " *" } else { "" };
            let shown = if name == ParamName::Hue {
                format!("{value:.0}°")
            } else {
                format!("{value:.0}")
            };
            lines.push(format!("{key}: {name} {shown}{mark}"));
        }
        lines
    }
}
