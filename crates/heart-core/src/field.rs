//! A live particle set molded into one shape.
//!
//! The field owns its particles outright. Membership only changes through
//! [`ParticleField::generate`], which throws the whole collection away and
//! spawns a fresh one; particles are never added or removed piecemeal.

use crate::canvas::Canvas;
use crate::constants::*;
use crate::error::{HeartError, Result};
use crate::params::ParamVector;
use crate::particle::{Particle, Tick, Variant};
use crate::sampler::{SampleMode, SamplerConfig, ShapeSampler, ShapeSource};
use crate::smooth_noise::SmoothNoise;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct FieldConfig {
    /// Particle count at amount 0 and amount 100.
    pub count_range: (usize, usize),
    /// Max per-axis distance between spawn position and target.
    pub spawn_jitter: f32,
    /// First particle id; keeps noise seeds of co-existing fields apart.
    pub id_offset: u32,
    pub sample_mode: SampleMode,
    /// Amount change since the last generation that forces a new one.
    pub regen_threshold: f32,
    pub cull_margin: f32,
    pub sampler: SamplerConfig,
}

impl FieldConfig {
    /// Dense interior sampling for legible text.
    pub fn text() -> Self {
        Self {
            count_range: (TEXT_PARTICLES_MIN, TEXT_PARTICLES_MAX),
            spawn_jitter: TEXT_SPAWN_JITTER,
            id_offset: 0,
            sample_mode: SampleMode::Interior,
            regen_threshold: REGEN_AMOUNT_THRESHOLD,
            cull_margin: CULL_MARGIN,
            sampler: SamplerConfig::default(),
        }
    }

    /// Sparse outline sampling for a body silhouette.
    pub fn silhouette() -> Self {
        Self {
            count_range: (SILHOUETTE_PARTICLES_MIN, SILHOUETTE_PARTICLES_MAX),
            spawn_jitter: SILHOUETTE_SPAWN_JITTER,
            id_offset: SILHOUETTE_ID_OFFSET,
            sample_mode: SampleMode::Outline,
            ..Self::text()
        }
    }

    pub fn with_regen_threshold(mut self, threshold: f32) -> Self {
        self.regen_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.count_range;
        if min > max {
            return Err(HeartError::InvalidCountRange { min, max });
        }
        for (name, value) in [
            ("spawn_jitter", self.spawn_jitter),
            ("regen_threshold", self.regen_threshold),
            ("cull_margin", self.cull_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HeartError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::text()
    }
}

/// Visible canvas area, anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

pub struct ParticleField {
    shape: ShapeSource,
    variant: Variant,
    params: ParamVector,
    config: FieldConfig,
    viewport: Viewport,
    sampler: ShapeSampler,
    particles: Vec<Particle>,
    rng: StdRng,
    noise: SmoothNoise,
    time: f32,
    generation: u64,
    generated_amount: f32,
}

impl ParticleField {
    /// Bind a shape and parameters, and spawn the first generation.
    ///
    /// Fails when `config` does not pass [`FieldConfig::validate`].
    pub fn new(
        shape: ShapeSource,
        variant: Variant,
        params: ParamVector,
        config: FieldConfig,
        viewport: Viewport,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let mut field = Self {
            shape,
            variant,
            params,
            sampler: ShapeSampler::new(config.sampler.clone()),
            config,
            viewport,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            noise: SmoothNoise::new(seed as u32),
            time: 0.0,
            generation: 0,
            generated_amount: params.amount(),
        };
        field.generate();
        Ok(field)
    }

    /// Particle count requested for a given amount (0–100).
    pub fn count_for_amount(&self, amount: f32) -> usize {
        let (lo, hi) = self.config.count_range;
        let t = (amount / 100.0).clamp(0.0, 1.0);
        lo + ((hi.saturating_sub(lo)) as f32 * t).floor() as usize
    }

    /// Resample the shape and replace every particle.
    pub fn generate(&mut self) {
        self.generation += 1;
        let count = self.count_for_amount(self.params.amount());
        let points = self
            .sampler
            .sample(&self.shape, count, self.config.sample_mode, &mut self.rng);

        let jitter = self.config.spawn_jitter;
        let mut particles = Vec::with_capacity(points.len());
        for (i, target) in points.into_iter().enumerate() {
            let offset = if jitter > 0.0 {
                Vec2::new(
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                )
            } else {
                Vec2::ZERO
            };
            particles.push(Particle::spawn(
                self.variant,
                target + offset,
                target,
                self.config.id_offset.wrapping_add(i as u32),
                self.generation,
                &self.params,
                &mut self.rng,
            ));
        }
        self.particles = particles;
        self.generated_amount = self.params.amount();
        log::info!(
            "[field] generation {}: {} {} particles (requested {})",
            self.generation,
            self.particles.len(),
            self.variant.name(),
            count
        );
    }

    fn cull_bounds(&self) -> (Vec2, Vec2) {
        let m = self.config.cull_margin;
        (
            Vec2::splat(-m),
            Vec2::new(self.viewport.width + m, self.viewport.height + m),
        )
    }

    /// Advance the simulation by `dt`; particles far off-screen sit this one out.
    pub fn update(&mut self, dt: Duration) {
        let frames = step_frames(dt);
        if !(frames > 0.0) {
            return;
        }
        self.time += frames;
        let (min, max) = self.cull_bounds();
        let tick = Tick {
            time: self.time,
            dt: frames,
            noise: &self.noise,
        };
        for p in self.particles.iter_mut() {
            if p.is_within(min, max) {
                p.update(&self.params, &tick);
            }
        }
    }

    pub fn display<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let (min, max) = self.cull_bounds();
        let tick = Tick {
            time: self.time,
            dt: 0.0,
            noise: &self.noise,
        };
        for p in self.particles.iter().filter(|p| p.is_within(min, max)) {
            p.display(canvas, &tick);
        }
    }

    /// Store new parameters; regenerate when `amount` drifted past the threshold.
    /// Returns whether a regeneration happened.
    pub fn update_params(&mut self, params: ParamVector) -> bool {
        self.params = params;
        let delta = (params.amount() - self.generated_amount).abs();
        if delta > self.config.regen_threshold {
            log::debug!("[field] amount moved by {delta:.1}, regenerating");
            self.generate();
            return true;
        }
        false
    }

    pub fn regenerate(&mut self, params: Option<ParamVector>) {
        if let Some(p) = params {
            self.params = p;
        }
        self.generate();
    }

    pub fn set_shape(&mut self, shape: ShapeSource) {
        self.shape = shape;
        self.generate();
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.generate();
    }

    /// The shape's placement is part of the shape source; callers that
    /// recenter it should follow up with [`ParticleField::set_shape`].
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.generate();
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn params(&self) -> &ParamVector {
        &self.params
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn shape(&self) -> &ShapeSource {
        &self.shape
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Elapsed simulation time in nominal frames.
    pub fn time(&self) -> f32 {
        self.time
    }
}
