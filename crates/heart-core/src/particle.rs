//! Particle record and the fixed set of motion/render variants.
//!
//! Every particle shares one data layout; the [`Kind`] tag selects the
//! variant rules and carries the little bit of state only some variants need.
//! All sizes are diameters.

use crate::canvas::{Canvas, Color, Paint};
use crate::constants::*;
use crate::params::{ParamName, ParamRange, ParamVector};
use crate::smooth_noise::SmoothNoise;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Plain circle; also the fallback for unknown names.
    #[default]
    Base,
    Square,
    Dot,
    Dither,
    Reaction,
    Strip,
    Satellite,
}

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::Base,
        Variant::Square,
        Variant::Dot,
        Variant::Dither,
        Variant::Reaction,
        Variant::Strip,
        Variant::Satellite,
    ];

    /// Resolve a style name; anything unrecognized is [`Variant::Base`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "square" | "squares" => Variant::Square,
            "dot" | "dots" => Variant::Dot,
            "dither" | "halftone" => Variant::Dither,
            "reaction" | "blob" => Variant::Reaction,
            "strip" | "strips" | "line" => Variant::Strip,
            "satellite" | "satellites" => Variant::Satellite,
            _ => Variant::Base,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::Square => "squares",
            Variant::Dot => "dots",
            Variant::Dither => "dither",
            Variant::Reaction => "reaction",
            Variant::Strip => "strips",
            Variant::Satellite => "satellites",
        }
    }
}

/// Variant tag plus variant-only state.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    Base,
    Square,
    Dot,
    Dither { noise_offset: Vec2 },
    Reaction,
    Strip { angle: f32, length: f32 },
    Satellite {
        orbit_radius: f32,
        orbit_angle: f32,
        orbit_speed: f32,
    },
}

impl Kind {
    pub fn variant(&self) -> Variant {
        match self {
            Kind::Base => Variant::Base,
            Kind::Square => Variant::Square,
            Kind::Dot => Variant::Dot,
            Kind::Dither { .. } => Variant::Dither,
            Kind::Reaction => Variant::Reaction,
            Kind::Strip { .. } => Variant::Strip,
            Kind::Satellite { .. } => Variant::Satellite,
        }
    }
}

/// Shared per-frame inputs. `time` and `dt` are in nominal frames.
#[derive(Clone, Copy)]
pub struct Tick<'a> {
    pub time: f32,
    pub dt: f32,
    pub noise: &'a SmoothNoise,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Resting anchor taken from a shape sample point.
    pub target: Vec2,
    /// Noise seed; stable for the particle's lifetime.
    pub id: u32,
    /// Generation of the field that spawned this particle.
    pub epoch: u64,
    pub kind: Kind,
    pub phase: f32,
    pub rotation: f32,
    rotation_speed: f32,
    pub size: f32,
    pub energy: f32,
    pub turbulence: f32,
    base_hue: f32,
    /// Base hue plus the slow per-particle drift, in degrees.
    pub hue: f32,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(
        variant: Variant,
        start: Vec2,
        target: Vec2,
        id: u32,
        epoch: u64,
        params: &ParamVector,
        rng: &mut R,
    ) -> Self {
        let size = params.value_or(ParamName::Radius, 5.0);
        let kind = match variant {
            Variant::Base => Kind::Base,
            Variant::Square => Kind::Square,
            Variant::Dot => Kind::Dot,
            Variant::Dither => Kind::Dither {
                noise_offset: Vec2::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)),
            },
            Variant::Reaction => Kind::Reaction,
            Variant::Strip => Kind::Strip {
                angle: rng.gen_range(0.0..TAU),
                length: size * 2.0,
            },
            Variant::Satellite => Kind::Satellite {
                orbit_radius: size * SATELLITE_ORBIT_FACTOR,
                orbit_angle: rng.gen_range(0.0..TAU),
                orbit_speed: rng.gen_range(0.01..0.03),
            },
        };
        let hue = params.value_or(ParamName::Hue, 0.0);
        Self {
            position: start,
            velocity: Vec2::ZERO,
            target,
            id,
            epoch,
            kind,
            phase: rng.gen_range(0.0..TAU),
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: rng.gen_range(-ROTATION_SPEED_MAX..ROTATION_SPEED_MAX),
            size,
            energy: params.value_or(ParamName::Energy, 50.0),
            turbulence: params.value_or(ParamName::Turbulence, 30.0),
            base_hue: hue,
            hue,
        }
    }

    pub fn variant(&self) -> Variant {
        self.kind.variant()
    }

    /// Advance one step. A zero (or negative) `dt` leaves the particle untouched.
    pub fn update(&mut self, params: &ParamVector, tick: &Tick) {
        if !(tick.dt > 0.0) {
            return;
        }
        self.base_hue = params.value_or(ParamName::Hue, 0.0);
        self.size = params.value_or(ParamName::Radius, 5.0);
        self.energy = params.value_or(ParamName::Energy, 50.0);
        self.turbulence = params.value_or(ParamName::Turbulence, 30.0);
        self.hue = ParamRange::Cyclic { period: 360.0 }.normalize(
            self.base_hue + (tick.time * HUE_DRIFT_RATE + self.phase).sin() * HUE_DRIFT_DEGREES,
        );

        if matches!(self.kind, Kind::Satellite { .. }) {
            self.orbit(tick);
        } else {
            self.drift_and_spring(tick);
            self.advance_secondary(tick);
        }
    }

    fn noise_pair(&self, noise: &SmoothNoise, t: f32) -> Vec2 {
        let seed = self.id as f32 * NOISE_ID_SCALE;
        Vec2::new(
            noise.sample2(seed, t),
            noise.sample2(seed + NOISE_Y_OFFSET, t),
        ) - Vec2::splat(0.5)
    }

    fn drift_and_spring(&mut self, tick: &Tick) {
        let dt = tick.dt;
        let energy_scale = self.energy / 50.0;
        let drift = self.noise_pair(tick.noise, tick.time * NOISE_TIME_SCALE * energy_scale);
        let force = remap(self.turbulence, 0.0, 100.0, 0.0, TURBULENCE_FORCE_MAX);
        let spring = (self.target - self.position) * SPRING_STRENGTH;

        self.velocity += (drift * force + spring) * dt;
        self.velocity *= DAMPING.powf(dt);
        self.position += self.velocity * dt;
        self.rotation += self.rotation_speed * energy_scale * dt;
    }

    fn advance_secondary(&mut self, tick: &Tick) {
        if let Kind::Strip { angle, length } = &mut self.kind {
            *length = self.size * 2.0;
            let wander = tick.noise.sample2(self.id as f32, tick.time * NOISE_TIME_SCALE) - 0.5;
            *angle += wander * STRIP_TURN_RATE * (self.energy / 50.0) * tick.dt;
        }
    }

    /// Orbital motion law: the anchor is circled, not sprung toward.
    fn orbit(&mut self, tick: &Tick) {
        let drift = self.noise_pair(tick.noise, tick.time * NOISE_TIME_SCALE);
        if let Kind::Satellite {
            orbit_radius,
            orbit_angle,
            orbit_speed,
        } = &mut self.kind
        {
            *orbit_radius = self.size * SATELLITE_ORBIT_FACTOR;
            let speed = remap(self.energy, 0.0, 100.0, 0.5, 2.0);
            *orbit_angle += *orbit_speed * speed * tick.dt;
            let wobble = remap(self.turbulence, 0.0, 100.0, 0.0, SATELLITE_TURBULENCE_MAX);
            let next =
                self.target + Vec2::from_angle(*orbit_angle) * *orbit_radius + drift * wobble;
            self.velocity = (next - self.position) / tick.dt;
            self.position = next;
        }
    }

    pub fn is_within(&self, min: Vec2, max: Vec2) -> bool {
        self.position.cmpge(min).all() && self.position.cmple(max).all()
    }

    pub fn display<C: Canvas + ?Sized>(&self, canvas: &mut C, tick: &Tick) {
        let t = tick.time;
        let hsb = |s: f32, b: f32, a: f32| Paint::Solid(Color::from_hsb(self.hue, s, b, a));
        match &self.kind {
            Kind::Base => {
                canvas.fill_circle(self.position, self.size * 0.5, &hsb(80.0, 90.0, 0.8));
            }
            Kind::Square => {
                let pulse = 1.0 + 0.15 * (t * 0.05 + self.phase).sin();
                canvas.fill_square(
                    self.position,
                    self.size * pulse,
                    self.rotation,
                    &hsb(80.0, 90.0, 0.8),
                );
                let window = (t / SPARKLE_WINDOW_FRAMES).floor() as u32;
                if hash01(self.id, window) < SPARKLE_CHANCE {
                    canvas.fill_circle(self.position, self.size * 0.25, &hsb(10.0, 100.0, 0.95));
                }
            }
            Kind::Dot => {
                let d = self.size * ((t * 0.05 + self.phase).sin() * 0.2 + 1.0);
                canvas.fill_circle(self.position, d, &hsb(60.0, 100.0, 0.15));
                canvas.fill_circle(self.position, d * 0.5, &hsb(70.0, 85.0, 0.7));
                canvas.fill_circle(self.position, d * 0.15, &hsb(20.0, 100.0, 0.9));
            }
            Kind::Dither { noise_offset } => {
                let p = (self.position + *noise_offset) * 0.01;
                let density = tick.noise.sample3(p.x, p.y, t * NOISE_TIME_SCALE);
                let d = remap(density, 0.0, 1.0, self.size * 0.3, self.size * 1.5);
                canvas.fill_circle(self.position, d * 0.5, &hsb(85.0, 80.0, 0.9));
            }
            Kind::Reaction => {
                let pulse = (t * 0.1 + self.phase).sin() * 0.3 + 1.0;
                let paint = hsb(100.0, 90.0, 0.6);
                for i in 0..3u32 {
                    let angle = i as f32 / 3.0 * TAU;
                    let seed = self.id.wrapping_add(i) as f32;
                    let offset = tick.noise.sample2(seed, t * 0.01) * self.size * 0.5;
                    let c = self.position + Vec2::from_angle(angle) * offset;
                    canvas.fill_circle(c, self.size * pulse * 0.5, &paint);
                }
            }
            Kind::Strip { angle, length } => {
                let len = length * (1.0 + 0.2 * (t * 0.08 + self.phase).sin());
                let half = Vec2::from_angle(*angle) * len * 0.5;
                let (a, b) = (self.position - half, self.position + half);
                canvas.line(a, b, 6.0, &hsb(90.0, 85.0, 0.12));
                canvas.line(a, b, 3.0, &hsb(90.0, 85.0, 0.3));
                canvas.line(a, b, 1.0, &hsb(40.0, 100.0, 0.9));
            }
            Kind::Satellite {
                orbit_radius,
                orbit_angle,
                ..
            } => {
                canvas.stroke_circle(self.target, *orbit_radius, 1.0, &hsb(50.0, 70.0, 0.2));
                canvas.fill_circle(self.position, self.size * 0.5, &hsb(80.0, 90.0, 0.9));
                let trail = self.target
                    + Vec2::from_angle(orbit_angle - SATELLITE_TRAIL_RADIANS) * *orbit_radius;
                canvas.line(self.position, trail, 1.0, &hsb(60.0, 80.0, 0.4));
            }
        }
    }
}

/// Cheap integer hash mapped to \[0, 1).
fn hash01(a: u32, b: u32) -> f32 {
    let mut n = a
        .wrapping_mul(374_761_393)
        .wrapping_add(b.wrapping_mul(668_265_263));
    n = (n ^ (n >> 13)).wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    (n & 0xFFFF) as f32 / 65536.0
}
