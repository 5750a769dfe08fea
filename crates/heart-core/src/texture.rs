//! Procedural fill textures, one small repeating tile per emotion and
//! parameter combination.

use crate::canvas::{Canvas, Color, Paint, Pattern};
use crate::constants::*;
use crate::error::{HeartError, Result};
use crate::params::{ParamName, ParamVector};
use crate::raster::Raster;
use fnv::{FnvHashMap, FnvHasher};
use glam::Vec2;
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_4, TAU};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Stroke style drawn into a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motif {
    /// Radiating rays with sparkles.
    Rays,
    /// Tangled curves or jagged strands.
    Tangle,
    /// Diagonal strokes, cross-hatched at high energy.
    Hatch,
    /// Explosive radial bursts.
    Burst,
    /// Horizontal waves with optional circular ripples.
    Ripple,
    /// Random straight lines.
    Scribble,
}

impl Motif {
    pub fn for_emotion(key: &str) -> Motif {
        match key.to_ascii_lowercase().as_str() {
            "happiness" => Motif::Rays,
            "envy" => Motif::Tangle,
            "anger" => Motif::Hatch,
            "rage" => Motif::Burst,
            "trust" => Motif::Ripple,
            _ => Motif::Scribble,
        }
    }
}

/// Cache key: emotion plus texture parameters snapped to multiples of 5.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub emotion: String,
    pub rounded: [i32; 5],
}

impl TileKey {
    pub fn new(emotion: &str, params: &ParamVector) -> Self {
        Self {
            emotion: emotion.to_ascii_lowercase(),
            rounded: params.rounded(TILE_KEY_ROUNDING),
        }
    }

    fn seed(&self) -> u64 {
        let mut h = FnvHasher::default();
        self.hash(&mut h);
        h.finish()
    }
}

#[derive(Debug)]
pub struct TextureTile {
    key: TileKey,
    motif: Motif,
    image: RgbaImage,
}

impl TextureTile {
    pub fn key(&self) -> &TileKey {
        &self.key
    }

    pub fn motif(&self) -> Motif {
        self.motif
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Number of pixels with any ink on them.
    pub fn coverage(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }
}

/// Builds tiles and keeps the most recently inserted ones.
pub struct TextureTileGenerator {
    tile_size: u32,
    capacity: usize,
    cache: FnvHashMap<TileKey, Rc<TextureTile>>,
    order: VecDeque<TileKey>,
}

impl Default for TextureTileGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureTileGenerator {
    pub fn new() -> Self {
        Self {
            tile_size: TILE_SIZE,
            capacity: TILE_CACHE_CAPACITY,
            cache: FnvHashMap::default(),
            order: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HeartError::ZeroCacheCapacity);
        }
        Ok(Self {
            capacity,
            ..Self::new()
        })
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size.max(1);
        self
    }

    /// Tile for `emotion` at `params`, from the cache when an equal key exists.
    ///
    /// `color` is not part of the key: one emotion always draws in its own color.
    pub fn generate(
        &mut self,
        emotion: &str,
        color: Color,
        params: &ParamVector,
    ) -> Rc<TextureTile> {
        let key = TileKey::new(emotion, params);
        if let Some(tile) = self.cache.get(&key) {
            return Rc::clone(tile);
        }

        let motif = Motif::for_emotion(&key.emotion);
        let mut raster = Raster::tiling(self.tile_size, self.tile_size);
        let mut rng = StdRng::seed_from_u64(key.seed());
        let knobs = Knobs::from_params(params);
        let paint = Paint::Solid(color.with_alpha(1.0));
        let mut painter = Painter {
            canvas: &mut raster,
            paint: &paint,
            size: self.tile_size as f32,
            rng: &mut rng,
        };
        match motif {
            Motif::Rays => painter.rays(&knobs),
            Motif::Tangle => painter.tangle(&knobs),
            Motif::Hatch => painter.hatch(&knobs),
            Motif::Burst => painter.burst(&knobs),
            Motif::Ripple => painter.ripple(&knobs),
            Motif::Scribble => painter.scribble(&knobs),
        }

        let tile = Rc::new(TextureTile {
            key: key.clone(),
            motif,
            image: raster.into_image(),
        });
        self.insert(key, Rc::clone(&tile));
        tile
    }

    fn insert(&mut self, key: TileKey, tile: Rc<TextureTile>) {
        while self.cache.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.cache.remove(&oldest);
            log::debug!("[texture] evicted {} {:?}", oldest.emotion, oldest.rounded);
        }
        log::debug!("[texture] new {} tile {:?}", key.emotion, key.rounded);
        self.order.push_back(key.clone());
        self.cache.insert(key, tile);
    }

    /// Repeating paint made from `tile`.
    pub fn create_pattern(&self, tile: &Rc<TextureTile>) -> Paint {
        Paint::Pattern(Pattern {
            tile: Rc::clone(tile),
        })
    }

    pub fn contains(&self, emotion: &str, params: &ParamVector) -> bool {
        self.cache.contains_key(&TileKey::new(emotion, params))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.order.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

/// Texture parameters read out of a vector; missing names fall back to 50.
struct Knobs {
    density: f32,
    energy: f32,
    amplitude: f32,
    roughness: f32,
    turbulence: f32,
}

impl Knobs {
    fn from_params(p: &ParamVector) -> Self {
        Self {
            density: p.value_or(ParamName::Density, 50.0),
            energy: p.value_or(ParamName::Energy, 50.0),
            amplitude: p.value_or(ParamName::Amplitude, 50.0),
            roughness: p.value_or(ParamName::Roughness, 50.0),
            turbulence: p.value_or(ParamName::Turbulence, 50.0),
        }
    }
}

/// Map a 0–100 parameter onto `[lo, hi]`.
#[inline]
fn pct(v: f32, lo: f32, hi: f32) -> f32 {
    remap(v, 0.0, 100.0, lo, hi)
}

/// Loop count for a fractional amount: every started unit counts.
#[inline]
fn count(v: f32) -> usize {
    v.max(0.0).ceil() as usize
}

type Polyline = SmallVec<[Vec2; 16]>;

struct Painter<'a> {
    canvas: &'a mut Raster,
    paint: &'a Paint,
    size: f32,
    rng: &'a mut StdRng,
}

impl Painter<'_> {
    fn jitter(&mut self, amount: f32) -> f32 {
        if amount > 0.0 {
            self.rng.gen_range(-amount..=amount)
        } else {
            0.0
        }
    }

    fn random_point(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(0.0..self.size),
            self.rng.gen_range(0.0..self.size),
        )
    }

    fn center(&self) -> Vec2 {
        Vec2::splat(self.size * 0.5)
    }

    fn polyline(&mut self, points: &[Vec2], width: f32) {
        for pair in points.windows(2) {
            self.canvas.line(pair[0], pair[1], width, self.paint);
        }
    }

    fn rays(&mut self, k: &Knobs) {
        let c = self.center();
        let num_rays = pct(k.density, 5.0, 40.0);
        let ray_len = pct(k.amplitude, 10.0, 50.0);
        let segments = pct(k.roughness, 1.0, 10.0).floor().max(1.0) as usize;
        let angle_noise = pct(k.turbulence, 0.0, 0.5);
        let length_noise = pct(k.turbulence, 0.0, 20.0);
        let phase = k.energy * 0.1;
        let rough = if k.roughness > 20.0 { k.roughness * 0.05 } else { 0.0 };

        for i in 0..count(num_rays) {
            let fi = i as f32;
            let angle = TAU / num_rays * fi + (fi + phase).sin() * angle_noise;
            let len = ray_len + (fi * 2.0 + phase).cos() * length_noise;
            let dir = Vec2::from_angle(angle);
            let mut pts = Polyline::new();
            for s in 0..=segments {
                let t = s as f32 / segments as f32;
                let mut p = c + dir * len * t;
                if s > 0 {
                    p += Vec2::new(self.jitter(rough), self.jitter(rough));
                }
                pts.push(p);
            }
            self.polyline(&pts, 1.0);
        }

        let sparkle = pct(k.amplitude, 1.0, 4.0) * 0.5;
        for _ in 0..count(pct(k.density, 3.0, 20.0)) {
            let r = self.rng.gen_range(0.0..=ray_len * 0.5);
            let a = self.rng.gen_range(0.0..TAU);
            self.canvas
                .stroke_circle(c + Vec2::from_angle(a) * r, sparkle, 1.0, self.paint);
        }
    }

    fn tangle(&mut self, k: &Knobs) {
        let width = pct(k.amplitude, 0.5, 2.0);
        let spread = pct(k.turbulence, 20.0, self.size);
        let curviness = pct(k.roughness, 1.0, 0.0);
        let wobble = 30.0 * pct(k.energy, 1.0, 3.0);

        for _ in 0..count(pct(k.density, 10.0, 60.0)) {
            let a = self.random_point();
            let b = a + Vec2::new(self.jitter(spread), self.jitter(spread));
            if curviness > 0.3 {
                let c1 = a + Vec2::new(self.jitter(wobble), self.jitter(wobble));
                let c2 = b + Vec2::new(self.jitter(wobble), self.jitter(wobble));
                let pts: Polyline = (0..=16)
                    .map(|i| cubic(a, c1, c2, b, i as f32 / 16.0))
                    .collect();
                self.polyline(&pts, width);
            } else {
                let segments = pct(k.roughness, 2.0, 8.0).floor().max(1.0) as usize;
                for s in 0..segments {
                    let t1 = s as f32 / segments as f32;
                    let t2 = (s + 1) as f32 / segments as f32;
                    let p1 = a.lerp(b, t1) + Vec2::new(self.jitter(5.0), self.jitter(5.0));
                    let p2 = a.lerp(b, t2) + Vec2::new(self.jitter(5.0), self.jitter(5.0));
                    self.canvas.line(p1, p2, width, self.paint);
                }
            }
        }
    }

    fn hatch(&mut self, k: &Knobs) {
        let width = pct(k.amplitude, 1.0, 3.0);
        let spacing = pct(k.density, 15.0, 3.0).max(1.0);
        let length_var = pct(k.amplitude, 5.0, 30.0);
        let angle_var = pct(k.roughness, 0.0, 0.3);
        let jitter = pct(k.turbulence, 0.0, 10.0);

        self.hatch_pass(0.0, FRAC_PI_4, spacing, width, length_var, angle_var, jitter);
        if k.energy > 50.0 {
            self.hatch_pass(
                self.size,
                -FRAC_PI_4,
                spacing * 1.5,
                width,
                length_var,
                angle_var,
                jitter,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn hatch_pass(
        &mut self,
        y: f32,
        base_angle: f32,
        spacing: f32,
        width: f32,
        length_var: f32,
        angle_var: f32,
        jitter: f32,
    ) {
        let mut x = -self.size;
        while x < self.size * 2.0 {
            let start = Vec2::new(x + self.jitter(jitter), y);
            let angle = base_angle + self.jitter(angle_var);
            let len = self.size + self.jitter(length_var);
            self.canvas
                .line(start, start + Vec2::from_angle(angle) * len, width, self.paint);
            x += spacing;
        }
    }

    fn burst(&mut self, k: &Knobs) {
        let c = self.center();
        let width = pct(k.amplitude, 0.5, 3.0);
        let burst_len = pct(k.amplitude, 15.0, 60.0);
        let segments = pct(k.roughness, 1.0, 8.0).floor().max(1.0) as usize;
        let chaos = pct(k.turbulence, 0.1, 1.0);
        let energy_factor = pct(k.energy, 0.5, 2.0);

        for _ in 0..count(pct(k.density, 10.0, 60.0)) {
            let dir = Vec2::from_angle(self.rng.gen_range(0.0..TAU));
            let len = burst_len
                * self.rng.gen_range(0.5..=1.0)
                * energy_factor
                * (1.0 + chaos * self.rng.gen_range(-0.5..=0.5));
            let mut pts = Polyline::new();
            for s in 0..=segments {
                let t = s as f32 / segments as f32;
                let wobble = Vec2::new(self.jitter(chaos * 5.0), self.jitter(chaos * 5.0));
                pts.push(c + dir * len * t + wobble);
            }
            self.polyline(&pts, width);
        }
    }

    fn ripple(&mut self, k: &Knobs) {
        let width = pct(k.amplitude, 0.5, 2.0);
        let num_waves = pct(k.density, 3.0, 15.0);
        let step = self.size / num_waves;
        let wave_height = pct(k.amplitude, 2.0, 15.0);
        let smoothness = pct(k.roughness, 5.0, 20.0);
        let irregularity = pct(k.turbulence, 0.0, 0.5) * 5.0;
        let frequency = pct(k.energy, 0.02, 0.1);

        for i in 0..count(num_waves) {
            let fi = i as f32;
            let mut pts = Polyline::new();
            let mut x = 0.0;
            while x <= self.size {
                let y = fi * step
                    + (x * frequency + fi).sin() * wave_height
                    + self.jitter(irregularity);
                pts.push(Vec2::new(x, y));
                x += smoothness;
            }
            self.polyline(&pts, width);
        }

        if k.density > 60.0 {
            let c = self.center();
            let gap = 50.0 / remap(k.density, 60.0, 100.0, 3.0, 8.0);
            let mut d = 10.0;
            while d < 50.0 {
                self.canvas.stroke_circle(c, d * 0.5, width, self.paint);
                d += gap;
            }
        }
    }

    fn scribble(&mut self, k: &Knobs) {
        for _ in 0..count(pct(k.density, 5.0, 30.0)) {
            let a = self.random_point();
            let b = self.random_point();
            self.canvas.line(a, b, 1.0, self.paint);
        }
    }
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
