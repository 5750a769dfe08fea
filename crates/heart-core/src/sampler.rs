//! Shape rasterization and point sampling.
//!
//! A shape (text or image mask) is rendered once into a 1:1 coverage buffer,
//! scanned on a fixed stride for "on" pixels, and the resulting candidates are
//! drawn from uniformly with replacement. Nothing is cached here; callers that
//! resample an unchanged shape keep their own copy of the points.

use crate::constants::*;
use crate::glyphs;
use glam::Vec2;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};
use rand::Rng;
use std::rc::Rc;

/// A canvas position where the source shape is filled.
pub type SamplePoint = Vec2;

#[derive(Clone, Debug)]
pub struct TextShape {
    pub text: String,
    pub font_size: f32,
    /// Canvas position of the text's center.
    pub anchor: Vec2,
}

#[derive(Clone, Debug)]
pub struct ImageShape {
    /// Only the alpha channel is read.
    pub mask: Rc<RgbaImage>,
    /// Center of the placement rectangle.
    pub center: Vec2,
    /// Width and height of the placement rectangle.
    pub size: Vec2,
}

#[derive(Clone, Debug)]
pub enum ShapeSource {
    Text(TextShape),
    Image(ImageShape),
}

impl ShapeSource {
    pub fn text(text: impl Into<String>, font_size: f32, anchor: Vec2) -> Self {
        ShapeSource::Text(TextShape {
            text: text.into(),
            font_size,
            anchor,
        })
    }

    pub fn image(mask: Rc<RgbaImage>, center: Vec2, size: Vec2) -> Self {
        ShapeSource::Image(ImageShape { mask, center, size })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleMode {
    #[default]
    Interior,
    /// Only opaque pixels bordering a non-opaque pixel one stride away.
    Outline,
}

#[derive(Clone, Debug)]
pub struct SamplerConfig {
    pub stride: u32,
    pub text_threshold: u8,
    pub image_threshold: u8,
    /// Max per-axis offset applied to each point when the request exceeds the
    /// candidate count.
    pub duplicate_jitter: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            stride: SAMPLE_STRIDE,
            text_threshold: TEXT_BRIGHTNESS_THRESHOLD,
            image_threshold: IMAGE_ALPHA_THRESHOLD,
            duplicate_jitter: DUPLICATE_JITTER,
        }
    }
}

/// Off-screen coverage buffer of a shape plus its placement on the canvas.
pub struct Coverage {
    pub buffer: GrayImage,
    /// Canvas position of buffer pixel (0, 0).
    pub offset: Vec2,
    /// Pixels strictly above this value are "on".
    pub threshold: u8,
}

impl Coverage {
    fn empty(threshold: u8) -> Self {
        Self {
            buffer: GrayImage::new(0, 0),
            offset: Vec2::ZERO,
            threshold,
        }
    }

    fn is_on(&self, x: i64, y: i64) -> bool {
        let (w, h) = self.buffer.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return false;
        }
        self.buffer.get_pixel(x as u32, y as u32)[0] > self.threshold
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShapeSampler {
    config: SamplerConfig,
}

impl ShapeSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn rasterize(&self, source: &ShapeSource) -> Coverage {
        match source {
            ShapeSource::Text(t) => self.rasterize_text(t),
            ShapeSource::Image(i) => self.rasterize_image(i),
        }
    }

    fn rasterize_text(&self, shape: &TextShape) -> Coverage {
        let threshold = self.config.text_threshold;
        let len = shape.text.chars().count() as f32;
        if len == 0.0 || !shape.font_size.is_finite() || shape.font_size <= 0.0 {
            return Coverage::empty(threshold);
        }
        let est_w = len * shape.font_size * TEXT_CHAR_WIDTH_FACTOR;
        let est_h = shape.font_size;
        let w = (est_w * TEXT_BUFFER_MARGIN).ceil() as u32;
        let h = (est_h * TEXT_BUFFER_MARGIN).ceil() as u32;
        let mut buffer = GrayImage::from_pixel(w, h, Luma([0]));
        let mid = Vec2::new(w as f32 * 0.5, h as f32 * 0.5);
        glyphs::draw_text(&mut buffer, &shape.text, mid, shape.font_size);
        Coverage {
            buffer,
            offset: shape.anchor - mid,
            threshold,
        }
    }

    fn rasterize_image(&self, shape: &ImageShape) -> Coverage {
        let threshold = self.config.image_threshold;
        let (mw, mh) = shape.mask.dimensions();
        if mw == 0 || mh == 0 || !shape.size.is_finite() {
            return Coverage::empty(threshold);
        }
        let w = shape.size.x.round().max(0.0) as u32;
        let h = shape.size.y.round().max(0.0) as u32;
        if w == 0 || h == 0 {
            return Coverage::empty(threshold);
        }
        let placed = imageops::resize(&*shape.mask, w, h, FilterType::Nearest);
        let buffer = GrayImage::from_fn(w, h, |x, y| Luma([placed.get_pixel(x, y)[3]]));
        Coverage {
            buffer,
            offset: shape.center - shape.size * 0.5,
            threshold,
        }
    }

    /// Every candidate point of `source`, in canvas coordinates.
    pub fn candidates(&self, source: &ShapeSource, mode: SampleMode) -> Vec<SamplePoint> {
        let coverage = self.rasterize(source);
        self.candidates_in(&coverage, mode)
    }

    pub fn candidates_in(&self, coverage: &Coverage, mode: SampleMode) -> Vec<SamplePoint> {
        let stride = self.config.stride.max(1);
        let s = stride as i64;
        let (w, h) = coverage.buffer.dimensions();
        let mut out = Vec::new();
        for py in (0..h).step_by(stride as usize) {
            for px in (0..w).step_by(stride as usize) {
                let (x, y) = (px as i64, py as i64);
                if !coverage.is_on(x, y) {
                    continue;
                }
                if mode == SampleMode::Outline
                    && coverage.is_on(x - s, y)
                    && coverage.is_on(x + s, y)
                    && coverage.is_on(x, y - s)
                    && coverage.is_on(x, y + s)
                {
                    continue;
                }
                out.push(coverage.offset + Vec2::new(px as f32, py as f32));
            }
        }
        out
    }

    /// Draw exactly `count` points from the shape (or none if it is empty).
    pub fn sample<R: Rng + ?Sized>(
        &self,
        source: &ShapeSource,
        count: usize,
        mode: SampleMode,
        rng: &mut R,
    ) -> Vec<SamplePoint> {
        let candidates = self.candidates(source, mode);
        if candidates.is_empty() {
            log::warn!("[sampler] shape produced no candidate pixels");
            return Vec::new();
        }
        log::debug!(
            "[sampler] {} candidates, drawing {}",
            candidates.len(),
            count
        );
        self.select(&candidates, count, rng)
    }

    /// Uniform draws with replacement; oversampled draws get a small jitter.
    pub fn select<R: Rng + ?Sized>(
        &self,
        candidates: &[SamplePoint],
        count: usize,
        rng: &mut R,
    ) -> Vec<SamplePoint> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let jitter = self.config.duplicate_jitter;
        let oversampled = count > candidates.len() && jitter > 0.0;
        (0..count)
            .map(|_| {
                let p = candidates[rng.gen_range(0..candidates.len())];
                if oversampled {
                    p + Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
                } else {
                    p
                }
            })
            .collect()
    }
}
