//! Software RGBA surface backed by `image::RgbaImage`.
//!
//! Coverage is binary (pixel centers inside the primitive) and blending is
//! straight-alpha source-over. A tiling raster wraps writes around its edges
//! so whatever is drawn on it repeats seamlessly.

use crate::canvas::{Canvas, Color, Paint};
use glam::Vec2;
use image::{Rgba, RgbaImage};

pub struct Raster {
    img: RgbaImage,
    wrap: bool,
}

impl Raster {
    /// Transparent surface that clips at its edges.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
            wrap: false,
        }
    }

    /// Transparent surface whose writes wrap around both axes.
    pub fn tiling(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
            wrap: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    pub fn clear(&mut self, color: Color) {
        let px = Rgba(color.to_rgba8());
        for p in self.img.pixels_mut() {
            *p = px;
        }
    }

    /// Number of pixels whose value differs from `background`.
    pub fn count_differing(&self, background: Color) -> usize {
        let bg = Rgba(background.to_rgba8());
        self.img.pixels().filter(|p| **p != bg).count()
    }

    fn blend(&mut self, x: i64, y: i64, paint: &Paint) {
        let (w, h) = (self.img.width() as i64, self.img.height() as i64);
        if w == 0 || h == 0 {
            return;
        }
        let (px, py) = if self.wrap {
            (x.rem_euclid(w), y.rem_euclid(h))
        } else if x < 0 || y < 0 || x >= w || y >= h {
            return;
        } else {
            (x, y)
        };
        let src = match paint {
            Paint::Solid(c) => *c,
            Paint::Pattern(p) => p.sample(x, y),
        };
        if src.a <= 0.0 {
            return;
        }
        let dst = self.img.get_pixel_mut(px as u32, py as u32);
        let da = dst[3] as f32 / 255.0;
        let out_a = src.a + da * (1.0 - src.a);
        let mix = |s: f32, d: u8| {
            let d = d as f32 / 255.0;
            let v = (s * src.a + d * da * (1.0 - src.a)) / out_a.max(f32::EPSILON);
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        *dst = Rgba([
            mix(src.r, dst[0]),
            mix(src.g, dst[1]),
            mix(src.b, dst[2]),
            (out_a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]);
    }

    /// Integer pixel span covering `[lo, hi]`, clipped unless wrapping.
    fn span(&self, lo: f32, hi: f32, extent: u32) -> Option<(i64, i64)> {
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        let (mut a, mut b) = (lo.floor() as i64, hi.ceil() as i64);
        if self.wrap {
            // a primitive wider than the tile covers it at most once more
            let limit = extent as i64 * 2;
            if b - a > limit {
                b = a + limit;
            }
        } else {
            a = a.max(0);
            b = b.min(extent as i64 - 1);
        }
        (a <= b).then_some((a, b))
    }

    /// Blend every pixel of the bounding box around `center` whose center
    /// passes `inside`; falls back to the single nearest pixel when the
    /// primitive is smaller than one pixel.
    fn fill_where(
        &mut self,
        center: Vec2,
        reach: f32,
        paint: &Paint,
        inside: impl Fn(Vec2) -> bool,
    ) {
        if !center.is_finite() || !reach.is_finite() || reach <= 0.0 {
            return;
        }
        let Some((x0, x1)) = self.span(center.x - reach, center.x + reach, self.img.width()) else {
            return;
        };
        let Some((y0, y1)) = self.span(center.y - reach, center.y + reach, self.img.height()) else {
            return;
        };
        let mut any = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, paint);
                    any = true;
                }
            }
        }
        if !any && inside(center) {
            self.blend(center.x.floor() as i64, center.y.floor() as i64, paint);
        }
    }
}

impl Canvas for Raster {
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let r2 = radius * radius;
        self.fill_where(center, radius, paint, |p| p.distance_squared(center) <= r2);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, paint: &Paint) {
        let half = (width * 0.5).max(0.5);
        self.fill_where(center, radius + half, paint, |p| {
            (p.distance(center) - radius).abs() <= half
        });
    }

    fn fill_square(&mut self, center: Vec2, side: f32, rotation: f32, paint: &Paint) {
        let half = side * 0.5;
        let (sin, cos) = (-rotation).sin_cos();
        self.fill_where(center, half * std::f32::consts::SQRT_2, paint, |p| {
            let d = p - center;
            let local = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
            local.x.abs() <= half && local.y.abs() <= half
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let mid = (from + to) * 0.5;
        let reach = from.distance(to) * 0.5 + half;
        let seg = to - from;
        let len2 = seg.length_squared();
        self.fill_where(mid, reach, paint, |p| {
            let t = if len2 > 0.0 {
                ((p - from).dot(seg) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            p.distance(from + seg * t) <= half
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipping_raster_ignores_offscreen_primitives() {
        let mut r = Raster::new(10, 10);
        r.fill_circle(Vec2::new(-50.0, -50.0), 3.0, &Color::WHITE.into());
        assert_eq!(r.count_differing(Color::TRANSPARENT), 0);
    }

    #[test]
    fn tiling_raster_wraps_across_edges() {
        let mut r = Raster::tiling(10, 10);
        r.fill_circle(Vec2::new(0.0, 0.0), 2.0, &Color::WHITE.into());
        // quarter discs land in all four corners
        assert_ne!(r.image().get_pixel(0, 0)[3], 0);
        assert_ne!(r.image().get_pixel(9, 9)[3], 0);
        assert_ne!(r.image().get_pixel(9, 0)[3], 0);
        assert_ne!(r.image().get_pixel(0, 9)[3], 0);
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut r = Raster::new(8, 8);
        r.line(Vec2::new(f32::NAN, 0.0), Vec2::new(4.0, 4.0), 1.0, &Color::WHITE.into());
        r.fill_circle(Vec2::new(4.0, 4.0), f32::INFINITY, &Color::WHITE.into());
        assert_eq!(r.count_differing(Color::TRANSPARENT), 0);
    }
}
