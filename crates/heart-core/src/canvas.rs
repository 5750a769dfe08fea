//! Drawing surface abstraction used by the `display()` side of the core.
//!
//! Particles and fields never own pixels; they issue a handful of primitive
//! calls against whatever [`Canvas`] the caller hands them each frame. Two
//! surfaces ship with the crate: the software [`Raster`](crate::Raster) and
//! the recording [`DrawList`].

use crate::texture::TextureTile;
use glam::Vec2;
use std::rc::Rc;

/// Straight (non-premultiplied) RGBA color with components in \[0, 1\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::rgba(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
            1.0,
        )
    }

    /// HSB color: hue in degrees (wrapped), saturation and brightness in
    /// \[0, 100\], alpha in \[0, 1\].
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let v = (brightness / 100.0).clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::rgba(r + m, g + m, b + m, alpha.clamp(0.0, 1.0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// A texture tile repeated over the whole plane, anchored at the origin.
#[derive(Clone, Debug)]
pub struct Pattern {
    pub tile: Rc<TextureTile>,
}

impl Pattern {
    /// Color of the pattern at canvas position `(x, y)`.
    pub fn sample(&self, x: i64, y: i64) -> Color {
        let img = self.tile.image();
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Color::TRANSPARENT;
        }
        let px = img.get_pixel(x.rem_euclid(w as i64) as u32, y.rem_euclid(h as i64) as u32);
        Color::rgba(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }
}

/// What a primitive is filled or stroked with.
#[derive(Clone, Debug)]
pub enum Paint {
    Solid(Color),
    Pattern(Pattern),
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

pub trait Canvas {
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, paint: &Paint);
    /// Filled square of side `side` rotated by `rotation` radians about its center.
    fn fill_square(&mut self, center: Vec2, side: f32, rotation: f32, paint: &Paint);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint);
}

#[derive(Clone, Debug)]
pub enum DrawCmd {
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        paint: Paint,
    },
    Square {
        center: Vec2,
        side: f32,
        rotation: f32,
        paint: Paint,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        paint: Paint,
    },
}

impl DrawCmd {
    /// Every coordinate and size in the command is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            DrawCmd::Circle { center, radius, .. } => center.is_finite() && radius.is_finite(),
            DrawCmd::Ring {
                center,
                radius,
                width,
                ..
            } => center.is_finite() && radius.is_finite() && width.is_finite(),
            DrawCmd::Square {
                center,
                side,
                rotation,
                ..
            } => center.is_finite() && side.is_finite() && rotation.is_finite(),
            DrawCmd::Line {
                from,
                to,
                width,
                ..
            } => from.is_finite() && to.is_finite() && width.is_finite(),
        }
    }
}

/// Canvas that records primitives instead of rasterizing them.
#[derive(Default, Debug)]
pub struct DrawList {
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for DrawList {
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, paint: &Paint) {
        self.commands.push(DrawCmd::Ring {
            center,
            radius,
            width,
            paint: paint.clone(),
        });
    }

    fn fill_square(&mut self, center: Vec2, side: f32, rotation: f32, paint: &Paint) {
        self.commands.push(DrawCmd::Square {
            center,
            side,
            rotation,
            paint: paint.clone(),
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        self.commands.push(DrawCmd::Line {
            from,
            to,
            width,
            paint: paint.clone(),
        });
    }
}
