//! Built-in 5x7 block font used to rasterize text shapes.
//!
//! Each glyph is seven rows of five bits, most significant bit on the left.
//! Lowercase letters fold to uppercase; characters outside the table draw
//! nothing, which the sampler reports as an empty shape.

use glam::Vec2;
use image::{GrayImage, Luma};

pub const GLYPH_COLS: u32 = 5;
pub const GLYPH_ROWS: u32 = 7;
/// Horizontal advance in cells (glyph plus one blank column).
pub const GLYPH_ADVANCE: u32 = 6;
/// Cap height relative to the requested font size.
pub const CAP_HEIGHT_FACTOR: f32 = 0.7;

pub fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        ' ' => [0x00; 7],
        _ => return None,
    };
    Some(rows)
}

/// Draw `text` centered on `center` with white (255) cells.
///
/// Returns how many characters had a glyph; unsupported characters still
/// advance the pen so spacing stays stable.
pub fn draw_text(buf: &mut GrayImage, text: &str, center: Vec2, font_size: f32) -> usize {
    if !font_size.is_finite() || font_size <= 0.0 {
        return 0;
    }
    let cell = font_size * CAP_HEIGHT_FACTOR / GLYPH_ROWS as f32;
    let count = text.chars().count() as f32;
    if count == 0.0 {
        return 0;
    }
    let total_w = (count * GLYPH_ADVANCE as f32 - 1.0) * cell;
    let left = center.x - total_w * 0.5;
    let top = center.y - GLYPH_ROWS as f32 * cell * 0.5;

    let mut drawn = 0;
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        drawn += 1;
        let gx = left + (i as u32 * GLYPH_ADVANCE) as f32 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (0x10 >> col) != 0 {
                    let x0 = gx + col as f32 * cell;
                    let y0 = top + row as f32 * cell;
                    fill_cell(buf, x0, y0, cell);
                }
            }
        }
    }
    drawn
}

fn fill_cell(buf: &mut GrayImage, x0: f32, y0: f32, size: f32) {
    let (w, h) = buf.dimensions();
    let xs = (x0 - 0.5).ceil().max(0.0) as u32;
    let ys = (y0 - 0.5).ceil().max(0.0) as u32;
    let xe = ((x0 + size - 0.5).ceil().max(0.0) as u32).min(w);
    let ye = ((y0 + size - 0.5).ceil().max(0.0) as u32).min(h);
    for y in ys..ye {
        for x in xs..xe {
            buf.put_pixel(x, y, Luma([255]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_and_digit_has_ink() {
        for c in ('A'..='Z').chain('0'..='9') {
            let rows = glyph(c).unwrap_or_else(|| panic!("missing glyph {c}"));
            assert!(rows.iter().any(|r| *r != 0), "glyph {c} is blank");
            assert!(rows.iter().all(|r| *r < 0x20), "glyph {c} wider than 5 columns");
        }
    }

    #[test]
    fn lowercase_folds_to_uppercase() {
        assert_eq!(glyph('t'), glyph('T'));
    }

    #[test]
    fn unsupported_glyphs_draw_nothing() {
        let mut buf = GrayImage::new(64, 32);
        let drawn = draw_text(&mut buf, "✿✿", Vec2::new(32.0, 16.0), 20.0);
        assert_eq!(drawn, 0);
        assert!(buf.pixels().all(|p| p[0] == 0));
    }
}
