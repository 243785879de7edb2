//! CPU drawing surface: an opaque RGBA buffer with solid fills and glyph blitting.
//!
//! Glyph rasterization follows the rusttype coverage callback: each glyph
//! reports per-pixel coverage in [0, 1], which is alpha-blended over the
//! existing canvas pixel. The canvas itself stays opaque — the service never
//! emits transparency.

use image::{Rgba, RgbaImage};
use rusttype::{point, Scale};

use crate::fonts::LoadedFont;

pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// A `width` × `height` canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Canvas {
            img: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    /// Draws one run of text with its baseline starting at `(x, y)`.
    pub fn draw_text(
        &mut self,
        font: &LoadedFont,
        font_size: f32,
        x: f32,
        y: f32,
        color: Rgba<u8>,
        text: &str,
    ) {
        let scale = Scale::uniform(font_size);
        for glyph in font.raw().layout(text, scale, point(x, y)) {
            self.blit_glyph(&glyph, color);
        }
    }

    /// Draws text along a baseline rotated by `angle` radians, centered on
    /// `(cx, cy)`. Glyphs advance along the rotated direction; the glyph
    /// bitmaps themselves stay upright, which reads as rotation-in-place for
    /// the short runs the spin effect uses.
    pub fn draw_text_rotated(
        &mut self,
        font: &LoadedFont,
        font_size: f32,
        cx: f32,
        cy: f32,
        angle: f32,
        color: Rgba<u8>,
        text: &str,
    ) {
        let scale = Scale::uniform(font_size);
        let (dir_x, dir_y) = (angle.cos(), angle.sin());

        let mut advances: Vec<(char, f32)> = Vec::new();
        let mut total = 0.0_f32;
        for ch in text.chars() {
            let adv = font.raw().glyph(ch).scaled(scale).h_metrics().advance_width;
            advances.push((ch, adv));
            total += adv;
        }

        // Start half the run before the center so the run pivots around (cx, cy).
        let mut pen_x = cx - dir_x * total / 2.0;
        let mut pen_y = cy - dir_y * total / 2.0;
        for (ch, adv) in advances {
            let glyph = font
                .raw()
                .glyph(ch)
                .scaled(scale)
                .positioned(point(pen_x, pen_y));
            self.blit_glyph(&glyph, color);
            pen_x += dir_x * adv;
            pen_y += dir_y * adv;
        }
    }

    fn blit_glyph(&mut self, glyph: &rusttype::PositionedGlyph<'_>, color: Rgba<u8>) {
        let (w, h) = (self.img.width() as i32, self.img.height() as i32);
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px >= 0 && px < w && py >= 0 && py < h {
                    let dst = self.img.get_pixel_mut(px as u32, py as u32);
                    *dst = blend(*dst, color, coverage);
                }
            });
        }
    }
}

/// Alpha-blends `src` over `dst` with the given coverage. Output stays opaque.
pub(crate) fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let a = coverage.clamp(0.0, 1.0);
    let mix = |d: u8, s: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
    Rgba([
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_new_canvas_is_filled_with_background() {
        let canvas = Canvas::new(4, 3, Rgba([10, 20, 30, 255]));
        let img = canvas.into_image();
        assert_eq!(img.dimensions(), (4, 3));
        for pixel in img.pixels() {
            assert_eq!(*pixel, Rgba([10, 20, 30, 255]));
        }
    }

    #[test]
    fn test_blend_full_coverage_replaces() {
        assert_eq!(blend(WHITE, BLACK, 1.0), BLACK);
    }

    #[test]
    fn test_blend_zero_coverage_keeps_destination() {
        assert_eq!(blend(WHITE, BLACK, 0.0), WHITE);
    }

    #[test]
    fn test_blend_half_coverage_mixes() {
        let Rgba([r, g, b, a]) = blend(WHITE, BLACK, 0.5);
        assert_eq!(a, 255);
        for ch in [r, g, b] {
            assert!((127..=128).contains(&ch), "expected mid-gray, got {ch}");
        }
    }

    #[test]
    fn test_blend_clamps_out_of_range_coverage() {
        assert_eq!(blend(WHITE, BLACK, 2.0), BLACK);
        assert_eq!(blend(WHITE, BLACK, -1.0), WHITE);
    }
}
