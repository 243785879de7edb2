//! Still-picture rendering: auto-fit layout + centered block drawing.
//!
//! One parameterized path serves every still variant: canvas size, colors,
//! font, fit bounds, and wrap mode are all options with the stock 800×200
//! black-on-white defaults.

use image::{Rgba, RgbaImage};

use crate::errors::AppError;
use crate::fonts::FontStore;
use crate::layout::{fit, LayoutRequest, LayoutResult, TextMeasure, WrapMode};
use crate::render::canvas::Canvas;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Everything the still and animated paths need to rasterize one text block.
#[derive(Debug, Clone)]
pub struct PictureOptions {
    pub width: u32,
    pub height: u32,
    pub background: Rgba<u8>,
    pub foreground: Rgba<u8>,
    /// Registered family name; `None` uses the store default.
    pub font_family: Option<String>,
    pub initial_size: f32,
    pub min_size: f32,
    pub line_height_factor: f32,
    pub padding: f32,
    pub wrap_mode: WrapMode,
}

impl Default for PictureOptions {
    fn default() -> Self {
        // Stock canvas: 800×200, white background, black 48px text.
        PictureOptions {
            width: 800,
            height: 200,
            background: WHITE,
            foreground: BLACK,
            font_family: None,
            initial_size: 48.0,
            min_size: 10.0,
            line_height_factor: 1.2,
            padding: 20.0,
            wrap_mode: WrapMode::Word,
        }
    }
}

impl PictureOptions {
    pub fn layout_request(&self, text: &str) -> LayoutRequest {
        LayoutRequest {
            text: text.to_string(),
            box_width: self.width as f32,
            box_height: Some(self.height as f32),
            initial_size: self.initial_size,
            min_size: self.min_size,
            step: 1.0,
            line_height_factor: self.line_height_factor,
            padding: self.padding,
            wrap_mode: self.wrap_mode,
        }
    }
}

/// Runs the fitting search with the store-backed measurer.
pub fn layout_for(
    text: &str,
    opts: &PictureOptions,
    fonts: &FontStore,
) -> Result<LayoutResult, AppError> {
    let font = fonts.resolve(opts.font_family.as_deref())?;
    Ok(fit(&opts.layout_request(text), font))
}

/// Renders the fitted block onto a fresh canvas, lines horizontally centered
/// and the block vertically centered.
pub fn render_picture(
    text: &str,
    opts: &PictureOptions,
    fonts: &FontStore,
) -> Result<RgbaImage, AppError> {
    let layout = layout_for(text, opts, fonts)?;
    let mut canvas = Canvas::new(opts.width, opts.height, opts.background);
    draw_block(&mut canvas, 0.0, &layout, opts, fonts)?;
    Ok(canvas.into_image())
}

/// Draws an already-fitted layout. Shared by the still path and every animation
/// frame, which reuse one `LayoutResult` per response.
pub(crate) fn draw_block(
    canvas: &mut Canvas,
    dy: f32,
    layout: &LayoutResult,
    opts: &PictureOptions,
    fonts: &FontStore,
) -> Result<(), AppError> {
    let font = fonts.resolve(opts.font_family.as_deref())?;
    let block_height = layout.lines.len() as f32 * layout.line_height;
    let block_top = (opts.height as f32 - block_height) / 2.0 + dy;
    let ascent = font.ascent(layout.font_size);

    for (i, line) in layout.lines.iter().enumerate() {
        let line_width = font.width(line, layout.font_size);
        let x = (opts.width as f32 - line_width) / 2.0;
        let y = block_top + i as f32 * layout.line_height + ascent;
        canvas.draw_text(font, layout.font_size, x, y, opts.foreground, line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontStore;

    #[test]
    fn test_default_options_match_stock_canvas() {
        let opts = PictureOptions::default();
        assert_eq!((opts.width, opts.height), (800, 200));
        assert_eq!(opts.background, WHITE);
        assert_eq!(opts.foreground, BLACK);
        assert_eq!(opts.initial_size, 48.0);
        assert_eq!(opts.wrap_mode, WrapMode::Word);
    }

    #[test]
    fn test_layout_request_carries_box_and_padding() {
        let opts = PictureOptions::default();
        let req = opts.layout_request("hi");
        assert_eq!(req.box_width, 800.0);
        assert_eq!(req.box_height, Some(200.0));
        assert_eq!(req.padding, 20.0);
    }

    #[test]
    fn test_render_without_fonts_is_font_error() {
        let fonts = FontStore::empty();
        let result = render_picture("hello", &PictureOptions::default(), &fonts);
        assert!(matches!(result, Err(AppError::Font(_))));
    }
}
