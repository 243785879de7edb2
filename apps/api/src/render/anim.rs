//! Animated rendering: a short frame sequence over one fitted layout.
//!
//! The layout is computed once per response and reused for every frame —
//! effects only vary the draw parameters (offset, angle, color), never the
//! line breaks or font size.

use std::f32::consts::TAU;

use image::{Rgba, RgbaImage};

use crate::errors::AppError;
use crate::fonts::FontStore;
use crate::render::canvas::Canvas;
use crate::render::color::hsv_to_rgba;
use crate::render::picture::{draw_block, layout_for, PictureOptions};

/// The supported frame effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Vertical sinusoidal offset of the text block.
    Bounce,
    /// Text baseline rotates a full turn around the canvas center.
    Spin,
    /// Foreground color walks the HSV hue wheel.
    Cycle,
}

impl Effect {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "bounce" => Ok(Effect::Bounce),
            "spin" => Ok(Effect::Spin),
            "cycle" | "colors" => Ok(Effect::Cycle),
            other => Err(format!(
                "'{other}' is not a valid effect (expected bounce, spin, or cycle)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimOptions {
    pub picture: PictureOptions,
    pub effect: Effect,
    pub frame_count: u16,
    pub delay_ms: u32,
    /// Peak vertical travel of the bounce effect, in pixels.
    pub bounce_amplitude: f32,
}

impl Default for AnimOptions {
    fn default() -> Self {
        AnimOptions {
            picture: PictureOptions::default(),
            effect: Effect::Bounce,
            frame_count: 24,
            delay_ms: 50,
            bounce_amplitude: 30.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-frame parameter functions (pure)
// ────────────────────────────────────────────────────────────────────────────

/// Loop phase of frame `i` out of `n`, in [0, 1).
fn phase(i: u16, n: u16) -> f32 {
    i as f32 / n.max(1) as f32
}

/// Vertical offset of frame `i`: one full sine period across the loop, so the
/// last frame flows back into the first.
pub fn bounce_offset(i: u16, n: u16, amplitude: f32) -> f32 {
    amplitude * (TAU * phase(i, n)).sin()
}

/// Rotation angle of frame `i`: one full turn across the loop, in radians.
pub fn spin_angle(i: u16, n: u16) -> f32 {
    TAU * phase(i, n)
}

/// Foreground color of frame `i`: one trip around the hue wheel.
pub fn cycle_color(i: u16, n: u16) -> Rgba<u8> {
    hsv_to_rgba(360.0 * phase(i, n), 1.0, 0.85)
}

// ────────────────────────────────────────────────────────────────────────────
// Frame rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the full frame sequence for one animated response.
pub fn render_frames(
    text: &str,
    opts: &AnimOptions,
    fonts: &FontStore,
) -> Result<Vec<RgbaImage>, AppError> {
    let layout = layout_for(text, &opts.picture, fonts)?;
    let n = opts.frame_count.max(1);

    let mut frames = Vec::with_capacity(n as usize);
    for i in 0..n {
        let mut canvas = Canvas::new(opts.picture.width, opts.picture.height, opts.picture.background);
        match opts.effect {
            Effect::Bounce => {
                let dy = bounce_offset(i, n, opts.bounce_amplitude);
                draw_block(&mut canvas, dy, &layout, &opts.picture, fonts)?;
            }
            Effect::Cycle => {
                let mut frame_opts = opts.picture.clone();
                frame_opts.foreground = cycle_color(i, n);
                draw_block(&mut canvas, 0.0, &layout, &frame_opts, fonts)?;
            }
            Effect::Spin => {
                draw_spin_frame(&mut canvas, spin_angle(i, n), &layout, &opts.picture, fonts)?;
            }
        }
        frames.push(canvas.into_image());
    }
    Ok(frames)
}

/// Spin frame: each line rotates around the canvas center, offset from the
/// block center along the rotated perpendicular so multi-line blocks keep
/// their line spacing while turning.
fn draw_spin_frame(
    canvas: &mut Canvas,
    angle: f32,
    layout: &crate::layout::LayoutResult,
    opts: &PictureOptions,
    fonts: &FontStore,
) -> Result<(), AppError> {
    let font = fonts.resolve(opts.font_family.as_deref())?;
    let cx = opts.width as f32 / 2.0;
    let cy = opts.height as f32 / 2.0;
    let (perp_x, perp_y) = (-angle.sin(), angle.cos());
    let mid = (layout.lines.len() as f32 - 1.0) / 2.0;

    for (i, line) in layout.lines.iter().enumerate() {
        let offset = (i as f32 - mid) * layout.line_height;
        let line_cx = cx + perp_x * offset;
        let line_cy = cy + perp_y * offset;
        canvas.draw_text_rotated(
            font,
            layout.font_size,
            line_cx,
            line_cy,
            angle,
            opts.foreground,
            line,
        );
    }
    Ok(())
}
