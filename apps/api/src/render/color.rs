//! Color parsing and conversion for the drawing surface.
//!
//! Requests pass colors as CSS-style hex strings (`#RGB` or `#RRGGBB`); the
//! color-cycle animation walks the HSV hue wheel.

use image::Rgba;

/// Parses `#RGB` or `#RRGGBB` (leading `#` optional) into an opaque RGBA pixel.
pub fn parse_hex(s: &str) -> Result<Rgba<u8>, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    let expand = |c: u8| c << 4 | c;

    let channels = match hex.len() {
        3 => {
            let v = u16::from_str_radix(hex, 16).map_err(|_| bad_color(s))?;
            [
                expand(((v >> 8) & 0xF) as u8),
                expand(((v >> 4) & 0xF) as u8),
                expand((v & 0xF) as u8),
            ]
        }
        6 => {
            let v = u32::from_str_radix(hex, 16).map_err(|_| bad_color(s))?;
            [((v >> 16) & 0xFF) as u8, ((v >> 8) & 0xFF) as u8, (v & 0xFF) as u8]
        }
        _ => return Err(bad_color(s)),
    };
    Ok(Rgba([channels[0], channels[1], channels[2], 255]))
}

fn bad_color(s: &str) -> String {
    format!("'{s}' is not a valid color (expected #RGB or #RRGGBB)")
}

/// HSV → opaque RGBA. `h` in degrees (wrapped into [0, 360)), `s`/`v` in [0, 1].
pub fn hsv_to_rgba(h: f32, s: f32, v: f32) -> Rgba<u8> {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgba([
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
        255,
    ])
}
