//! Text-width measurement contract between the layout engine and the font layer.
//!
//! The engine never touches glyph data directly: it is handed something that can
//! answer "how wide is this string at this size". Production binds the trait to
//! loaded font metrics (`fonts::LoadedFont`); tests substitute a deterministic fake.

/// Synchronous, deterministic width measurement at a given font size, in pixels.
///
/// Implementations must be pure: identical `(text, font_size)` inputs yield
/// identical widths. The fitting search relies on this for idempotence.
pub trait TextMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        (**self).width(text, font_size)
    }
}

/// Deterministic stand-in measurer: `char_count × font_size × factor`.
///
/// Used by layout tests; also handy for quick overflow estimates where exact
/// glyph metrics are not worth a font lookup.
#[derive(Debug, Clone, Copy)]
pub struct CharCountMeasure {
    pub factor: f32,
}

impl Default for CharCountMeasure {
    fn default() -> Self {
        // 0.6em per character approximates an average Latin glyph.
        CharCountMeasure { factor: 0.6 }
    }
}

impl TextMeasure for CharCountMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_measure_scales_with_size() {
        let m = CharCountMeasure::default();
        assert_eq!(m.width("abcd", 10.0), 4.0 * 10.0 * 0.6);
        assert_eq!(m.width("abcd", 20.0), 4.0 * 20.0 * 0.6);
    }

    #[test]
    fn test_char_count_measure_empty_is_zero() {
        let m = CharCountMeasure::default();
        assert_eq!(m.width("", 48.0), 0.0);
    }

    #[test]
    fn test_char_count_measure_counts_chars_not_bytes() {
        let m = CharCountMeasure { factor: 1.0 };
        // "é" is 2 bytes but 1 char
        assert_eq!(m.width("é", 10.0), 10.0);
    }
}
