//! Auto-Fit Text Layout Engine — greedy wrapping plus a bounded font-size search.
//!
//! # Algorithm
//! - `wrap_to_width` breaks text into lines with greedy word packing: words are
//!   never split or dropped, and a single word wider than the line is emitted as
//!   an overflowing line rather than hyphenated.
//! - `fit` scans font sizes from `initial_size` down to `min_size` in fixed steps,
//!   re-wrapping at each size, and accepts the first size where every line fits the
//!   usable width and (when height-constrained) the block fits the usable height.
//!   If the scan exhausts the range, the layout at `min_size` is returned as-is —
//!   overflow past the box is tolerated, never an error.
//!
//! # Conventions
//! - Empty or whitespace-only text fits trivially: one empty line at `initial_size`.
//! - Words are whitespace-delimited; runs of whitespace collapse to single spaces.
//!
//! The engine is pure and deterministic given a deterministic `TextMeasure`.

use serde::{Deserialize, Serialize};

use crate::layout::measure::TextMeasure;

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// How text is broken into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    /// Break at word boundaries (greedy packing, no mid-word splits).
    Word,
    /// Break at any character, ignoring word boundaries.
    Char,
}

/// One fitting request: the text plus the box constraints and search bounds.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub text: String,
    /// Outer box width in pixels (padding is subtracted on both sides).
    pub box_width: f32,
    /// Outer box height in pixels. `None` disables the height constraint.
    pub box_height: Option<f32>,
    /// Search starts here (upper bound on the returned size).
    pub initial_size: f32,
    /// Search floor (lower bound on the returned size).
    pub min_size: f32,
    /// Decrement per search step. Clamped to ≥ 0.5 so the search always advances.
    pub step: f32,
    /// Multiplier on font size for vertical line spacing.
    pub line_height_factor: f32,
    /// Inset applied to all four box edges.
    pub padding: f32,
    pub wrap_mode: WrapMode,
}

impl LayoutRequest {
    pub fn new(text: impl Into<String>, box_width: f32) -> Self {
        LayoutRequest {
            text: text.into(),
            box_width,
            box_height: None,
            initial_size: 48.0,
            min_size: 10.0,
            step: 1.0,
            line_height_factor: 1.2,
            padding: 20.0,
            wrap_mode: WrapMode::Word,
        }
    }

    /// Width actually available for glyphs after padding.
    fn usable_width(&self) -> f32 {
        (self.box_width - 2.0 * self.padding).max(1.0)
    }

    /// Height available for the wrapped block, if the box is height-constrained.
    fn usable_height(&self) -> Option<f32> {
        self.box_height.map(|h| (h - 2.0 * self.padding).max(1.0))
    }
}

/// A line produced during wrapping, with its measured width at the wrap size.
/// Transient: consumed by the fitting search, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLine {
    pub text: String,
    pub width: f32,
}

/// The chosen layout: lines in reading order plus the accepted font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub lines: Vec<String>,
    pub font_size: f32,
    /// `font_size × line_height_factor`, precomputed for renderers.
    pub line_height: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap at a fixed font size.
///
/// Invariant: rejoining the returned lines with single spaces reproduces the
/// (whitespace-normalized) input. A word wider than `max_width` becomes its own
/// overflowing line. Empty input yields an empty sequence — `fit` normalizes
/// that to a single empty line.
pub fn wrap_to_width<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    font_size: f32,
    max_width: f32,
) -> Vec<MeasuredLine> {
    let mut lines: Vec<MeasuredLine> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        let candidate_width = measure.width(&candidate, font_size);

        if candidate_width <= max_width || current.is_empty() {
            // Fits, or a lone over-wide word: accept the overflow, no mid-word split.
            current = candidate;
            current_width = candidate_width;
        } else {
            lines.push(MeasuredLine {
                text: std::mem::take(&mut current),
                width: current_width,
            });
            current = word.to_string();
            current_width = measure.width(word, font_size);
        }
    }

    if !current.is_empty() {
        lines.push(MeasuredLine {
            text: current,
            width: current_width,
        });
    }
    lines
}

/// Character-based wrap variant for effects that ignore word boundaries.
///
/// Every character of the input appears exactly once, in order, across the
/// returned lines (spaces included). Concatenating the lines reproduces the
/// input byte-for-byte.
pub fn wrap_chars<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    font_size: f32,
    max_width: f32,
) -> Vec<MeasuredLine> {
    let mut lines: Vec<MeasuredLine> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for ch in text.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        let candidate_width = measure.width(&candidate, font_size);

        if candidate_width <= max_width || current.is_empty() {
            current = candidate;
            current_width = candidate_width;
        } else {
            lines.push(MeasuredLine {
                text: std::mem::take(&mut current),
                width: current_width,
            });
            current.push(ch);
            current_width = measure.width(&current, font_size);
        }
    }

    if !current.is_empty() {
        lines.push(MeasuredLine {
            text: current,
            width: current_width,
        });
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Fitting search
// ────────────────────────────────────────────────────────────────────────────

/// Bounded linear search for the largest font size whose wrapped block fits.
///
/// Always returns a layout: when no size in `[min_size, initial_size]` satisfies
/// the constraints, the best-effort wrap at `min_size` is returned with overflow
/// tolerated. The returned size is monotone in the constraints — never above
/// `initial_size`, never below `min_size`.
pub fn fit<M: TextMeasure + ?Sized>(req: &LayoutRequest, measure: &M) -> LayoutResult {
    let usable_w = req.usable_width();
    let usable_h = req.usable_height();
    let min_size = req.min_size.max(1.0);
    let step = req.step.max(0.5);

    // Empty-text convention: one empty line at the initial size.
    if req.text.split_whitespace().next().is_none() {
        return LayoutResult {
            lines: vec![String::new()],
            font_size: req.initial_size,
            line_height: req.initial_size * req.line_height_factor,
        };
    }

    let mut size = req.initial_size.max(min_size);
    loop {
        let lines = match req.wrap_mode {
            WrapMode::Word => wrap_to_width(&req.text, measure, size, usable_w),
            WrapMode::Char => wrap_chars(&req.text, measure, size, usable_w),
        };

        let fits_width = lines.iter().all(|l| l.width <= usable_w);
        let fits_height = match usable_h {
            Some(h) => lines.len() as f32 * size * req.line_height_factor <= h,
            None => true,
        };

        if (fits_width && fits_height) || size <= min_size {
            return LayoutResult {
                lines: lines.into_iter().map(|l| l.text).collect(),
                font_size: size,
                line_height: size * req.line_height_factor,
            };
        }
        size = (size - step).max(min_size);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::CharCountMeasure;

    fn fake() -> CharCountMeasure {
        // width = char_count × font_size × 0.6
        CharCountMeasure::default()
    }

    fn req(text: &str) -> LayoutRequest {
        LayoutRequest::new(text, 800.0)
    }

    // ── wrap_to_width ───────────────────────────────────────────────────────

    #[test]
    fn test_wrap_rejoin_reproduces_input() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_to_width(text, &fake(), 30.0, 200.0);
        let rejoined = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_wrap_no_line_overflows_when_words_fit() {
        // Every word fits: max word 5 chars × 10 × 0.6 = 30 ≤ 100
        let text = "alpha beta gamma delta epsilon zeta";
        let lines = wrap_to_width(text, &fake(), 10.0, 100.0);
        for line in &lines {
            assert!(
                line.width <= 100.0,
                "line '{}' overflows: {}",
                line.text,
                line.width
            );
        }
    }

    #[test]
    fn test_wrap_overwide_word_kept_whole() {
        // 20 chars × 10 × 0.6 = 120 > 50 — must still come out as one line
        let text = "abcdefghijklmnopqrst";
        let lines = wrap_to_width(text, &fake(), 10.0, 50.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, text);
        assert!(lines[0].width > 50.0);
    }

    #[test]
    fn test_wrap_empty_input_is_empty_sequence() {
        assert!(wrap_to_width("", &fake(), 10.0, 100.0).is_empty());
        assert!(wrap_to_width("   ", &fake(), 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_two_words_per_line() {
        // "A B" = 3 chars × 10 × 0.6 = 18 ≤ 20; "A B C" = 30 > 20
        let text = "A B C D E F G H";
        let lines = wrap_to_width(text, &fake(), 10.0, 20.0);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert_eq!(line.text.split(' ').count(), 2);
        }
        let rejoined = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_wrap_no_empty_lines() {
        let text = "one two three four five six seven eight nine ten";
        for max_width in [10.0_f32, 30.0, 60.0, 120.0, 1000.0] {
            let lines = wrap_to_width(text, &fake(), 10.0, max_width);
            assert!(lines.iter().all(|l| !l.text.is_empty()));
        }
    }

    // ── wrap_chars ──────────────────────────────────────────────────────────

    #[test]
    fn test_wrap_chars_concat_reproduces_input() {
        let text = "HELLO WORLD AGAIN";
        let lines = wrap_chars(text, &fake(), 10.0, 30.0);
        let concat: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(concat, text);
    }

    #[test]
    fn test_wrap_chars_ignores_word_boundaries() {
        // 5 chars per line: 5 × 10 × 0.6 = 30
        let lines = wrap_chars("abcdefghij", &fake(), 10.0, 30.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "abcde");
        assert_eq!(lines[1].text, "fghij");
    }

    #[test]
    fn test_wrap_chars_every_line_within_width() {
        let lines = wrap_chars("some longer sample text here", &fake(), 10.0, 40.0);
        for line in &lines {
            assert!(line.width <= 40.0);
        }
    }

    // ── fit ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_fit_hello_world_single_line_largest_size() {
        // The service's stock canvas: 800×200, padding 20 → usable 760×160.
        // "HELLO WORLD" = 11 chars; width = 11 × size × 0.6 ≤ 760 → size ≤ 115.15…
        // The height bound rules out a two-line layout at any larger size.
        let mut r = req("HELLO WORLD");
        r.box_height = Some(200.0);
        r.initial_size = 300.0;
        r.min_size = 10.0;
        let result = fit(&r, &fake());
        assert_eq!(result.lines, vec!["HELLO WORLD".to_string()]);
        assert_eq!(result.font_size, 115.0);
        assert!(11.0 * result.font_size * 0.6 <= 760.0);
        // One step larger must overflow
        assert!(11.0 * (result.font_size + 1.0) * 0.6 > 760.0);
    }

    #[test]
    fn test_fit_empty_text_single_empty_line_at_initial_size() {
        let mut r = req("");
        r.initial_size = 48.0;
        let result = fit(&r, &fake());
        assert_eq!(result.lines, vec![String::new()]);
        assert_eq!(result.font_size, 48.0);
    }

    #[test]
    fn test_fit_whitespace_only_treated_as_empty() {
        let result = fit(&req("   \t "), &fake());
        assert_eq!(result.lines, vec![String::new()]);
        assert_eq!(result.font_size, 48.0);
    }

    #[test]
    fn test_fit_size_never_below_min_or_above_initial() {
        let mut r = req("an unreasonably long string that cannot possibly fit anywhere");
        r.box_width = 30.0;
        r.padding = 0.0;
        r.initial_size = 100.0;
        r.min_size = 12.0;
        let result = fit(&r, &fake());
        assert!(result.font_size >= 12.0);
        assert!(result.font_size <= 100.0);
        // Nothing fits a 30px box — search must bottom out at the floor.
        assert_eq!(result.font_size, 12.0);
    }

    #[test]
    fn test_fit_at_floor_tolerates_overflow() {
        let mut r = req("overflowing");
        r.box_width = 10.0;
        r.padding = 0.0;
        r.min_size = 10.0;
        let result = fit(&r, &fake());
        assert_eq!(result.font_size, 10.0);
        // The word is wider than the box; it is still returned whole.
        assert_eq!(result.lines, vec!["overflowing".to_string()]);
    }

    #[test]
    fn test_fit_idempotent() {
        let mut r = req("idempotence check with several words in it");
        r.box_height = Some(200.0);
        let a = fit(&r, &fake());
        let b = fit(&r, &fake());
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_height_constraint_shrinks_further() {
        let text = "many words that will wrap into a number of lines for sure";
        let mut unconstrained = req(text);
        unconstrained.initial_size = 60.0;
        let mut constrained = unconstrained.clone();
        constrained.box_height = Some(100.0);

        let a = fit(&unconstrained, &fake());
        let b = fit(&constrained, &fake());
        assert!(b.font_size <= a.font_size);
        // Block height honored (or the search hit the floor).
        let block = b.lines.len() as f32 * b.line_height;
        assert!(block <= 100.0 - 2.0 * constrained.padding || b.font_size <= constrained.min_size);
    }

    #[test]
    fn test_fit_large_step_still_terminates_and_clamps() {
        let mut r = req("step variant");
        r.initial_size = 300.0;
        r.min_size = 10.0;
        r.step = 25.0;
        let result = fit(&r, &fake());
        assert!(result.font_size >= 10.0 && result.font_size <= 300.0);
    }

    #[test]
    fn test_fit_char_mode_preserves_characters() {
        let mut r = req("CHAR MODE SPLIT");
        r.wrap_mode = WrapMode::Char;
        r.box_width = 80.0;
        r.padding = 10.0;
        r.initial_size = 20.0;
        r.min_size = 20.0;
        let result = fit(&r, &fake());
        let concat: String = result.lines.concat();
        assert_eq!(concat, "CHAR MODE SPLIT");
    }

    #[test]
    fn test_fit_line_height_is_size_times_factor() {
        let mut r = req("hello");
        r.line_height_factor = 1.5;
        let result = fit(&r, &fake());
        assert!((result.line_height - result.font_size * 1.5).abs() < 1e-4);
    }
}
