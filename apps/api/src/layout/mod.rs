// Auto-fit text layout engine.
// Implements: greedy word/char wrapping, bounded font-size fitting search.
// Pure and synchronous — callers run it inside tokio::task::spawn_blocking.

pub mod engine;
pub mod measure;

// Re-export the public API consumed by other modules (render, routes).
pub use engine::{fit, wrap_chars, wrap_to_width, LayoutRequest, LayoutResult, MeasuredLine, WrapMode};
pub use measure::TextMeasure;
