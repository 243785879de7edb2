use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::layout::WrapMode;
use crate::render::color::parse_hex;
use crate::render::encode::{encode_jpeg, encode_png};
use crate::render::webp::encode_webp;
use crate::render::{render_picture, OutputFormat, PictureOptions};
use crate::state::AppState;

/// Canvas dimensions accepted from the query string.
const MIN_DIM: u32 = 16;
const MAX_DIM: u32 = 2048;

#[derive(Debug, Deserialize)]
pub struct PictureQuery {
    pub text: Option<String>,
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub font: Option<String>,
    pub size: Option<f32>,
    pub wrap: Option<String>,
}

/// GET /text-to-picture
///
/// Rasterizes auto-fit text onto a canvas and returns PNG (default), JPEG, or
/// WebP. Missing `text` is a 400 before any layout or font work happens.
pub async fn text_to_picture_handler(
    State(state): State<AppState>,
    Query(q): Query<PictureQuery>,
) -> Result<Response, AppError> {
    let text = require_text(q.text.as_deref())?;
    let format = OutputFormat::parse(q.format.as_deref()).map_err(AppError::Validation)?;
    let opts = build_picture_options(
        q.width,
        q.height,
        q.bg.as_deref(),
        q.fg.as_deref(),
        q.font,
        q.size,
        q.wrap.as_deref(),
    )?;

    // Layout + rasterization are CPU-bound; keep them off the async executor.
    let fonts = state.fonts.clone();
    let img = tokio::task::spawn_blocking(move || render_picture(&text, &opts, &fonts))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    let body = match format {
        OutputFormat::Png => encode_png(&img)?,
        OutputFormat::Jpeg => encode_jpeg(&img, state.config.jpeg_quality)?,
        OutputFormat::Webp => {
            encode_webp(&img, &state.config.cwebp_path, state.config.webp_quality).await?
        }
    };

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Rejects absent or blank text with the client error the original endpoint
/// returned. The layout engine is never invoked for these.
pub(crate) fn require_text(text: Option<&str>) -> Result<String, AppError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(AppError::Validation("Text is required".to_string())),
    }
}

/// Builds `PictureOptions` from the shared canvas query parameters, validating
/// ranges and color syntax. Used by both the still and animated endpoints.
pub(crate) fn build_picture_options(
    width: Option<u32>,
    height: Option<u32>,
    bg: Option<&str>,
    fg: Option<&str>,
    font: Option<String>,
    size: Option<f32>,
    wrap: Option<&str>,
) -> Result<PictureOptions, AppError> {
    let mut opts = PictureOptions::default();

    if let Some(w) = width {
        opts.width = check_dim("width", w)?;
    }
    if let Some(h) = height {
        opts.height = check_dim("height", h)?;
    }
    if let Some(bg) = bg {
        opts.background = parse_hex(bg).map_err(AppError::Validation)?;
    }
    if let Some(fg) = fg {
        opts.foreground = parse_hex(fg).map_err(AppError::Validation)?;
    }
    if let Some(size) = size {
        if !(4.0..=512.0).contains(&size) {
            return Err(AppError::Validation(format!(
                "size must be between 4 and 512, got {size}"
            )));
        }
        opts.initial_size = size;
    }
    match wrap {
        None | Some("word") => {}
        Some("char") => opts.wrap_mode = WrapMode::Char,
        Some(other) => {
            return Err(AppError::Validation(format!(
                "'{other}' is not a valid wrap mode (expected word or char)"
            )))
        }
    }
    opts.font_family = font;
    Ok(opts)
}

fn check_dim(name: &str, value: u32) -> Result<u32, AppError> {
    if (MIN_DIM..=MAX_DIM).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::Validation(format!(
            "{name} must be between {MIN_DIM} and {MAX_DIM}, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_missing_and_blank() {
        assert!(require_text(None).is_err());
        assert!(require_text(Some("")).is_err());
        assert!(require_text(Some("   ")).is_err());
        assert_eq!(require_text(Some("hi")).unwrap(), "hi");
    }

    #[test]
    fn test_build_options_defaults_when_unset() {
        let opts = build_picture_options(None, None, None, None, None, None, None).unwrap();
        assert_eq!((opts.width, opts.height), (800, 200));
        assert_eq!(opts.wrap_mode, WrapMode::Word);
    }

    #[test]
    fn test_build_options_rejects_out_of_range_dimensions() {
        assert!(build_picture_options(Some(4), None, None, None, None, None, None).is_err());
        assert!(build_picture_options(None, Some(10_000), None, None, None, None, None).is_err());
    }

    #[test]
    fn test_build_options_rejects_bad_color_and_wrap() {
        assert!(
            build_picture_options(None, None, Some("chartreuse"), None, None, None, None).is_err()
        );
        assert!(build_picture_options(None, None, None, None, None, None, Some("zigzag")).is_err());
    }

    #[test]
    fn test_build_options_accepts_char_wrap_and_size() {
        let opts = build_picture_options(
            Some(400),
            Some(400),
            Some("#000"),
            Some("#fff"),
            Some("Inter".to_string()),
            Some(72.0),
            Some("char"),
        )
        .unwrap();
        assert_eq!(opts.wrap_mode, WrapMode::Char);
        assert_eq!(opts.initial_size, 72.0);
        assert_eq!(opts.font_family.as_deref(), Some("Inter"));
    }
}
