use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::render::anim::{render_frames, AnimOptions, Effect};
use crate::render::encode::encode_gif;
use crate::routes::picture::{build_picture_options, require_text};
use crate::state::AppState;

const MAX_FRAMES: u16 = 120;
const MIN_DELAY_MS: u32 = 20;
const MAX_DELAY_MS: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct GifQuery {
    pub text: Option<String>,
    pub effect: Option<String>,
    pub frames: Option<u16>,
    pub delay: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub font: Option<String>,
    pub size: Option<f32>,
    pub wrap: Option<String>,
}

/// GET /text-to-gif
///
/// Renders a short frame sequence over one fitted layout and returns a looping
/// animated GIF. Defaults: bounce effect, 24 frames, 50ms per frame.
pub async fn text_to_gif_handler(
    State(state): State<AppState>,
    Query(q): Query<GifQuery>,
) -> Result<Response, AppError> {
    let text = require_text(q.text.as_deref())?;

    let picture = build_picture_options(
        q.width,
        q.height,
        q.bg.as_deref(),
        q.fg.as_deref(),
        q.font,
        q.size,
        q.wrap.as_deref(),
    )?;
    let mut opts = AnimOptions {
        picture,
        ..AnimOptions::default()
    };
    if let Some(effect) = q.effect.as_deref() {
        opts.effect = Effect::parse(effect).map_err(AppError::Validation)?;
    }
    if let Some(frames) = q.frames {
        if !(2..=MAX_FRAMES).contains(&frames) {
            return Err(AppError::Validation(format!(
                "frames must be between 2 and {MAX_FRAMES}, got {frames}"
            )));
        }
        opts.frame_count = frames;
    }
    if let Some(delay) = q.delay {
        if !(MIN_DELAY_MS..=MAX_DELAY_MS).contains(&delay) {
            return Err(AppError::Validation(format!(
                "delay must be between {MIN_DELAY_MS} and {MAX_DELAY_MS} ms, got {delay}"
            )));
        }
        opts.delay_ms = delay;
    }

    // Rendering every frame plus GIF quantization is the heaviest path in the
    // service; the whole pipeline runs off the async executor.
    let fonts = state.fonts.clone();
    let body = tokio::task::spawn_blocking(move || {
        let frames = render_frames(&text, &opts, &fonts)?;
        encode_gif(frames, opts.delay_ms)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    Ok(([(header::CONTENT_TYPE, "image/gif")], body).into_response())
}
