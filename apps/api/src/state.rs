use std::sync::Arc;

use crate::config::Config;
use crate::fonts::FontStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable font registry built once at startup; read-only across requests.
    pub fonts: Arc<FontStore>,
}
