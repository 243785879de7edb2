mod config;
mod errors;
mod fonts;
mod layout;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fonts::FontStore;
use crate::render::webp::is_cwebp_available;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (every variable has a default)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting text-to-picture API v{}", env!("CARGO_PKG_VERSION"));

    // Register fonts once; the store is immutable for the life of the process.
    let fonts = FontStore::load_dir(&config.font_dir, config.default_font.as_deref())?;
    info!("Font store initialized: {:?}", fonts.families());

    // WebP output needs the external encoder; the service runs without it.
    if !is_cwebp_available(&config.cwebp_path).await {
        warn!(
            "'{}' not found — format=webp requests will fail",
            config.cwebp_path
        );
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        fonts: Arc::new(fonts),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
