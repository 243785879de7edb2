use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default — the service starts with no `.env` at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory scanned at startup for `.ttf`/`.otf` files to register.
    pub font_dir: PathBuf,
    /// Family name used when a request does not name a font.
    /// Defaults to the alphabetically first registered family.
    pub default_font: Option<String>,
    /// Path to the `cwebp` binary used for WebP output.
    pub cwebp_path: String,
    /// cwebp quality factor (0–100).
    pub webp_quality: u8,
    /// JPEG quality factor (1–100).
    pub jpeg_quality: u8,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            font_dir: std::env::var("FONT_DIR")
                .unwrap_or_else(|_| "fonts".to_string())
                .into(),
            default_font: std::env::var("DEFAULT_FONT").ok().filter(|s| !s.is_empty()),
            cwebp_path: std::env::var("CWEBP_PATH").unwrap_or_else(|_| "cwebp".to_string()),
            webp_quality: std::env::var("WEBP_QUALITY")
                .unwrap_or_else(|_| "80".to_string())
                .parse::<u8>()
                .context("WEBP_QUALITY must be 0-100")?,
            jpeg_quality: std::env::var("JPEG_QUALITY")
                .unwrap_or_else(|_| "90".to_string())
                .parse::<u8>()
                .context("JPEG_QUALITY must be 1-100")?,
        })
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            rust_log: "info".to_string(),
            font_dir: "fonts".into(),
            default_font: None,
            cwebp_path: "cwebp".to_string(),
            webp_quality: 80,
            jpeg_quality: 90,
        }
    }
}
