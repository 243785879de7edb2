//! WebP output through the external `cwebp` binary.
//!
//! The frame is handed to cwebp as a temp PNG and the encoded file is read
//! back; the temp directory is dropped (and deleted) either way. We shell out
//! rather than link a native WebP library to keep the build free of C
//! toolchain requirements — same trade-off as piping frames to ffmpeg.

use std::path::Path;

use bytes::Bytes;
use image::RgbaImage;
use tokio::process::Command;
use tracing::debug;

use crate::errors::AppError;
use crate::render::encode::encode_png;

/// Returns true when the configured cwebp binary responds to `-version`.
pub async fn is_cwebp_available(cwebp_path: &str) -> bool {
    Command::new(cwebp_path)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Encodes one frame as WebP by invoking `cwebp <tmp>.png -o <tmp>.webp`.
pub async fn encode_webp(
    img: &RgbaImage,
    cwebp_path: &str,
    quality: u8,
) -> Result<Bytes, AppError> {
    let dir = tempfile::tempdir()
        .map_err(|e| AppError::ExternalEncoder(format!("cannot create temp dir: {e}")))?;
    let src = dir.path().join("frame.png");
    let dst = dir.path().join("frame.webp");

    let png = encode_png(img)?;
    tokio::fs::write(&src, &png)
        .await
        .map_err(|e| AppError::ExternalEncoder(format!("cannot write temp frame: {e}")))?;

    run_cwebp(cwebp_path, quality, &src, &dst).await?;

    let bytes = tokio::fs::read(&dst)
        .await
        .map_err(|e| AppError::ExternalEncoder(format!("cwebp produced no output: {e}")))?;
    debug!("cwebp encoded {} bytes", bytes.len());
    Ok(Bytes::from(bytes))
}

async fn run_cwebp(cwebp_path: &str, quality: u8, src: &Path, dst: &Path) -> Result<(), AppError> {
    let output = Command::new(cwebp_path)
        .arg("-quiet")
        .args(["-q", &quality.clamp(0, 100).to_string()])
        .arg(src)
        .arg("-o")
        .arg(dst)
        .output()
        .await
        .map_err(|e| {
            AppError::ExternalEncoder(format!(
                "failed to spawn '{cwebp_path}' (is it installed and on PATH?): {e}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::ExternalEncoder(format!(
            "'{cwebp_path}' exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[tokio::test]
    async fn test_missing_binary_reports_spawn_failure() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let result = encode_webp(&img, "/nonexistent/cwebp-binary", 80).await;
        match result {
            Err(AppError::ExternalEncoder(msg)) => {
                assert!(msg.contains("failed to spawn"), "unexpected message: {msg}")
            }
            other => panic!("expected ExternalEncoder error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_not_available() {
        assert!(!is_cwebp_available("/nonexistent/cwebp-binary").await);
    }
}
