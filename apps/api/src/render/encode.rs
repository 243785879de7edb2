//! In-process output encoding: PNG, JPEG, and animated GIF via the image crate.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{Delay, DynamicImage, Frame, ImageFormat, RgbaImage};

use crate::errors::AppError;

/// Raster output formats the still endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// Parses the `format` query value. Absent means PNG; `jpg` and `jpeg`
    /// are interchangeable.
    pub fn parse(s: Option<&str>) -> Result<Self, String> {
        match s {
            None | Some("png") => Ok(OutputFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg),
            Some("webp") => Ok(OutputFormat::Webp),
            Some(other) => Err(format!(
                "'{other}' is not a valid format (expected png, jpg, jpeg, or webp)"
            )),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

pub fn encode_png(img: &RgbaImage) -> Result<Bytes, AppError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(Bytes::from(buf.into_inner()))
}

/// JPEG has no alpha channel; the opaque canvas is flattened to RGB first.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Bytes, AppError> {
    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)?;
    Ok(Bytes::from(buf))
}

/// Encodes a frame sequence as an infinitely looping GIF with a uniform
/// per-frame delay.
pub fn encode_gif(frames: Vec<RgbaImage>, delay_ms: u32) -> Result<Bytes, AppError> {
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buf);
        encoder.set_repeat(Repeat::Infinite)?;
        for img in frames {
            let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
            encoder.encode_frame(frame)?;
        }
    }
    Ok(Bytes::from(buf))
}
