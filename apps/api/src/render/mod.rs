// Rasterization and output encoding.
// canvas: CPU drawing surface over image::RgbaImage (fill + glyph blitting).
// picture/anim: the consolidated still/animated endpoint pipelines.
// encode/webp: in-process PNG/JPEG/GIF encoders and the external cwebp path.

pub mod anim;
pub mod canvas;
pub mod color;
pub mod encode;
pub mod picture;
pub mod webp;

pub use encode::OutputFormat;
pub use picture::{render_picture, PictureOptions};
