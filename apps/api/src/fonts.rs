//! Font registration and glyph-metric measurement.
//!
//! Fonts are registered once at startup: every `.ttf`/`.otf` file in the
//! configured directory is parsed and stored under its file-stem family name.
//! The resulting `FontStore` is immutable and shared read-only across requests
//! via `Arc` — no process-global registration, no mutation after startup.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusttype::{point, Font, Scale};
use tracing::info;

use crate::errors::AppError;
use crate::layout::TextMeasure;

/// A parsed font registered under a logical family name.
pub struct LoadedFont {
    pub family: String,
    font: Font<'static>,
}

impl LoadedFont {
    pub fn from_bytes(family: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let family = family.into();
        let font = Font::try_from_vec(data)
            .with_context(|| format!("font '{family}' is not a valid TTF/OTF"))?;
        Ok(LoadedFont { family, font })
    }

    /// The underlying rusttype font, for glyph rasterization.
    pub fn raw(&self) -> &Font<'static> {
        &self.font
    }

    /// Baseline-to-top distance at the given pixel size.
    pub fn ascent(&self, font_size: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(font_size)).ascent
    }
}

impl TextMeasure for LoadedFont {
    /// Sum of scaled horizontal glyph advances, with kerning applied by the
    /// layout iterator. Deterministic for a given font file.
    fn width(&self, text: &str, font_size: f32) -> f32 {
        let scale = Scale::uniform(font_size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .map(|g| g.unpositioned().h_metrics().advance_width)
            .sum()
    }
}

/// Immutable family-name → font registry built at startup.
pub struct FontStore {
    fonts: HashMap<String, LoadedFont>,
    default_family: Option<String>,
}

impl FontStore {
    /// A store with no fonts. Every `resolve` fails; used in router tests.
    pub fn empty() -> Self {
        FontStore {
            fonts: HashMap::new(),
            default_family: None,
        }
    }

    /// Registers every `.ttf`/`.otf` file in `dir` under its file-stem name.
    ///
    /// Fails when the directory is unreadable, a font file fails to parse, or
    /// no fonts are found at all — a text-rendering service without fonts
    /// cannot serve anything useful.
    pub fn load_dir(dir: &Path, default_family: Option<&str>) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("cannot read font directory '{}'", dir.display()))?;

        let mut fonts = HashMap::new();
        for entry in entries {
            let path = entry?.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
                .unwrap_or(false);
            if !is_font {
                continue;
            }
            let family = path
                .file_stem()
                .and_then(|s| s.to_str())
                .with_context(|| format!("font file '{}' has no usable name", path.display()))?
                .to_string();
            let data = std::fs::read(&path)
                .with_context(|| format!("cannot read font file '{}'", path.display()))?;
            let loaded = LoadedFont::from_bytes(family.clone(), data)?;
            info!("Registered font family '{family}' from {}", path.display());
            fonts.insert(family, loaded);
        }

        if fonts.is_empty() {
            anyhow::bail!(
                "no .ttf/.otf files found in '{}' — at least one font is required",
                dir.display()
            );
        }

        let default_family = match default_family {
            Some(name) => {
                anyhow::ensure!(
                    fonts.contains_key(name),
                    "DEFAULT_FONT '{name}' is not among the registered families"
                );
                Some(name.to_string())
            }
            // Alphabetically first family keeps the choice deterministic.
            None => fonts.keys().min().cloned(),
        };

        Ok(FontStore {
            fonts,
            default_family,
        })
    }

    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fonts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Looks up a family by name, or the default family when `None`.
    ///
    /// An unknown family (or an empty store) is a server-side fault: requests
    /// can only name fonts that were registered at startup.
    pub fn resolve(&self, family: Option<&str>) -> Result<&LoadedFont, AppError> {
        let name = match family {
            Some(name) => name,
            None => self
                .default_family
                .as_deref()
                .ok_or_else(|| AppError::Font("no fonts registered".to_string()))?,
        };
        self.fonts
            .get(name)
            .ok_or_else(|| AppError::Font(format!("font family '{name}' is not registered")))
    }
}
