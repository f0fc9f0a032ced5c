// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/image/mod.rs
//
// Uploaded image resources and their decoded form.

pub mod raster;
pub mod vector;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use resvg::tiny_skia::Pixmap;

use self::raster::RasterImage;
use self::vector::VectorImage;

/// Broad classification of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Raster,
    Vector,
}

impl ImageKind {
    /// Detect the kind from the file name and leading bytes.
    ///
    /// SVG is recognized by extension or by an XML/`<svg` prologue; anything
    /// else must be a format the `image` crate can identify.
    pub fn detect(name: &str, bytes: &[u8]) -> anyhow::Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if matches!(ext.as_deref(), Some("svg" | "svgz")) || vector::looks_like_svg(bytes) {
            return Ok(Self::Vector);
        }
        image::guess_format(bytes)
            .map(|_| Self::Raster)
            .with_context(|| format!("Unsupported image format: {name}"))
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => write!(f, "raster"),
            Self::Vector => write!(f, "vector"),
        }
    }
}

// ============================================================================
// Image Source
// ============================================================================

/// An uploaded, not yet decoded image.
///
/// The bytes are shared, so cloning into an export plan is cheap. The
/// resource is released when the last owner drops it.
#[derive(Clone)]
pub struct ImageSource {
    name: Arc<str>,
    kind: ImageKind,
    bytes: Arc<[u8]>,
}

impl ImageSource {
    /// Read an image file from disk.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, bytes)
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> anyhow::Result<Self> {
        let name: String = name.into();
        let kind = ImageKind::detect(&name, &bytes)?;
        Ok(Self {
            name: name.into(),
            kind,
            bytes: bytes.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Decode the image. CPU-bound; run on a blocking thread from async code.
    pub fn decode(&self) -> anyhow::Result<DecodedImage> {
        let decoded = match self.kind {
            ImageKind::Raster => DecodedImage::Raster(RasterImage::decode(&self.bytes)?),
            ImageKind::Vector => DecodedImage::Vector(VectorImage::parse(&self.bytes)?),
        };
        Ok(decoded)
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSource")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

// ============================================================================
// Decoded Image
// ============================================================================

/// Sub-rectangle of an image in fractions of its width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCrop {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageCrop {
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };
}

/// A decoded image ready to be rasterized at a target size.
pub enum DecodedImage {
    Raster(RasterImage),
    Vector(VectorImage),
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster(_) => f.write_str("DecodedImage::Raster(..)"),
            Self::Vector(_) => f.write_str("DecodedImage::Vector(..)"),
        }
    }
}

impl DecodedImage {
    /// Natural size (width, height) in pixels, orientation applied.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Raster(img) => img.dimensions(),
            Self::Vector(img) => img.dimensions(),
        }
    }

    /// Render the `crop` part of the image scaled to exactly `width` x `height`.
    pub fn rasterize(&self, crop: ImageCrop, width: u32, height: u32) -> anyhow::Result<Pixmap> {
        match self {
            Self::Raster(img) => img.rasterize(crop, width, height),
            Self::Vector(img) => img.rasterize(crop, width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_svg_by_content_and_extension() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"></svg>"#;
        assert_eq!(ImageKind::detect("logo", svg).unwrap(), ImageKind::Vector);
        assert_eq!(ImageKind::detect("logo.SVG", b"").unwrap(), ImageKind::Vector);
    }

    #[test]
    fn detects_png_and_rejects_garbage() {
        let png = raster::tests::solid_png(2, 2, [0, 0, 255, 255]);
        assert_eq!(ImageKind::detect("a.bin", &png).unwrap(), ImageKind::Raster);
        assert!(ImageKind::detect("notes.txt", b"hello").is_err());
    }

    #[test]
    fn clone_shares_bytes() {
        let png = raster::tests::solid_png(2, 2, [0, 0, 255, 255]);
        let source = ImageSource::from_bytes("a.png", png).unwrap();
        let copy = source.clone();
        assert!(Arc::ptr_eq(&source.bytes, &copy.bytes));
        assert_eq!(copy.name(), "a.png");
    }
}
