// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/image/vector.rs
//
// Vector images (SVG, SVGZ).

use resvg::tiny_skia::{self, Pixmap};
use resvg::usvg::{Options, Tree};

use super::ImageCrop;
use crate::constant::MIN_PIXMAP_SIZE;

/// A parsed SVG document, rasterized at whatever size a cell needs.
pub struct VectorImage {
    document: Tree,
    native_width: u32,
    native_height: u32,
}

impl VectorImage {
    /// Parse SVG or gzip-compressed SVGZ data.
    pub fn parse(bytes: &[u8]) -> anyhow::Result<Self> {
        let options = Options::default();
        let document = Tree::from_data(bytes, &options)?;

        let size = document.size();
        let native_width = (size.width().ceil() as u32).max(MIN_PIXMAP_SIZE);
        let native_height = (size.height().ceil() as u32).max(MIN_PIXMAP_SIZE);

        Ok(Self {
            document,
            native_width,
            native_height,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.native_width, self.native_height)
    }

    /// Render the `crop` part of the document stretched to `width` x `height`.
    pub fn rasterize(&self, crop: ImageCrop, width: u32, height: u32) -> anyhow::Result<Pixmap> {
        let width = width.max(MIN_PIXMAP_SIZE);
        let height = height.max(MIN_PIXMAP_SIZE);
        let mut pixmap =
            Pixmap::new(width, height).ok_or_else(|| anyhow::anyhow!("Failed to create pixmap"))?;

        let size = self.document.size();
        let (crop_width, crop_height) = (
            crop.width.max(f32::EPSILON) * size.width(),
            crop.height.max(f32::EPSILON) * size.height(),
        );
        let sx = width as f32 / crop_width;
        let sy = height as f32 / crop_height;
        let ts = tiny_skia::Transform::from_row(
            sx,
            0.0,
            0.0,
            sy,
            -crop.x * size.width() * sx,
            -crop.y * size.height() * sy,
        );
        resvg::render(&self.document, ts, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Cheap sniff for SVG markup at the start of a buffer.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect width="20" height="10" fill="#00ff00"/>
    </svg>"##;

    #[test]
    fn parse_reads_native_size() {
        let svg = VectorImage::parse(SQUARE).unwrap();
        assert_eq!(svg.dimensions(), (20, 10));
    }

    #[test]
    fn rasterize_fills_target() {
        let svg = VectorImage::parse(SQUARE).unwrap();
        let pixmap = svg.rasterize(ImageCrop::FULL, 40, 20).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 20));
        let px = pixmap.pixel(20, 10).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 255, 0));
    }

    #[test]
    fn rasterize_crop_shows_only_that_part() {
        let halves = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
            <rect width="10" height="10" fill="#ff0000"/>
            <rect x="10" width="10" height="10" fill="#0000ff"/>
        </svg>"##;
        let svg = VectorImage::parse(halves).unwrap();
        let crop = ImageCrop { x: 0.5, y: 0.0, width: 0.5, height: 1.0 };
        let pixmap = svg.rasterize(crop, 10, 10).unwrap();
        for x in [1, 5, 8] {
            let px = pixmap.pixel(x, 5).unwrap();
            assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 255));
        }
    }

    #[test]
    fn sniff_requires_svg_root() {
        assert!(looks_like_svg(b"  <svg width='1'/>"));
        assert!(looks_like_svg(b"<?xml version='1.0'?><svg/>"));
        assert!(!looks_like_svg(b"<?xml version='1.0'?><html/>"));
        assert!(!looks_like_svg(b"\x89PNG"));
    }
}
