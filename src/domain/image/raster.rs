// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/image/raster.rs
//
// Raster images (PNG, JPEG, WebP, ...) and pixel format conversion.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use resvg::tiny_skia::{IntSize, Pixmap};

use super::ImageCrop;

/// A decoded raster image with its EXIF orientation already applied.
pub struct RasterImage {
    document: DynamicImage,
}

impl RasterImage {
    /// Decode from encoded bytes.
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let document = image::load_from_memory(bytes)?;
        let document = apply_orientation(document, read_orientation(bytes));
        Ok(Self { document })
    }

    /// Returns the pixel dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.document.dimensions()
    }

    /// Cut out `crop` and resample it to exactly `width` x `height`.
    ///
    /// The crop is snapped outward to whole source pixels and always keeps at
    /// least one pixel.
    pub fn rasterize(&self, crop: ImageCrop, width: u32, height: u32) -> anyhow::Result<Pixmap> {
        let (src_width, src_height) = self.document.dimensions();
        if src_width == 0 || src_height == 0 {
            anyhow::bail!("Image has no pixels");
        }
        let (x, w) = pixel_span(crop.x, crop.width, src_width);
        let (y, h) = pixel_span(crop.y, crop.height, src_height);

        let visible = self.document.crop_imm(x, y, w, h).to_rgba8();
        let resized = imageops::resize(&visible, width, height, FilterType::CatmullRom);
        rgba_to_pixmap(&resized)
    }
}

/// Map a fractional `[start, start + len]` span onto `0..size` pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(start: f32, len: f32, size: u32) -> (u32, u32) {
    let first = ((start * size as f32).floor().max(0.0) as u32).min(size - 1);
    let end = (((start + len) * size as f32).ceil().max(0.0) as u32).clamp(first + 1, size);
    (first, end - first)
}

/// Read the EXIF orientation tag (1 when absent or unreadable).
fn read_orientation(bytes: &[u8]) -> u32 {
    exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|data| {
            data.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .unwrap_or(1)
}

/// Rotate/flip so the image displays upright.
fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => DynamicImage::ImageRgba8(imageops::flip_horizontal(&img)),
        3 => DynamicImage::ImageRgba8(imageops::rotate180(&img)),
        4 => DynamicImage::ImageRgba8(imageops::flip_vertical(&img)),
        5 => DynamicImage::ImageRgba8(imageops::flip_horizontal(&imageops::rotate90(&img))),
        6 => DynamicImage::ImageRgba8(imageops::rotate90(&img)),
        7 => DynamicImage::ImageRgba8(imageops::flip_horizontal(&imageops::rotate270(&img))),
        8 => DynamicImage::ImageRgba8(imageops::rotate270(&img)),
        _ => img,
    }
}

/// Convert straight-alpha RGBA into a premultiplied tiny_skia Pixmap.
pub fn rgba_to_pixmap(image: &RgbaImage) -> anyhow::Result<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())
        .ok_or_else(|| anyhow::anyhow!("Invalid pixmap size {}x{}", image.width(), image.height()))?;

    let mut data = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let premultiply = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        data.extend_from_slice(&[premultiply(r), premultiply(g), premultiply(b), a]);
    }

    Pixmap::from_vec(data, size).ok_or_else(|| anyhow::anyhow!("Failed to create pixmap"))
}

/// Convert a tiny_skia Pixmap to a straight-alpha RGBA image.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> anyhow::Result<RgbaImage> {
    let width = pixmap.width();
    let height = pixmap.height();

    // tiny_skia uses premultiplied alpha, we need to unpremultiply for image crate
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        pixels.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow::anyhow!("Failed to create RgbaImage from pixmap data"))
}
