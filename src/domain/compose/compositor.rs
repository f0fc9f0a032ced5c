// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/compose/compositor.rs
//
// Draw decoded images into rounded cells and encode the result.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use resvg::tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, Path, PathBuilder, Pattern, Pixmap, Rect, SpreadMode,
    Transform,
};

use super::layout::{PixelRect, cover_fit, visible_crop};
use crate::constant::{BACKGROUND_RGBA, CELL_FILL_RGBA, CORNER_RADIUS};
use crate::domain::image::DecodedImage;
use crate::domain::image::raster::pixmap_to_rgba;

/// Allocate a square canvas filled with the background colour.
///
/// Returns `None` if a surface of that size cannot exist (zero or too large).
#[must_use]
pub fn allocate_canvas(size: u32) -> Option<Pixmap> {
    let mut canvas = Pixmap::new(size, size)?;
    let [r, g, b, a] = BACKGROUND_RGBA;
    canvas.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));
    Some(canvas)
}

/// Rounded rectangle with quadratic corners. The radius is clamped to half
/// the shorter side.
#[must_use]
pub fn rounded_rect_path(rect: PixelRect, radius: f32) -> Option<Path> {
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (w, h) = (rect.width as f32, rect.height as f32);
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Draw one image into `rect`: white rounded cell, then the cover-fitted
/// image clipped to the same shape.
pub fn draw_layer(canvas: &mut Pixmap, rect: PixelRect, image: &DecodedImage) -> anyhow::Result<()> {
    let path = rounded_rect_path(rect, CORNER_RADIUS)
        .ok_or_else(|| anyhow::anyhow!("Degenerate cell {rect:?}"))?;

    let mut fill = Paint::default();
    let [r, g, b, a] = CELL_FILL_RGBA;
    fill.set_color_rgba8(r, g, b, a);
    fill.anti_alias = true;
    canvas.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);

    let mut clip = Mask::new(canvas.width(), canvas.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to create clip mask"))?;
    clip.fill_path(&path, FillRule::Winding, true, Transform::identity());

    let (image_width, image_height) = image.dimensions();
    if image_width == 0 || image_height == 0 {
        return Err(anyhow::anyhow!("Image has no pixels"));
    }
    // Only the visible part is rasterized, so the tile never exceeds the box.
    let crop = visible_crop(cover_fit(image_width, image_height, rect), rect);
    let tile = image.rasterize(crop, rect.width, rect.height)?;

    let shader = Pattern::new(
        tile.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Nearest,
        1.0,
        Transform::from_translate(rect.x as f32, rect.y as f32),
    );
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    };
    let area = Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
    .ok_or_else(|| anyhow::anyhow!("Degenerate cell {rect:?}"))?;
    canvas.fill_rect(area, &paint, Transform::identity(), Some(&clip));

    Ok(())
}

/// Encode the canvas as PNG.
pub fn encode_png(canvas: &Pixmap) -> anyhow::Result<Vec<u8>> {
    let rgba = pixmap_to_rgba(canvas)?;
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::ImageSource;
    use crate::domain::image::raster::tests::solid_png;

    fn decoded(width: u32, height: u32, rgba: [u8; 4]) -> DecodedImage {
        ImageSource::from_bytes("t.png", solid_png(width, height, rgba))
            .unwrap()
            .decode()
            .unwrap()
    }

    fn rgb_at(canvas: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let px = canvas.pixel(x, y).unwrap().demultiply();
        (px.red(), px.green(), px.blue())
    }

    #[test]
    fn zero_sized_canvas_is_unavailable() {
        assert!(allocate_canvas(0).is_none());
        let canvas = allocate_canvas(8).unwrap();
        assert_eq!(rgb_at(&canvas, 4, 4), (0xf3, 0xf4, 0xf6));
    }

    #[test]
    fn layer_fills_center_and_leaves_corners() {
        let mut canvas = allocate_canvas(204).unwrap();
        let rect = PixelRect { x: 0, y: 0, width: 204, height: 204 };
        draw_layer(&mut canvas, rect, &decoded(30, 10, [255, 0, 0, 255])).unwrap();

        assert_eq!(rgb_at(&canvas, 102, 102), (255, 0, 0));
        assert_eq!(rgb_at(&canvas, 0, 102), (255, 0, 0));
        // Rounded corner keeps the background.
        assert_eq!(rgb_at(&canvas, 0, 0), (0xf3, 0xf4, 0xf6));
        assert_eq!(rgb_at(&canvas, 203, 203), (0xf3, 0xf4, 0xf6));
    }

    #[test]
    fn layer_stays_inside_its_box() {
        let mut canvas = allocate_canvas(204).unwrap();
        let rect = PixelRect { x: 104, y: 0, width: 100, height: 100 };
        draw_layer(&mut canvas, rect, &decoded(400, 100, [0, 0, 255, 255])).unwrap();

        assert_eq!(rgb_at(&canvas, 150, 50), (0, 0, 255));
        assert_eq!(rgb_at(&canvas, 50, 50), (0xf3, 0xf4, 0xf6));
        assert_eq!(rgb_at(&canvas, 150, 150), (0xf3, 0xf4, 0xf6));
    }

    #[test]
    fn thin_image_fills_large_box() {
        let mut canvas = allocate_canvas(1024).unwrap();
        let rect = PixelRect { x: 0, y: 0, width: 1024, height: 1024 };
        draw_layer(&mut canvas, rect, &decoded(1, 2000, [0, 200, 0, 255])).unwrap();

        assert_eq!(rgb_at(&canvas, 512, 512), (0, 200, 0));
        assert_eq!(rgb_at(&canvas, 512, 1), (0, 200, 0));
        assert_eq!(rgb_at(&canvas, 0, 0), (0xf3, 0xf4, 0xf6));
    }

    #[test]
    fn wide_image_shows_its_center() {
        // Three vertical bands; only the middle one is visible in a square box.
        let mut src = image::RgbaImage::from_pixel(30, 10, image::Rgba([255, 0, 0, 255]));
        for x in 10..20 {
            for y in 0..10 {
                src.put_pixel(x, y, image::Rgba([0, 0, 255, 255]));
            }
        }
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(src).write_to(&mut png, ImageFormat::Png).unwrap();
        let image = ImageSource::from_bytes("bands.png", png.into_inner())
            .unwrap()
            .decode()
            .unwrap();

        let mut canvas = allocate_canvas(100).unwrap();
        let rect = PixelRect { x: 0, y: 0, width: 100, height: 100 };
        draw_layer(&mut canvas, rect, &image).unwrap();
        assert_eq!(rgb_at(&canvas, 50, 50), (0, 0, 255));
        assert_eq!(rgb_at(&canvas, 30, 50), (0, 0, 255));
        assert_eq!(rgb_at(&canvas, 70, 50), (0, 0, 255));
    }

    #[test]
    fn transparent_image_shows_white_cell() {
        let mut canvas = allocate_canvas(100).unwrap();
        let rect = PixelRect { x: 0, y: 0, width: 100, height: 100 };
        draw_layer(&mut canvas, rect, &decoded(5, 5, [0, 0, 0, 0])).unwrap();
        assert_eq!(rgb_at(&canvas, 50, 50), (255, 255, 255));
    }

    #[test]
    fn encoded_png_decodes_to_canvas_size() {
        let canvas = allocate_canvas(40).unwrap();
        let png = encode_png(&canvas).unwrap();
        let back = image::load_from_memory(&png).unwrap();
        assert_eq!((back.width(), back.height()), (40, 40));
    }
}
