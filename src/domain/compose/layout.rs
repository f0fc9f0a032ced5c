// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/compose/layout.rs
//
// Pixel-space layout of the grid and cover-fit placement.

use crate::constant::GRID_GAP;
use crate::domain::grid::{CellBounds, GridSize};
use crate::domain::image::ImageCrop;

/// Integer pixel rectangle on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Floating-point placement of a scaled image (may extend past its box).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Side length of the square canvas: `n * cell + gap * (n - 1)`.
#[must_use]
pub fn canvas_size(grid: GridSize, cell_size: u32) -> u32 {
    let n = grid.get();
    n * cell_size + GRID_GAP * (n - 1)
}

/// Pixel box covered by a block of cells, gaps between them included.
#[must_use]
pub fn cell_box(bounds: CellBounds, cell_size: u32) -> PixelRect {
    let pitch = cell_size + GRID_GAP;
    PixelRect {
        x: bounds.min_col * pitch,
        y: bounds.min_row * pitch,
        width: bounds.cols() * pitch - GRID_GAP,
        height: bounds.rows() * pitch - GRID_GAP,
    }
}

/// Scale an `image_width` x `image_height` image to cover `rect`.
///
/// Aspect ratio is preserved and the overflow is centered on the axis that
/// does not fit, so clipping to `rect` crops evenly from both sides.
#[must_use]
pub fn cover_fit(image_width: u32, image_height: u32, rect: PixelRect) -> Placement {
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (width, height) = (rect.width as f32, rect.height as f32);
    let image_ratio = image_width as f32 / image_height.max(1) as f32;
    let target_ratio = width / height.max(1.0);

    if image_ratio > target_ratio {
        // Wider than the box: fit height, crop left and right.
        let draw_width = height * image_ratio;
        Placement {
            x: x - (draw_width - width) / 2.0,
            y,
            width: draw_width,
            height,
        }
    } else {
        // Taller (or equal): fit width, crop top and bottom.
        let draw_height = width / image_ratio;
        Placement {
            x,
            y: y - (draw_height - height) / 2.0,
            width,
            height: draw_height,
        }
    }
}

/// Part of the image that `placement` leaves visible inside `rect`.
#[must_use]
pub fn visible_crop(placement: Placement, rect: PixelRect) -> ImageCrop {
    let span = |offset: f32, visible: f32, drawn: f32| {
        let drawn = drawn.max(f32::EPSILON);
        let len = (visible / drawn).clamp(0.0, 1.0);
        let start = (offset / drawn).clamp(0.0, 1.0 - len);
        (start, len)
    };
    let (x, width) = span(rect.x as f32 - placement.x, rect.width as f32, placement.width);
    let (y, height) = span(rect.y as f32 - placement.y, rect.height as f32, placement.height);
    ImageCrop { x, y, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;

    fn grid(n: u32) -> GridSize {
        GridSize::try_from(n).unwrap()
    }

    #[test]
    fn canvas_includes_inner_gaps_only() {
        assert_eq!(canvas_size(grid(2), 100), 204);
        assert_eq!(canvas_size(grid(3), 50), 158);
        assert_eq!(canvas_size(grid(4), 150), 612);
    }

    #[test]
    fn full_grid_box_matches_canvas() {
        let bounds = CellBounds::from_corners(Cell::new(0, 0), Cell::new(1, 1));
        let rect = cell_box(bounds, 100);
        assert_eq!(rect, PixelRect { x: 0, y: 0, width: 204, height: 204 });
    }

    #[test]
    fn single_cell_box_is_offset_by_pitch() {
        let bounds = CellBounds::from_corners(Cell::new(2, 1), Cell::new(2, 1));
        let rect = cell_box(bounds, 100);
        assert_eq!(rect, PixelRect { x: 104, y: 208, width: 100, height: 100 });
    }

    #[test]
    fn cover_fit_wide_image_crops_sides() {
        let rect = PixelRect { x: 10, y: 20, width: 100, height: 100 };
        let p = cover_fit(400, 200, rect);
        assert_eq!(p, Placement { x: -40.0, y: 20.0, width: 200.0, height: 100.0 });
    }

    #[test]
    fn cover_fit_tall_image_crops_top_and_bottom() {
        let rect = PixelRect { x: 0, y: 0, width: 200, height: 100 };
        let p = cover_fit(100, 100, rect);
        assert_eq!(p, Placement { x: 0.0, y: -50.0, width: 200.0, height: 200.0 });
    }

    #[test]
    fn visible_crop_of_wide_image_is_centered() {
        let rect = PixelRect { x: 10, y: 20, width: 100, height: 100 };
        let crop = visible_crop(cover_fit(400, 200, rect), rect);
        assert_eq!(crop, ImageCrop { x: 0.25, y: 0.0, width: 0.5, height: 1.0 });
    }

    #[test]
    fn visible_crop_of_exact_fit_is_whole_image() {
        let rect = PixelRect { x: 4, y: 4, width: 50, height: 25 };
        assert_eq!(visible_crop(cover_fit(10, 5, rect), rect), ImageCrop::FULL);
    }

    #[test]
    fn visible_crop_of_thin_image_is_a_sliver() {
        let rect = PixelRect { x: 0, y: 0, width: 1024, height: 1024 };
        let crop = visible_crop(cover_fit(1, 2000, rect), rect);
        assert_eq!((crop.x, crop.width), (0.0, 1.0));
        assert!(crop.height <= 1.0 / 1999.0);
        assert!((crop.y + crop.height / 2.0 - 0.5).abs() < 1e-3);
    }

    #[test]
    fn cover_fit_same_ratio_is_exact() {
        let rect = PixelRect { x: 4, y: 4, width: 50, height: 25 };
        let p = cover_fit(10, 5, rect);
        assert_eq!(p, Placement { x: 4.0, y: 4.0, width: 50.0, height: 25.0 });
    }
}
