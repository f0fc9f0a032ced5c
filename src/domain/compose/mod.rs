// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/compose/mod.rs
//
// Compositing: pixel layout, draw plan and rasterization.

pub mod compositor;
pub mod layout;

use crate::domain::grid::{CellBounds, GridSize};
use crate::domain::image::ImageSource;

pub use self::layout::{PixelRect, Placement, canvas_size, cell_box, cover_fit, visible_crop};

/// One image to draw, with its target box.
#[derive(Debug, Clone)]
pub struct PlannedLayer {
    pub rect: PixelRect,
    pub source: ImageSource,
}

/// Everything an export needs, snapshotted from the model.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Side length of the square canvas in pixels.
    pub canvas: u32,
    /// Layers in history order.
    pub layers: Vec<PlannedLayer>,
}

impl ExportPlan {
    /// Build a plan from `(bounds, image)` pairs in history order.
    pub fn new<'a>(
        grid: GridSize,
        cell_size: u32,
        regions: impl IntoIterator<Item = (CellBounds, &'a ImageSource)>,
    ) -> Self {
        let layers = regions
            .into_iter()
            .map(|(bounds, source)| PlannedLayer {
                rect: cell_box(bounds, cell_size),
                source: source.clone(),
            })
            .collect();

        Self {
            canvas: canvas_size(grid, cell_size),
            layers,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
