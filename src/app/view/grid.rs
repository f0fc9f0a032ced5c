// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/grid.rs
//
// Text rendering of the grid, derived from the model.

use std::fmt::Write;

use crate::app::model::CollageModel;
use crate::domain::compose::canvas_size;
use crate::domain::grid::Cell;

/// Width of one rendered cell column.
const COLUMN_WIDTH: usize = 4;

/// Render the grid followed by a legend of regions.
///
/// Cells show their region id, `A` for a pending anchor, `o` for the hover
/// preview and `.` when free.
pub fn view(model: &CollageModel) -> String {
    let n = model.grid_size().get();
    let preview = model.preview_cells().unwrap_or_default();
    let anchor = model.pending().anchor();

    let mut out = String::new();
    let _ = write!(out, "{:>w$}", "", w = COLUMN_WIDTH);
    for col in 0..n {
        let _ = write!(out, "{col:>w$}", w = COLUMN_WIDTH);
    }
    out.push('\n');

    for row in 0..n {
        let _ = write!(out, "{row:>w$}", w = COLUMN_WIDTH);
        for col in 0..n {
            let cell = Cell::new(row, col);
            let mark = if let Some(region) = model.region_at(cell) {
                region.id.to_string()
            } else if anchor == Some(cell) {
                "A".to_owned()
            } else if preview.contains(&cell) {
                "o".to_owned()
            } else {
                ".".to_owned()
            };
            let _ = write!(out, "{mark:>w$}", w = COLUMN_WIDTH);
        }
        out.push('\n');
    }

    for region in model.regions() {
        let image = region
            .image
            .as_ref()
            .map_or_else(|| "(no image)".to_owned(), |img| format!("{} [{}]", img.name(), img.kind()));
        let _ = writeln!(out, "  {}: {}  {}", region.id, region.selection, image);
    }

    let side = canvas_size(model.grid_size(), model.cell_size());
    let _ = write!(
        out,
        "Grid {}, cell {}px, canvas {side}x{side}px, {} region(s), {} image(s)",
        model.grid_size(),
        model.cell_size(),
        model.regions().len(),
        model.image_count()
    );
    out
}
