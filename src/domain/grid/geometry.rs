// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/grid/geometry.rs
//
// Pure cell geometry: ranges, overlap, adjacency and merging.

use std::collections::HashSet;

use super::cell::{Cell, CellBounds, CellSet, Selection};

/// Every cell in the inclusive rectangle with corners `a` and `b`, row-major.
#[must_use]
pub fn cells_in_range(a: Cell, b: Cell) -> Vec<Cell> {
    CellBounds::from_corners(a, b).cells().collect()
}

/// True if any candidate cell is already claimed by one of `existing`.
pub fn regions_overlap<'a>(
    existing: impl IntoIterator<Item = &'a Selection>,
    candidate: &[Cell],
) -> bool {
    existing
        .into_iter()
        .any(|selection| candidate.iter().any(|&cell| selection.contains(cell)))
}

/// True if some cell of `a` neighbours some cell of `b`, diagonals included.
#[must_use]
pub fn regions_adjacent(a: &Selection, b: &Selection) -> bool {
    a.cells()
        .iter()
        .any(|&ca| b.cells().iter().any(|&cb| ca.touches(cb)))
}

/// Merge selections into the cells they cover inside their joint bounds.
///
/// Gaps inside the bounding box are not filled, so the result may be
/// non-rectangular or even disconnected.
#[must_use]
pub fn merge_selections(selections: &[Selection]) -> CellSet {
    let present: HashSet<Cell> = selections
        .iter()
        .flat_map(|s| s.cells().iter().copied())
        .collect();

    let Some(bounds) = CellBounds::enclosing(&present) else {
        return CellSet::default();
    };

    CellSet::new(bounds.cells().filter(|cell| present.contains(cell)).collect())
}
