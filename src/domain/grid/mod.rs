// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/grid/mod.rs
//
// Grid domain: cells, selections and their geometry.

mod cell;
mod geometry;

pub use cell::{Cell, CellBounds, CellSet, GridSize, Selection};
pub use geometry::{cells_in_range, merge_selections, regions_adjacent, regions_overlap};
