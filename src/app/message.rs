// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Application messages: user interactions and session commands.

use std::path::PathBuf;

use crate::app::model::RegionId;
use crate::domain::grid::Cell;

/// Where an uploaded image should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Region(RegionId),
    /// The region covering this cell.
    Cell(Cell),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    // Selection.
    CellActivate(Cell),
    Hover(Cell),
    /// Two clicks in a row, dropping any pending anchor first.
    SelectRange(Cell, Cell),

    // History.
    Undo,
    Reset,

    // Grid configuration.
    SetGridSize(u32),
    SetCellSize(u32),

    // Images.
    AssignImage {
        target: ImageTarget,
        path: PathBuf,
    },

    // Output.
    Export(Option<PathBuf>),

    // Inspection.
    Merge(Vec<RegionId>),
    Show,

    // Guide / session.
    ToggleGuide,
    Help,
    Quit,
}
