// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Collage state: grid configuration, region history and pending selection.

use std::fmt;

use crate::app::selection::PendingSelection;
use crate::constant::{MAX_CELL_SIZE, MIN_CELL_SIZE};
use crate::domain::compose::ExportPlan;
use crate::domain::grid::{Cell, GridSize, Selection, cells_in_range, regions_overlap};
use crate::domain::image::ImageSource;

// =============================================================================
// Region
// =============================================================================

/// Stable identifier of a region, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl RegionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed selection and the image attached to it, if any.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: RegionId,
    pub selection: Selection,
    pub image: Option<ImageSource>,
}

/// Result of a cell click. Only `Committed` changes the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateOutcome {
    OutOfBounds,
    Locked,
    Anchored(Cell),
    Committed(RegionId),
    Rejected,
}

// =============================================================================
// Model
// =============================================================================

/// The collage being edited.
///
/// All mutation goes through the methods below; views only read.
#[derive(Debug)]
pub struct CollageModel {
    grid_size: GridSize,
    cell_size: u32,
    regions: Vec<Region>,
    pending: PendingSelection,
    next_id: u64,
}

impl CollageModel {
    pub fn new(grid_size: u32, cell_size: u32) -> anyhow::Result<Self> {
        Ok(Self {
            grid_size: GridSize::try_from(grid_size)?,
            cell_size: validate_cell_size(cell_size)?,
            regions: Vec::new(),
            pending: PendingSelection::Idle,
            next_id: 1,
        })
    }

    // Read access.

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Regions in history order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn region_at(&self, cell: Cell) -> Option<&Region> {
        self.regions.iter().find(|r| r.selection.contains(cell))
    }

    pub fn is_locked(&self, cell: Cell) -> bool {
        self.region_at(cell).is_some()
    }

    pub fn pending(&self) -> PendingSelection {
        self.pending
    }

    pub fn image_count(&self) -> usize {
        self.regions.iter().filter(|r| r.image.is_some()).count()
    }

    /// Cells of the live preview rectangle, unless it would overlap.
    pub fn preview_cells(&self) -> Option<Vec<Cell>> {
        let (anchor, hover) = self.pending.corners()?;
        let cells = cells_in_range(anchor, hover);
        if regions_overlap(self.selections(), &cells) {
            None
        } else {
            Some(cells)
        }
    }

    fn selections(&self) -> impl Iterator<Item = &Selection> {
        self.regions.iter().map(|r| &r.selection)
    }

    /// Snapshot of every image-bearing region, in history order.
    pub fn export_plan(&self) -> ExportPlan {
        ExportPlan::new(
            self.grid_size,
            self.cell_size,
            self.regions
                .iter()
                .filter_map(|r| r.image.as_ref().map(|img| (r.selection.bounds(), img))),
        )
    }

    // Mutation.

    /// Handle a click on `cell`.
    pub fn on_cell_activate(&mut self, cell: Cell) -> ActivateOutcome {
        if !self.grid_size.contains(cell) {
            log::debug!("Ignoring click outside the {} grid at {cell}", self.grid_size);
            return ActivateOutcome::OutOfBounds;
        }
        if self.is_locked(cell) {
            log::debug!("Cell {cell} is locked");
            return ActivateOutcome::Locked;
        }

        let Some((anchor, corner)) = self.pending.activate(cell) else {
            return ActivateOutcome::Anchored(cell);
        };

        let cells = cells_in_range(anchor, corner);
        if regions_overlap(self.selections(), &cells) {
            log::debug!("Discarding selection {anchor}..{corner}: overlaps an existing region");
            return ActivateOutcome::Rejected;
        }

        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.push(Region {
            id,
            selection: Selection::from_corners(anchor, corner),
            image: None,
        });
        ActivateOutcome::Committed(id)
    }

    /// Move the preview corner while a selection is pending.
    pub fn on_hover(&mut self, cell: Cell) {
        if self.grid_size.contains(cell) {
            self.pending.hover(cell);
        }
    }

    /// Forget a pending anchor without committing anything.
    pub fn cancel_pending(&mut self) {
        self.pending.cancel();
    }

    /// Drop the most recent region together with its image.
    pub fn undo(&mut self) -> Option<Region> {
        let region = self.regions.pop()?;
        log_released(std::slice::from_ref(&region));
        Some(region)
    }

    /// Drop every region and any pending anchor.
    pub fn reset(&mut self) -> Vec<Region> {
        self.pending.cancel();
        let removed = std::mem::take(&mut self.regions);
        log_released(&removed);
        removed
    }

    /// Change the grid size. Always clears the history, even for the same size.
    pub fn change_grid_size(&mut self, size: u32) -> anyhow::Result<Vec<Region>> {
        self.grid_size = GridSize::try_from(size)?;
        Ok(self.reset())
    }

    /// Change the rendered cell size. Regions are kept.
    pub fn change_cell_size(&mut self, px: u32) -> anyhow::Result<()> {
        self.cell_size = validate_cell_size(px)?;
        Ok(())
    }

    /// Attach an image to a region. Last write wins.
    ///
    /// Returns false (and drops `image`) if the region is not in history.
    pub fn assign_image(&mut self, id: RegionId, image: ImageSource) -> bool {
        let Some(region) = self.regions.iter_mut().find(|r| r.id == id) else {
            log::debug!("Ignoring image {} for unknown region {id}", image.name());
            return false;
        };
        if let Some(previous) = region.image.replace(image) {
            log::debug!("Released image {} from region {id}", previous.name());
        }
        true
    }
}

fn validate_cell_size(px: u32) -> anyhow::Result<u32> {
    if (MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&px) {
        Ok(px)
    } else {
        Err(anyhow::anyhow!(
            "Cell size must be between {MIN_CELL_SIZE} and {MAX_CELL_SIZE} px, got {px}"
        ))
    }
}

fn log_released(regions: &[Region]) {
    for region in regions {
        if let Some(image) = &region.image {
            log::debug!("Released image {} from region {}", image.name(), region.id);
        }
    }
}
