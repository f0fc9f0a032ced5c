// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/selection.rs
//
// Two-click selection state: anchor plus hover preview.

use crate::domain::grid::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingSelection {
    #[default]
    Idle,
    Anchored {
        anchor: Cell,
        hover: Cell,
    },
}

impl PendingSelection {
    /// Feed a click on an unlocked cell.
    ///
    /// The first click anchors; the second returns both corners and goes
    /// back to idle.
    pub fn activate(&mut self, cell: Cell) -> Option<(Cell, Cell)> {
        match *self {
            Self::Idle => {
                *self = Self::Anchored {
                    anchor: cell,
                    hover: cell,
                };
                None
            }
            Self::Anchored { anchor, .. } => {
                *self = Self::Idle;
                Some((anchor, cell))
            }
        }
    }

    /// Move the preview corner. Ignored while idle.
    pub fn hover(&mut self, cell: Cell) {
        if let Self::Anchored { hover, .. } = self {
            *hover = cell;
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn anchor(&self) -> Option<Cell> {
        match self {
            Self::Idle => None,
            Self::Anchored { anchor, .. } => Some(*anchor),
        }
    }

    /// Anchor and hover corners while a selection is pending.
    pub fn corners(&self) -> Option<(Cell, Cell)> {
        match self {
            Self::Idle => None,
            Self::Anchored { anchor, hover } => Some((*anchor, *hover)),
        }
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self, Self::Anchored { .. })
    }
}
