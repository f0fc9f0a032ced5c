// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/grid/cell.rs
//
// Grid coordinates, rectangular selections and generic cell sets.

use std::fmt;
use std::str::FromStr;

use crate::constant::{MAX_GRID_SIZE, MIN_GRID_SIZE};

// ============================================================================
// Grid Size
// ============================================================================

/// Number of cells per side of the square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(u32);

impl GridSize {
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.row < self.0 && cell.col < self.0
    }
}

impl TryFrom<u32> for GridSize {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(anyhow::anyhow!(
                "Grid size must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}, got {value}"
            ))
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

// ============================================================================
// Cell
// ============================================================================

/// A grid coordinate, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// True if `other` is one of the eight neighbours of this cell.
    #[must_use]
    pub fn touches(self, other: Cell) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Expected `row,col`, got `{s}`"))?;
        let row = row
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid row in `{s}`"))?;
        let col = col
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid column in `{s}`"))?;
        Ok(Self { row, col })
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl CellBounds {
    /// Bounds spanned by two opposite corners, in any order.
    #[must_use]
    pub fn from_corners(a: Cell, b: Cell) -> Self {
        Self {
            min_row: a.row.min(b.row),
            min_col: a.col.min(b.col),
            max_row: a.row.max(b.row),
            max_col: a.col.max(b.col),
        }
    }

    /// Smallest bounds containing every cell, or `None` for no cells.
    pub fn enclosing<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Option<Self> {
        cells.into_iter().fold(None, |acc, &cell| {
            Some(match acc {
                None => Self::from_corners(cell, cell),
                Some(b) => Self {
                    min_row: b.min_row.min(cell.row),
                    min_col: b.min_col.min(cell.col),
                    max_row: b.max_row.max(cell.row),
                    max_col: b.max_col.max(cell.col),
                },
            })
        })
    }

    /// Number of rows covered.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.max_row - self.min_row + 1
    }

    /// Number of columns covered.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    #[must_use]
    pub fn area(&self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        (self.min_row..=self.max_row).contains(&cell.row)
            && (self.min_col..=self.max_col).contains(&cell.col)
    }

    /// Every cell inside the bounds, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (min_col, max_col) = (self.min_col, self.max_col);
        (self.min_row..=self.max_row)
            .flat_map(move |row| (min_col..=max_col).map(move |col| Cell::new(row, col)))
    }
}

// ============================================================================
// Selection
// ============================================================================

/// A finalized, rectangular block of cells.
///
/// Only constructible from two corners, so the cells always fill the
/// bounding rectangle exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    bounds: CellBounds,
    cells: Vec<Cell>,
}

impl Selection {
    #[must_use]
    pub fn from_corners(a: Cell, b: Cell) -> Self {
        let bounds = CellBounds::from_corners(a, b);
        Self {
            bounds,
            cells: bounds.cells().collect(),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> CellBounds {
        self.bounds
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bounds;
        write!(
            f,
            "({},{})-({},{}) {}x{}",
            b.min_row,
            b.min_col,
            b.max_row,
            b.max_col,
            b.rows(),
            b.cols()
        )
    }
}

// ============================================================================
// Cell Set
// ============================================================================

/// An ordered set of cells with no shape guarantee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    cells: Vec<Cell>,
}

impl CellSet {
    /// Build from cells; duplicates are dropped and order becomes row-major.
    #[must_use]
    pub fn new(mut cells: Vec<Cell>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<CellBounds> {
        CellBounds::enclosing(&self.cells)
    }

    /// True if the cells exactly fill their bounding rectangle.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        self.bounds().is_some_and(|b| b.area() == self.cells.len())
    }
}

impl From<&Selection> for CellSet {
    fn from(selection: &Selection) -> Self {
        Self {
            cells: selection.cells.clone(),
        }
    }
}

impl fmt::Display for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.cells.iter().map(|c| format!("({c})")).collect();
        f.write_str(&cells.join(" "))
    }
}
