// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/mod.rs
//
// Read-only views of the session state.

pub mod grid;

/// Usage guide shown on first run and toggled with `guide`.
pub const GUIDE: &str = "\
Usage:
  1. Pick a grid size and cell size:   grid 2|3|4, cell small|medium|large|PX
  2. Click a start cell, then an end cell:   click ROW,COL (twice) or select ROW,COL ROW,COL
  3. Upload an image into a region:   image REGION|ROW,COL PATH
  4. Repeat for more regions
  5. Export the collage:   export [PATH]
Tip: `undo` and `reset` rework the layout, `show` prints it, `guide` hides this text.";

/// Command reference printed by `help`.
pub const HELP: &str = "\
Commands:
  click ROW,COL            anchor or complete a selection
  hover ROW,COL            move the selection preview
  select ROW,COL [ROW,COL] select a rectangle in one step
  image REGION|ROW,COL PATH  attach an image to a region
  undo | reset             remove the last region | all regions
  grid N                   change grid size (2-4, clears regions)
  cell PX|small|medium|large  change cell size
  merge REGION...          show merged cells and adjacency
  export [PATH]            write the collage PNG
  show | guide | help | quit";
