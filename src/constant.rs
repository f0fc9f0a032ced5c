// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

/// Spacing between neighbouring grid cells in pixels.
pub const GRID_GAP: u32 = 4;

/// Corner radius of every exported region in pixels.
pub const CORNER_RADIUS: f32 = 8.0;

/// Smallest supported grid size (cells per side).
pub const MIN_GRID_SIZE: u32 = 2;

/// Largest supported grid size (cells per side).
pub const MAX_GRID_SIZE: u32 = 4;

/// Grid size used when neither config nor CLI specify one.
pub const DEFAULT_GRID_SIZE: u32 = 3;

/// Smallest accepted cell size in pixels.
pub const MIN_CELL_SIZE: u32 = 16;

/// Largest accepted cell size in pixels.
pub const MAX_CELL_SIZE: u32 = 1024;

/// Cell size used when neither config nor CLI specify one.
pub const DEFAULT_CELL_SIZE: u32 = 100;

/// Named cell size presets (small / medium / large).
pub const CELL_SIZE_PRESETS: [(&str, u32); 3] = [("small", 50), ("medium", 100), ("large", 150)];

/// Canvas background behind all regions (#f3f4f6).
pub const BACKGROUND_RGBA: [u8; 4] = [0xf3, 0xf4, 0xf6, 0xff];

/// Fill drawn under each image inside its rounded cell.
pub const CELL_FILL_RGBA: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Default export file name.
pub const EXPORT_FILE_NAME: &str = "collage.png";

/// Suffix of the temporary file written before the export is moved into place.
pub const EXPORT_TEMP_SUFFIX: &str = "part";

/// Config directory name (below the platform config dir).
pub const CONFIG_DIR: &str = "collage";

/// Config file name.
pub const CONFIG_FILE: &str = "config.json";

/// Persisted UI flag file name.
pub const STATE_FILE: &str = "state.json";

/// Flag key: set once the first session has run.
pub const FIRST_VISIT_KEY: &str = "collage-first-visit";

/// Flag key: whether the usage guide is expanded.
pub const GUIDE_STATE_KEY: &str = "collage-guide-state";

/// Minimum pixmap size for SVG rendering (prevents 0x0 images).
pub const MIN_PIXMAP_SIZE: u32 = 1;
