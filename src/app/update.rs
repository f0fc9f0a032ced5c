// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/update.rs
//
// Apply messages to the session state.

use std::path::{Path, PathBuf};

use crate::app::AppState;
use crate::app::export::ExportOutcome;
use crate::app::message::{AppMessage, ImageTarget};
use crate::app::model::{ActivateOutcome, RegionId};
use crate::app::view;
use crate::config::toggle_guide_state;
use crate::constant::EXPORT_FILE_NAME;
use crate::domain::grid::{Selection, merge_selections, regions_adjacent};
use crate::domain::image::ImageSource;

/// What the session should tell the user after a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    None,
    Text(String),
    Quit,
}

impl Feedback {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// Apply one message. Invalid interactions leave the state untouched and
/// produce no feedback.
pub async fn update(state: &mut AppState, message: AppMessage) -> Feedback {
    match message {
        AppMessage::CellActivate(cell) => activated(state.model.on_cell_activate(cell), state),
        AppMessage::Hover(cell) => {
            state.model.on_hover(cell);
            Feedback::None
        }
        AppMessage::SelectRange(a, b) => {
            state.model.cancel_pending();
            match state.model.on_cell_activate(a) {
                ActivateOutcome::Anchored(_) => activated(state.model.on_cell_activate(b), state),
                _ => Feedback::None,
            }
        }

        AppMessage::Undo => match state.model.undo() {
            Some(region) => Feedback::text(format!("Removed region {}", region.id)),
            None => Feedback::None,
        },
        AppMessage::Reset => {
            let removed = state.model.reset();
            if removed.is_empty() {
                Feedback::None
            } else {
                Feedback::text(format!("Removed {} region(s)", removed.len()))
            }
        }

        AppMessage::SetGridSize(n) => match state.model.change_grid_size(n) {
            Ok(_) => Feedback::text(format!("Grid {}", state.model.grid_size())),
            Err(e) => Feedback::text(e.to_string()),
        },
        AppMessage::SetCellSize(px) => match state.model.change_cell_size(px) {
            Ok(()) => Feedback::text(format!("Cell size {px}px")),
            Err(e) => Feedback::text(e.to_string()),
        },

        AppMessage::AssignImage { target, path } => assign_image(state, target, &path).await,

        AppMessage::Export(path) => export(state, path).await,

        AppMessage::Merge(ids) => merge(state, &ids),
        AppMessage::Show => Feedback::Text(view::grid::view(&state.model)),

        AppMessage::ToggleGuide => {
            state.guide_open = toggle_guide_state(&mut state.flags, state.guide_open);
            if state.guide_open {
                Feedback::text(view::GUIDE)
            } else {
                Feedback::None
            }
        }
        AppMessage::Help => Feedback::text(view::HELP),
        AppMessage::Quit => Feedback::Quit,
    }
}

fn activated(outcome: ActivateOutcome, state: &AppState) -> Feedback {
    match outcome {
        ActivateOutcome::Committed(id) => match state.model.region(id) {
            Some(region) => Feedback::text(format!("Region {id}: {}", region.selection)),
            None => Feedback::None,
        },
        _ => Feedback::None,
    }
}

async fn assign_image(state: &mut AppState, target: ImageTarget, path: &Path) -> Feedback {
    let id = match target {
        ImageTarget::Region(id) => Some(id),
        ImageTarget::Cell(cell) => state.model.region_at(cell).map(|r| r.id),
    };
    let Some(id) = id.filter(|id| state.model.region(*id).is_some()) else {
        log::debug!("No region for upload target {target:?}");
        return Feedback::None;
    };

    match ImageSource::open(path).await {
        Ok(source) => {
            let name = source.name().to_owned();
            if state.model.assign_image(id, source) {
                Feedback::text(format!("Region {id}: {name}"))
            } else {
                Feedback::None
            }
        }
        Err(e) => {
            log::warn!("Upload failed: {e:#}");
            Feedback::None
        }
    }
}

async fn export(state: &mut AppState, path: Option<PathBuf>) -> Feedback {
    let dest = export_destination(state, path);
    let plan = state.model.export_plan();

    match state.exporter.export(plan, &dest).await {
        Ok(ExportOutcome::Written(path)) => {
            if state.open_after_export {
                if let Err(e) = open::that_detached(&path) {
                    log::warn!("Failed to open {}: {e}", path.display());
                }
            }
            Feedback::text(format!("Saved {}", path.display()))
        }
        Ok(ExportOutcome::Skipped | ExportOutcome::Busy) => Feedback::None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Feedback::None
        }
    }
}

/// Explicit path, then `--output`, then the configured export directory.
/// A directory gets the default file name appended.
fn export_destination(state: &AppState, path: Option<PathBuf>) -> PathBuf {
    let dest = path
        .or_else(|| state.output.clone())
        .unwrap_or_else(|| {
            state
                .config
                .export_dir
                .clone()
                .unwrap_or_default()
                .join(EXPORT_FILE_NAME)
        });
    if dest.is_dir() {
        dest.join(EXPORT_FILE_NAME)
    } else {
        dest
    }
}

fn merge(state: &AppState, ids: &[RegionId]) -> Feedback {
    let mut selections: Vec<Selection> = Vec::with_capacity(ids.len());
    for id in ids {
        match state.model.region(*id) {
            Some(region) => selections.push(region.selection.clone()),
            None => return Feedback::text(format!("No region {id}")),
        }
    }

    let merged = merge_selections(&selections);
    let mut lines = vec![format!(
        "Merged: {merged} ({})",
        if merged.is_rectangular() {
            "rectangular"
        } else {
            "not rectangular"
        }
    )];
    for (i, a) in selections.iter().enumerate() {
        for (j, b) in selections.iter().enumerate().skip(i + 1) {
            let relation = if regions_adjacent(a, b) {
                "adjacent"
            } else {
                "apart"
            };
            lines.push(format!("  {} / {}: {relation}", ids[i], ids[j]));
        }
    }
    Feedback::Text(lines.join("\n"))
}
