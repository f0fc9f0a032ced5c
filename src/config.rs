// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Global configuration and persisted UI flags.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constant::{
    CONFIG_DIR, CONFIG_FILE, DEFAULT_CELL_SIZE, DEFAULT_GRID_SIZE, FIRST_VISIT_KEY,
    GUIDE_STATE_KEY, MAX_CELL_SIZE, MIN_CELL_SIZE, STATE_FILE,
};
use crate::domain::grid::GridSize;

/// Global configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Grid size used for a new session.
    pub default_grid_size: u32,
    /// Cell size in pixels used for a new session.
    pub default_cell_size: u32,
    /// Directory receiving exports when no explicit path is given.
    pub export_dir: Option<PathBuf>,
    /// Open the written collage with the system viewer after export.
    pub open_after_export: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_grid_size: DEFAULT_GRID_SIZE,
            default_cell_size: DEFAULT_CELL_SIZE,
            export_dir: None,
            open_after_export: false,
        }
    }
}

impl AppConfig {
    /// Load the config from the user config dir, falling back to defaults.
    pub fn load() -> Self {
        match config_dir().map(|dir| dir.join(CONFIG_FILE)) {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Load the config from an explicit file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Replace out-of-range sizes with the defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if let Err(e) = GridSize::try_from(self.default_grid_size) {
            log::warn!("Ignoring default_grid_size: {e}");
            self.default_grid_size = DEFAULT_GRID_SIZE;
        }
        if !(MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&self.default_cell_size) {
            log::warn!(
                "Ignoring default_cell_size {}: must be between {MIN_CELL_SIZE} and {MAX_CELL_SIZE} px",
                self.default_cell_size
            );
            self.default_cell_size = DEFAULT_CELL_SIZE;
        }
        self
    }
}

/// Directory holding `config.json` and `state.json`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR))
}

// =============================================================================
// Persisted flags
// =============================================================================

/// Small string key/value store persisted as a JSON object.
///
/// Values are stored as `"true"` / `"false"` strings. A store without a
/// backing path keeps everything in memory.
#[derive(Debug, Default)]
pub struct FlagStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl FlagStore {
    /// Open the store in the user config dir.
    pub fn open_default() -> Self {
        match config_dir() {
            Some(dir) => Self::open(dir.join(STATE_FILE)),
            None => Self::in_memory(),
        }
    }

    /// Open a store backed by `path`. A missing or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Discarding malformed state file {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path),
            values,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value and write the store back to disk.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.persist()
    }

    fn persist(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Restore the guide state, marking the first visit on the way.
///
/// First visit: the guide is shown. Later visits: shown iff it was left open.
pub fn restore_guide_state(store: &mut FlagStore) -> bool {
    if store.get(FIRST_VISIT_KEY).is_none() {
        if let Err(e) = store.set(FIRST_VISIT_KEY, "false") {
            log::warn!("Failed to record first visit: {e:#}");
        }
        return true;
    }
    store.get(GUIDE_STATE_KEY) == Some("true")
}

/// Flip the guide state and persist it. Returns the new state.
pub fn toggle_guide_state(store: &mut FlagStore, open: bool) -> bool {
    let next = !open;
    if let Err(e) = store.set(GUIDE_STATE_KEY, if next { "true" } else { "false" }) {
        log::warn!("Failed to persist guide state: {e:#}");
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("collage-config-{}-{name}", std::process::id()))
            .join(STATE_FILE);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn first_visit_opens_guide_and_is_recorded() {
        let path = temp_state("first");
        let mut store = FlagStore::open(path.clone());
        assert!(restore_guide_state(&mut store));

        let mut reopened = FlagStore::open(path);
        assert_eq!(reopened.get(FIRST_VISIT_KEY), Some("false"));
        // Guide state was never written, so a later visit keeps it closed.
        assert!(!restore_guide_state(&mut reopened));
    }

    #[test]
    fn toggled_guide_state_survives_reopen() {
        let path = temp_state("toggle");
        let mut store = FlagStore::open(path.clone());
        let open = restore_guide_state(&mut store);
        let open = toggle_guide_state(&mut store, open);
        let open = toggle_guide_state(&mut store, open);
        assert!(open);

        let mut reopened = FlagStore::open(path);
        assert!(restore_guide_state(&mut reopened));
    }

    #[test]
    fn out_of_range_sizes_fall_back_to_defaults() {
        let path = temp_state("config-range");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{ "default_grid_size": 7, "default_cell_size": 5, "open_after_export": true }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(config.default_cell_size, DEFAULT_CELL_SIZE);
        assert!(config.open_after_export);

        let valid = AppConfig {
            default_grid_size: 2,
            default_cell_size: 1024,
            ..AppConfig::default()
        };
        assert_eq!(valid.clone().sanitized(), valid);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "default_grid_size": 4 }"#).unwrap();
        assert_eq!(config.default_grid_size, 4);
        assert_eq!(config.default_cell_size, DEFAULT_CELL_SIZE);
        assert!(!config.open_after_export);
    }
}
