// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/export.rs
//
// Export pipeline: decode, composite, encode and write the collage.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use futures_util::future::try_join_all;

use crate::constant::EXPORT_TEMP_SUFFIX;
use crate::domain::compose::compositor::{allocate_canvas, draw_layer, encode_png};
use crate::domain::compose::{ExportPlan, PlannedLayer};
use crate::domain::image::DecodedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The collage was written to this path.
    Written(PathBuf),
    /// Nothing to export (no images, or no drawable surface).
    Skipped,
    /// Another export is still running.
    Busy,
}

/// Runs exports, one at a time.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    busy: Arc<AtomicBool>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Render `plan` and write it as PNG to `dest`.
    ///
    /// Decodes run on the blocking pool; their results keep plan order, so
    /// layers are drawn in history order. Any failure aborts before the
    /// destination is touched.
    pub async fn export(&self, plan: ExportPlan, dest: &Path) -> anyhow::Result<ExportOutcome> {
        if plan.is_empty() {
            log::debug!("Nothing to export");
            return Ok(ExportOutcome::Skipped);
        }
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            log::warn!("Export already in progress");
            return Ok(ExportOutcome::Busy);
        };
        let Some(canvas) = allocate_canvas(plan.canvas) else {
            log::warn!("No drawing surface for a {0}x{0} canvas", plan.canvas);
            return Ok(ExportOutcome::Skipped);
        };

        let decoded = decode_all(&plan.layers).await?;

        let layers = plan.layers;
        let png = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<u8>> {
            let mut canvas = canvas;
            for (layer, image) in layers.iter().zip(&decoded) {
                draw_layer(&mut canvas, layer.rect, image)
                    .with_context(|| format!("Failed to draw {}", layer.source.name()))?;
            }
            encode_png(&canvas)
        })
        .await
        .context("Render task failed")??;

        write_atomically(dest, &png).await?;
        log::info!("Exported {} ({} bytes)", dest.display(), png.len());

        Ok(ExportOutcome::Written(dest.to_path_buf()))
    }
}

/// Resets the busy flag when the export ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn decode_all(layers: &[PlannedLayer]) -> anyhow::Result<Vec<DecodedImage>> {
    let tasks = layers.iter().map(|layer| {
        let source = layer.source.clone();
        async move {
            let name = source.name().to_owned();
            tokio::task::spawn_blocking(move || source.decode())
                .await
                .context("Decode task failed")?
                .with_context(|| format!("Failed to decode {name}"))
        }
    });
    try_join_all(tasks).await
}

/// Write next to `dest` first, then move into place.
///
/// The temporary file is removed whenever either step fails.
async fn write_atomically(dest: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let tmp = temp_path(dest);

    let result = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, dest)
            .await
            .with_context(|| format!("Failed to move export to {}", dest.display())),
        Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to write {}", tmp.display()))),
    };
    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            log::debug!("Could not remove {}: {e}", tmp.display());
        }
    }
    result
}

fn temp_path(dest: &Path) -> PathBuf {
    let mut tmp = OsString::from(dest.as_os_str());
    tmp.push(".");
    tmp.push(EXPORT_TEMP_SUFFIX);
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compose::PixelRect;
    use crate::domain::grid::{Cell, CellBounds, GridSize};
    use crate::domain::image::ImageSource;
    use crate::domain::image::raster::tests::solid_png;

    fn temp_dest(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("collage-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    fn full_plan(source: &ImageSource) -> ExportPlan {
        let bounds = CellBounds::from_corners(Cell::new(0, 0), Cell::new(1, 1));
        ExportPlan::new(GridSize::try_from(2).unwrap(), 100, [(bounds, source)])
    }

    #[tokio::test]
    async fn writes_png_with_canvas_dimensions() {
        let source = ImageSource::from_bytes("red.png", solid_png(8, 8, [255, 0, 0, 255])).unwrap();
        let dest = temp_dest("written.png");

        let outcome = Exporter::new().export(full_plan(&source), &dest).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Written(dest.clone()));

        let img = image::open(&dest).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (204, 204));
        assert_eq!(img.get_pixel(102, 102).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0xf3, 0xf4, 0xf6, 0xff]);
    }

    #[tokio::test]
    async fn empty_plan_is_skipped() {
        let plan = ExportPlan {
            canvas: 204,
            layers: Vec::new(),
        };
        let dest = temp_dest("skipped.png");
        let outcome = Exporter::new().export(plan, &dest).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Skipped);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn zero_canvas_is_skipped() {
        let source = ImageSource::from_bytes("red.png", solid_png(2, 2, [255, 0, 0, 255])).unwrap();
        let plan = ExportPlan {
            canvas: 0,
            layers: vec![PlannedLayer {
                rect: PixelRect { x: 0, y: 0, width: 1, height: 1 },
                source,
            }],
        };
        let outcome = Exporter::new().export(plan, &temp_dest("zero.png")).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Skipped);
    }

    #[tokio::test]
    async fn broken_image_aborts_without_output() {
        let mut png = solid_png(8, 8, [0, 0, 0, 255]);
        png.truncate(24);
        let source = ImageSource::from_bytes("broken.png", png).unwrap();
        let dest = temp_dest("broken.png");

        let exporter = Exporter::new();
        let err = exporter.export(full_plan(&source), &dest).await.unwrap_err();
        assert!(format!("{err:#}").contains("broken.png"));
        assert!(!dest.exists());
        assert!(!exporter.is_busy());
    }

    #[tokio::test]
    async fn concurrent_export_reports_busy() {
        let source = ImageSource::from_bytes("red.png", solid_png(8, 8, [255, 0, 0, 255])).unwrap();
        let (first, second) = (temp_dest("first.png"), temp_dest("second.png"));
        let exporter = Exporter::new();

        let (a, b) = tokio::join!(
            exporter.export(full_plan(&source), &first),
            exporter.export(full_plan(&source), &second),
        );
        assert_eq!(a.unwrap(), ExportOutcome::Written(first));
        assert_eq!(b.unwrap(), ExportOutcome::Busy);
        assert!(!second.exists());
        assert!(!exporter.is_busy());
    }

    #[tokio::test]
    async fn failed_move_leaves_no_temp_file() {
        let dest = temp_dest("occupied");
        std::fs::create_dir_all(&dest).unwrap();

        assert!(write_atomically(&dest, b"data").await.is_err());
        assert!(!temp_path(&dest).exists());
        assert!(dest.is_dir());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let dest = temp_dest("full.png");
        let tmp = temp_path(&dest);
        let _ = std::fs::remove_file(&tmp);
        // Writes through this link fail with ENOSPC after the file is opened.
        std::os::unix::fs::symlink("/dev/full", &tmp).unwrap();

        let err = write_atomically(&dest, &[0; 4096]).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to write"));
        assert!(std::fs::symlink_metadata(&tmp).is_err());
        assert!(!dest.exists());
    }
}
