// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Session layer: state, message dispatch and the command loop.

pub mod command;
pub mod export;
pub mod message;
pub mod model;
pub mod selection;
pub mod update;
pub mod view;

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub use self::message::AppMessage;
pub use self::model::CollageModel;

use self::export::Exporter;
use self::update::Feedback;
use crate::config::{AppConfig, FlagStore, restore_guide_state};

/// Everything a session owns.
pub struct AppState {
    pub model: CollageModel,
    pub config: AppConfig,
    pub flags: FlagStore,
    pub guide_open: bool,
    pub exporter: Exporter,
    /// Export destination given on the command line.
    pub output: Option<PathBuf>,
    pub open_after_export: bool,
}

impl AppState {
    /// Build a session. Restores (and records) the persisted guide flag.
    pub fn new(model: CollageModel, config: AppConfig, mut flags: FlagStore) -> Self {
        let guide_open = restore_guide_state(&mut flags);
        let open_after_export = config.open_after_export;
        Self {
            model,
            config,
            flags,
            guide_open,
            exporter: Exporter::new(),
            output: None,
            open_after_export,
        }
    }

    /// Feed command lines from `input` until it ends or `quit` is read.
    ///
    /// Parse errors are reported and the session goes on.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.guide_open {
            writeln!(out, "{}", view::GUIDE)?;
        }

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let message = match command::parse_line(&line) {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            };
            log::trace!("Message: {message:?}");

            match update::update(self, message).await {
                Feedback::None => {}
                Feedback::Text(text) => writeln!(out, "{text}")?,
                Feedback::Quit => break,
            }
        }
        out.flush()?;
        Ok(())
    }
}
