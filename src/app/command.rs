// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/command.rs
//
// Parse session command lines into messages.

use std::path::PathBuf;

use anyhow::Context;

use crate::app::message::{AppMessage, ImageTarget};
use crate::app::model::RegionId;
use crate::constant::CELL_SIZE_PRESETS;
use crate::domain::grid::Cell;

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<AppMessage>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(v, r)| (v, r.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let message = match verb.to_ascii_lowercase().as_str() {
        "click" => AppMessage::CellActivate(one_cell(&args)?),
        "hover" => AppMessage::Hover(one_cell(&args)?),
        "select" => match args.as_slice() {
            [a, b] => AppMessage::SelectRange(a.parse()?, b.parse()?),
            [a] => {
                let cell: Cell = a.parse()?;
                AppMessage::SelectRange(cell, cell)
            }
            _ => anyhow::bail!("Usage: select ROW,COL [ROW,COL]"),
        },
        "undo" => AppMessage::Undo,
        "reset" => AppMessage::Reset,
        "grid" => AppMessage::SetGridSize(one_number(&args, "grid N")?),
        "cell" => AppMessage::SetCellSize(cell_size(&args)?),
        "image" => {
            let (target, path) = rest
                .split_once(char::is_whitespace)
                .context("Usage: image REGION|ROW,COL PATH")?;
            let path = path.trim();
            if path.is_empty() {
                anyhow::bail!("Usage: image REGION|ROW,COL PATH");
            }
            AppMessage::AssignImage {
                target: image_target(target)?,
                path: PathBuf::from(path),
            }
        }
        "export" => AppMessage::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "merge" => {
            if args.is_empty() {
                anyhow::bail!("Usage: merge REGION...");
            }
            let ids = args
                .iter()
                .map(|a| region_id(a))
                .collect::<anyhow::Result<Vec<_>>>()?;
            AppMessage::Merge(ids)
        }
        "show" => AppMessage::Show,
        "guide" => AppMessage::ToggleGuide,
        "help" | "?" => AppMessage::Help,
        "quit" | "exit" => AppMessage::Quit,
        other => anyhow::bail!("Unknown command `{other}` (try `help`)"),
    };

    Ok(Some(message))
}

fn one_cell(args: &[&str]) -> anyhow::Result<Cell> {
    match args {
        [cell] => cell.parse(),
        _ => anyhow::bail!("Expected one ROW,COL argument"),
    }
}

fn one_number(args: &[&str], usage: &str) -> anyhow::Result<u32> {
    match args {
        [n] => n.parse().with_context(|| format!("Usage: {usage}")),
        _ => anyhow::bail!("Usage: {usage}"),
    }
}

fn cell_size(args: &[&str]) -> anyhow::Result<u32> {
    if let [name] = args {
        let name = name.to_ascii_lowercase();
        if let Some((_, px)) = CELL_SIZE_PRESETS.iter().find(|(preset, _)| *preset == name) {
            return Ok(*px);
        }
    }
    one_number(args, "cell PX|small|medium|large")
}

fn region_id(arg: &str) -> anyhow::Result<RegionId> {
    arg.parse()
        .map(RegionId::new)
        .with_context(|| format!("Invalid region id `{arg}`"))
}

fn image_target(arg: &str) -> anyhow::Result<ImageTarget> {
    if arg.contains(',') {
        Ok(ImageTarget::Cell(arg.parse()?))
    } else {
        Ok(ImageTarget::Region(region_id(arg)?))
    }
}
