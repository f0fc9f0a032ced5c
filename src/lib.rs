// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Grid collage composer: select rectangular regions on a square grid, attach
// images and export the composited PNG.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;
