// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Pure domain logic, free of session and I/O concerns.

pub mod compose;
pub mod grid;
pub mod image;
