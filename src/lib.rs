// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |             archive / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '--+-----------------+------'
//!                 |                 |
//!                 v                 v
//!              github            archive
//!           REST client   filter / runner / cleaner
//!          list + fork        dispatcher
//!                 |                 |
//!                 +--------+--------+
//!                          v
//!                  asset (GitAsset)
//!
//!   +-----------------------------------------+
//!   |  core     process (git child processes) |
//!   +-----------------------------------------+
//!   |  foundation        error, logging       |
//!   +-----------------------------------------+
//! ```

pub mod archive;
pub mod asset;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod github;
pub mod logging;
