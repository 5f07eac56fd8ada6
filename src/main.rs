// SPDX-License-Identifier: MIT

#![warn(missing_docs)]

//! The gitignorer crate generates gitignore files.
//!
//! This crate downloads an archive of gitignore templates, then concatenates the locally cached
//! templates selected by the user into a gitignore file or a reusable template.

// Loading macros must be done at the crate root.
#[macro_use]
extern crate log;

#[macro_use]
extern crate clap;

#[macro_use]
extern crate lazy_static;

mod app;
mod archive;
mod assembler;
mod config;
mod errors;
mod listing;
mod resolver;
mod utils;

use app::run;
use config::runtime::RuntimeConfig;

/// This is the entry point for the crate's binary.
///
/// This function sets up the running environment then runs the selected operation; any error
/// is reported here & ends the process with a non-zero status.
fn main() {
    if let Err(err) = RuntimeConfig::load().and_then(run) {
        eprintln!("Application error: {}", err);
        std::process::exit(1);
    }
}
