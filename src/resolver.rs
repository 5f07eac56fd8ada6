// SPDX-License-Identifier: MIT

//! The `resolver` module locates the gitignore fragments requested by the user.
//!
//! A fragment named `Name` lives at `Name.gitignore` in either the primary (language) directory
//! or the global directory; the primary directory wins when both hold one.

use crate::config::configs::FRAGMENT_SUFFIX;

use std::path::{Path, PathBuf};

/// Lookup outcome for a single requested name.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// The fragment file backing the name.
    Found(PathBuf),
    Missing,
}

/// A requested name paired with its lookup outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub name: String,
    pub status: Status,
}

impl Resolved {
    /// Returns the fragment path of a found name.
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            Status::Found(path) => Some(path),
            Status::Missing => None,
        }
    }
}

/// Splits a comma-separated name list.
///
/// Names are neither trimmed, deduplicated nor sorted.
pub fn split_names(names: &str) -> Vec<&str> {
    names.split(',').collect()
}

/// Looks up a single fragment, primary directory first.
pub fn locate(name: &str, primary_dir: &Path, global_dir: &Path) -> Status {
    let file_name = format!("{}{}", name, FRAGMENT_SUFFIX);

    [primary_dir, global_dir]
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
        .map_or(Status::Missing, Status::Found)
}

/// Resolves every name against the primary & global directories, preserving input order.
///
/// Missing names are reported & kept in the output as [`Status::Missing`].
pub fn resolve<S: AsRef<str>>(names: &[S], primary_dir: &Path, global_dir: &Path) -> Vec<Resolved> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let status = locate(name, primary_dir, global_dir);

            match &status {
                Status::Found(path) => trace!("resolved {} to {}", name, path.display()),
                Status::Missing => {
                    warn!(
                        "Language/global gitignore {} does not exist, skipping it",
                        name
                    )
                }
            }

            Resolved {
                name: name.to_owned(),
                status,
            }
        })
        .collect()
}
