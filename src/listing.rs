// SPDX-License-Identifier: MIT

//! The `listing` module enumerates the cached fragments & stored templates.

use crate::config::configs::{PathsConfig, FRAGMENT_SUFFIX, TEMPLATE_SUFFIX};
use crate::errors::{Error, ErrorKind};

use std::fs;
use std::io;
use std::path::Path;

/// Available names, per tier.
#[derive(Debug, Default, PartialEq)]
pub struct Available {
    pub languages: Vec<String>,
    pub globals: Vec<String>,
    pub templates: Vec<String>,
}

/// Returns the sorted names of the files in `dir` ending with `suffix`, suffix stripped.
pub fn names_in_dir(dir: &Path, suffix: &str) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        if let Some(name) = entry
            .file_name()
            .to_str()
            .and_then(|file_name| file_name.strip_suffix(suffix))
        {
            names.push(name.to_owned());
        }
    }
    names.sort();

    Ok(names)
}

/// Collects the available languages, globals & stored templates.
///
/// A missing fragment tree is reported as [`ErrorKind::MissingCache`]; a missing templates
/// directory means no templates were stored yet.
pub fn available(paths: &PathsConfig) -> Result<Available, Error> {
    let cache_error = |err: io::Error| match err.kind() {
        io::ErrorKind::NotFound => Error::new(ErrorKind::MissingCache, err),
        _ => Error::from(err),
    };

    let languages = names_in_dir(&paths.gitignores_dir(), FRAGMENT_SUFFIX).map_err(cache_error)?;
    let globals = names_in_dir(&paths.global_dir(), FRAGMENT_SUFFIX).map_err(cache_error)?;
    let templates = match names_in_dir(&paths.templates_dir(), TEMPLATE_SUFFIX) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        other => other?,
    };

    Ok(Available {
        languages,
        globals,
        templates,
    })
}

/// Renders [`Available`] as titled, comma-separated sections.
pub fn render(available: &Available) -> String {
    let sections = [
        ("List of available languages:", &available.languages),
        ("Global useful gitignores:", &available.globals),
        ("Available templates:", &available.templates),
    ];

    sections
        .iter()
        .map(|(title, names)| {
            format!(
                "\n{}\n{}\n{}\n",
                title,
                "=".repeat(title.len()),
                names.join(", ")
            )
        })
        .collect()
}
