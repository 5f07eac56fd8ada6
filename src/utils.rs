// SPDX-License-Identifier: MIT

//! The `utils` module defines filesystem helpers shared by the config & output modules.

use std::error::Error as StdErr;
use std::fs::{DirBuilder, File};
use std::path::Path;

/// Creates a file defined by a filepath.
///
/// This function builds a file path's directory hierarchy (if necessary) then creates the file
/// specified by the path.
pub fn create_file(file_path: &Path) -> Result<(), Box<dyn StdErr>> {
    info!("creating file: {}", file_path.display());

    create_parent_dir(file_path)?;
    File::create(file_path)?;

    Ok(())
}

/// Builds the directory hierarchy leading up to a file path.
pub fn create_parent_dir(file_path: &Path) -> std::io::Result<()> {
    match file_path.parent() {
        Some(file_dir) if !file_dir.as_os_str().is_empty() && !file_dir.is_dir() => {
            debug!("creating directory: {}", file_dir.display());
            DirBuilder::new().recursive(true).create(file_dir)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_file_builds_hierarchy() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("a/b/config.toml");

        create_file(&path).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn bare_file_name_needs_no_parent() {
        assert!(create_parent_dir(Path::new(".gitignore")).is_ok());
    }
}
