// SPDX-License-Identifier: MIT

//! The `archive` module downloads the gitignore template archive & unpacks it into the data
//! directory.

use crate::config::configs::{GITIGNORES_SUBDIR, TEMPLATES_SUBDIR};
use crate::errors::{Error, ErrorKind};

use std::fs::{self, DirBuilder, File};
use std::io;
use std::path::{Path, PathBuf};

/// Directory (within the data directory) holding the previous fragment tree during a swap.
const PREVIOUS_DIR_NAME: &str = ".gitignores.old";

/// Name of the downloaded archive within the data directory.
const ARCHIVE_FILE_NAME: &str = "gitignores.zip";

/// Directory (within the data directory) the archive is unpacked into before being moved in place.
const STAGING_DIR_NAME: &str = ".staging";

/// Somewhere a template archive can be fetched from.
pub trait ArchiveSource {
    /// Saves the archive at `destination`.
    fn fetch(&self, destination: &Path) -> Result<(), Error>;
}

/// [`ArchiveSource`] served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: url.into() }
    }
}

impl ArchiveSource for HttpSource {
    fn fetch(&self, destination: &Path) -> Result<(), Error> {
        let download_error =
            |err: reqwest::Error| Error::new(ErrorKind::Download, err).context(self.url.clone());

        debug!("downloading {} to {}", self.url, destination.display());

        let mut response = reqwest::blocking::get(&self.url)
            .and_then(|response| response.error_for_status())
            .map_err(download_error)?;

        let mut file = File::create(destination)
            .map_err(|err| Error::from(err).context(destination.display().to_string()))?;
        response.copy_to(&mut file).map_err(download_error)?;

        Ok(())
    }
}

/// Unpacks the zip archive at `archive_path` into `destination`.
///
/// Every entry must stay within `destination`; the first one that doesn't aborts the extraction
/// with [`ErrorKind::PathTraversal`]. Returns the paths written.
pub fn extract(archive_path: &Path, destination: &Path) -> Result<Vec<PathBuf>, Error> {
    let archive_error = |err: zip::result::ZipError| {
        Error::new(ErrorKind::Archive, err).context(archive_path.display().to_string())
    };

    let file = File::open(archive_path)
        .map_err(|err| Error::from(err).context(archive_path.display().to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;

    DirBuilder::new().recursive(true).create(destination)?;
    let mut file_names = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_error)?;

        let out_path = match entry.enclosed_name() {
            Some(relative) => destination.join(relative),
            None => {
                return Err(Error::from(ErrorKind::PathTraversal).context(entry.name().to_owned()))
            }
        };
        if !out_path.starts_with(destination) {
            return Err(
                Error::from(ErrorKind::PathTraversal).context(out_path.display().to_string())
            );
        }

        if entry.is_dir() {
            DirBuilder::new().recursive(true).create(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                DirBuilder::new().recursive(true).create(parent)?;
            }

            let mut out_file = File::create(&out_path)
                .map_err(|err| Error::from(err).context(out_path.display().to_string()))?;
            io::copy(&mut entry, &mut out_file)
                .map_err(|err| Error::from(err).context(out_path.display().to_string()))?;

            if let Some(mode) = entry.unix_mode() {
                restore_mode(&out_path, mode)?;
            }
        }

        trace!("extracted {}", out_path.display());
        file_names.push(out_path);
    }

    Ok(file_names)
}

/// Replaces the fragment tree within `data_dir` with a freshly downloaded one.
///
/// The archive is fetched to `data_dir/gitignores.zip`, unpacked into a staging directory, then
/// its single top-level directory becomes `data_dir/gitignores`. The stored templates directory
/// is created if missing & left untouched otherwise. Any failing step aborts the update.
pub fn update_templates(source: &dyn ArchiveSource, data_dir: &Path) -> Result<PathBuf, Error> {
    let archive_path = data_dir.join(ARCHIVE_FILE_NAME);
    let staging_dir = data_dir.join(STAGING_DIR_NAME);
    let gitignores_dir = data_dir.join(GITIGNORES_SUBDIR);

    DirBuilder::new().recursive(true).create(data_dir)?;
    remove_dir_if_present(&staging_dir)?;

    info!("Downloading gitignore files...");
    let result = source
        .fetch(&archive_path)
        .and_then(|_| {
            info!("Unzipping files...");
            extract(&archive_path, &staging_dir)
        })
        .and_then(|_| archive_root(&staging_dir))
        .and_then(|root| {
            replace_dir(&root, &gitignores_dir, &data_dir.join(PREVIOUS_DIR_NAME))
        });

    let _ = fs::remove_file(&archive_path);
    let _ = remove_dir_if_present(&staging_dir);
    result?;

    DirBuilder::new()
        .recursive(true)
        .create(data_dir.join(TEMPLATES_SUBDIR))?;

    Ok(gitignores_dir)
}

/// Moves `source` to `target`, keeping any existing `target` aside at `previous` until the move
/// succeeds. On failure the old `target` is put back.
fn replace_dir(source: &Path, target: &Path, previous: &Path) -> Result<(), Error> {
    let io_error = |path: &Path| {
        let path = path.display().to_string();
        move |err: io::Error| Error::from(err).context(path)
    };

    remove_dir_if_present(previous)?;
    let had_target = target.exists();
    if had_target {
        fs::rename(target, previous).map_err(io_error(target))?;
    }

    if let Err(err) = fs::rename(source, target) {
        if had_target {
            if let Err(restore_err) = fs::rename(previous, target) {
                error!(
                    "failed to restore {} from {}: {}",
                    target.display(),
                    previous.display(),
                    restore_err
                );
            }
        }
        return Err(io_error(target)(err));
    }

    if had_target {
        remove_dir_if_present(previous)?;
    }

    Ok(())
}

#[cfg(unix)]
fn restore_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777))
}

#[cfg(not(unix))]
fn restore_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Returns the single directory an archive was unpacked to.
fn archive_root(staging_dir: &Path) -> Result<PathBuf, Error> {
    let entries = fs::read_dir(staging_dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;

    match entries.as_slice() {
        [root] if root.is_dir() => Ok(root.to_owned()),
        _ => Err(Error::from(ErrorKind::Archive)
            .context("expected a single top-level directory in the archive")),
    }
}

fn remove_dir_if_present(dir: &Path) -> Result<(), Error> {
    match fs::remove_dir_all(dir) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            Err(Error::from(err).context(dir.display().to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    /// Serves a prebuilt archive from memory.
    struct MemorySource(Vec<u8>);

    impl ArchiveSource for MemorySource {
        fn fetch(&self, destination: &Path) -> Result<(), Error> {
            Ok(fs::write(destination, &self.0)?)
        }
    }

    struct FailingSource;

    impl ArchiveSource for FailingSource {
        fn fetch(&self, _destination: &Path) -> Result<(), Error> {
            Err(Error::from(ErrorKind::Download))
        }
    }

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
        }

        writer.finish().unwrap().into_inner()
    }

    fn upstream_archive() -> Vec<u8> {
        zip_bytes(&[
            ("gitignore-main/", ""),
            ("gitignore-main/Python.gitignore", "__pycache__/"),
            ("gitignore-main/Global/", ""),
            ("gitignore-main/Global/Emacs.gitignore", "*~"),
        ])
    }

    #[test]
    fn traversal_entry_is_rejected() {
        let root = TempDir::new().unwrap();
        let destination = root.path().join("a/b");
        let archive_path = root.path().join("evil.zip");
        fs::write(&archive_path, zip_bytes(&[("../../evil", "pwned")])).unwrap();

        let err = extract(&archive_path, &destination).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::PathTraversal);
        assert!(!root.path().join("evil").exists());
        assert!(!root.path().join("a/evil").exists());
    }

    #[test]
    fn extract_lists_written_paths() {
        let root = TempDir::new().unwrap();
        let archive_path = root.path().join("ok.zip");
        fs::write(&archive_path, upstream_archive()).unwrap();

        let written = extract(&archive_path, &root.path().join("out")).unwrap();

        assert_eq!(written.len(), 4);
        assert_eq!(
            fs::read_to_string(root.path().join("out/gitignore-main/Global/Emacs.gitignore"))
                .unwrap(),
            "*~"
        );
    }

    #[test]
    fn update_lays_out_data_dir() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");

        let gitignores = update_templates(&MemorySource(upstream_archive()), &data_dir).unwrap();

        assert_eq!(gitignores, data_dir.join("gitignores"));
        assert!(gitignores.join("Python.gitignore").is_file());
        assert!(gitignores.join("Global/Emacs.gitignore").is_file());
        assert!(data_dir.join("Templates").is_dir());
        assert!(!data_dir.join(ARCHIVE_FILE_NAME).exists());
        assert!(!data_dir.join(STAGING_DIR_NAME).exists());
    }

    #[test]
    fn update_replaces_old_tree_and_keeps_templates() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        fs::create_dir_all(data_dir.join("gitignores")).unwrap();
        fs::write(data_dir.join("gitignores/Stale.gitignore"), "old").unwrap();
        fs::create_dir_all(data_dir.join("Templates")).unwrap();
        fs::write(data_dir.join("Templates/Mine.Template.gitignore"), "mine").unwrap();

        update_templates(&MemorySource(upstream_archive()), &data_dir).unwrap();

        assert!(!data_dir.join("gitignores/Stale.gitignore").exists());
        assert!(data_dir.join("gitignores/Python.gitignore").is_file());
        assert!(data_dir.join("Templates/Mine.Template.gitignore").is_file());
    }

    #[test]
    fn failed_swap_keeps_old_tree() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("gitignores");
        let previous = root.path().join(".gitignores.old");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("Python.gitignore"), "kept").unwrap();

        let err = replace_dir(&root.path().join("no-such-dir"), &target, &previous).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::Io);
        assert_eq!(fs::read_to_string(target.join("Python.gitignore")).unwrap(), "kept");
        assert!(!previous.exists());
    }

    #[test]
    fn swap_replaces_and_cleans_up() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("new");
        let target = root.path().join("gitignores");
        let previous = root.path().join(".gitignores.old");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("Go.gitignore"), "bin/").unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("Python.gitignore"), "old").unwrap();

        replace_dir(&source, &target, &previous).unwrap();

        assert!(target.join("Go.gitignore").is_file());
        assert!(!target.join("Python.gitignore").exists());
        assert!(!previous.exists());
        assert!(!source.exists());
    }

    #[test]
    fn failed_download_aborts_update() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        fs::create_dir_all(data_dir.join("gitignores")).unwrap();
        fs::write(data_dir.join("gitignores/Python.gitignore"), "kept").unwrap();

        let err = update_templates(&FailingSource, &data_dir).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::Download);
        assert_eq!(
            fs::read_to_string(data_dir.join("gitignores/Python.gitignore")).unwrap(),
            "kept"
        );
        assert!(!data_dir.join("Templates").exists());
    }

    #[test]
    fn traversal_aborts_update() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        let archive = zip_bytes(&[("gitignore-main/ok.gitignore", "x"), ("../evil", "pwned")]);

        let err = update_templates(&MemorySource(archive), &data_dir).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::PathTraversal);
        assert!(!root.path().join("evil").exists());
        assert!(!data_dir.join("gitignores").exists());
    }

    #[test]
    fn archive_without_single_root_is_rejected() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        let archive = zip_bytes(&[("Python.gitignore", "a"), ("Go.gitignore", "b")]);

        let err = update_templates(&MemorySource(archive), &data_dir).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::Archive);
    }
}
