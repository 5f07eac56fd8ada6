// SPDX-License-Identifier: MIT

//! The `assembler` module concatenates resolved gitignore fragments & persists the result.

use crate::errors::{Error, ErrorKind};
use crate::resolver::Resolved;
use crate::utils::create_parent_dir;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Banner preceding each fragment's contents.
pub fn section_header(name: &str) -> String {
    format!("\n##### {} #####\n\n", name)
}

/// Concatenates the found fragments, in order, each preceded by its [`section_header`].
///
/// Fragment bytes are copied verbatim. Missing entries contribute nothing; a found fragment that
/// can't be read aborts the whole assembly.
pub fn assemble(resolved: &[Resolved]) -> Result<Vec<u8>, Error> {
    let mut out_data = Vec::new();

    for (name, path) in resolved
        .iter()
        .filter_map(|entry| entry.path().map(|path| (&entry.name, path)))
    {
        let fragment = fs::read(path)
            .map_err(|err| Error::from(err).context(path.display().to_string()))?;

        out_data.extend_from_slice(section_header(name).as_bytes());
        out_data.extend_from_slice(&fragment);
    }

    Ok(out_data)
}

/// Writes `data` to `destination` with the permission bits `mode`.
///
/// The data is written to a temporary sibling file which is then renamed over the destination,
/// so readers never observe a partially written file.
pub fn persist(data: &[u8], destination: &Path, mode: u32) -> Result<(), Error> {
    let io_context = |err: std::io::Error| Error::from(err).context(destination.display().to_string());

    create_parent_dir(destination).map_err(io_context)?;

    let staging = staging_path(destination);
    let written = write_with_mode(&staging, data, mode).and_then(|_| fs::rename(&staging, destination));
    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(io_context(err));
    }

    debug!("wrote {} bytes to {}", data.len(), destination.display());

    Ok(())
}

/// Copies a stored template verbatim to `destination`.
///
/// Nothing is written when the template doesn't exist.
pub fn use_template(template: &Path, destination: &Path, mode: u32) -> Result<(), Error> {
    if !template.is_file() {
        return Err(Error::from(ErrorKind::MissingTemplate).context(template.display().to_string()));
    }

    let data =
        fs::read(template).map_err(|err| Error::from(err).context(template.display().to_string()))?;

    persist(&data, destination, mode)
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut file_name = destination
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(format!(".{}.tmp", std::process::id()));

    destination.with_file_name(file_name)
}

#[cfg(unix)]
fn write_with_mode(path: &Path, data: &[u8], mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    file.write_all(data)?;

    // The process umask applies on creation.
    file.set_permissions(fs::Permissions::from_mode(mode))?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_with_mode(path: &Path, data: &[u8], _mode: u32) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
