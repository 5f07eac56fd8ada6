// SPDX-License-Identifier: MIT

//! The `configs` module defines elements necessary for the setup and configuration of
//! [`Config`] struct (part of runtime environment).

use std::error::Error as StdErr;
use std::fs::{File, OpenOptions};
use std::io::prelude::*;
use std::path::{Component, Path, PathBuf};

use crate::errors::{Error, ErrorKind};

use serde::{Deserialize, Serialize};

/// Constant specifying the default gitignore template archive to use.
const GITIGNORE_DEFAULT_ARCHIVE: &str =
    "https://github.com/github/gitignore/archive/refs/heads/main.zip";

/// Constant specifying the subdirectory within the system's data directory holding the
/// extracted templates.
const DATA_SUBDIR: &str = "gitignorer";

/// Fallback data directory when the system's data directory is unknown.
const FALLBACK_DATA_DIR: &str = "./gitignorer_data";

/// Number of days after which the cached templates are reported as stale.
const DEFAULT_STALE_AFTER_DAYS: u64 = 30;

const DEFAULT_OUTPUT_FILE: &str = ".gitignore";
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Directory (within the data directory) containing the language fragments.
pub const GITIGNORES_SUBDIR: &str = "gitignores";
/// Directory (within the fragments directory) containing the global fragments.
pub const GLOBAL_SUBDIR: &str = "Global";
/// Directory (within the data directory) containing the stored templates.
pub const TEMPLATES_SUBDIR: &str = "Templates";

/// File suffix of a gitignore fragment.
pub const FRAGMENT_SUFFIX: &str = ".gitignore";
/// File suffix of a stored template.
pub const TEMPLATE_SUFFIX: &str = ".Template.gitignore";

/// `struct` containing the runtime options parsed from a config file.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Absolute path to the config file (not for the user).
    #[serde(skip)]
    path: String,

    /// Template archive options.
    pub archive: ArchiveConfig,

    /// Local filesystem layout options.
    pub paths: PathsConfig,

    /// Generated file options.
    pub output: OutputConfig,
}

/// `struct` containing the config file's template archive options.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct ArchiveConfig {
    /// URL of the zip archive containing gitignore templates.
    pub url: String,

    /// Age (in days) of the cached templates before `update` is suggested.
    pub stale_after_days: u64,
}

/// `struct` containing the config file's local storage options.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory containing the extracted fragments, the stored templates & the state file.
    pub data_dir: PathBuf,
}

/// `struct` containing the config file's output options.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Default destination of `create` & `use-template`.
    pub gitignore_file: PathBuf,

    /// Permission bits of generated gitignore files.
    pub gitignore_mode: u32,

    /// Permission bits of stored templates.
    pub template_mode: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            url: GITIGNORE_DEFAULT_ARCHIVE.to_owned(),
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = match dirs_next::data_dir() {
            Some(mut dir) => {
                dir.push(DATA_SUBDIR);
                dir
            }
            None => PathBuf::from(FALLBACK_DATA_DIR),
        };

        Self { data_dir }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            gitignore_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            gitignore_mode: DEFAULT_FILE_MODE,
            template_mode: DEFAULT_FILE_MODE,
        }
    }
}

/// Layout of the data directory.
impl PathsConfig {
    /// Primary tier: the language fragments.
    pub fn gitignores_dir(&self) -> PathBuf {
        self.data_dir.join(GITIGNORES_SUBDIR)
    }

    /// Global tier: cross-language & tool fragments.
    pub fn global_dir(&self) -> PathBuf {
        self.gitignores_dir().join(GLOBAL_SUBDIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join(TEMPLATES_SUBDIR)
    }

    /// Path of the stored template named `name`.
    ///
    /// The name must be a single plain path component so the template stays within
    /// [`Self::templates_dir`].
    pub fn template_file(&self, name: &str) -> Result<PathBuf, Error> {
        let is_plain = matches!(
            Path::new(name).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        ) && !name.contains(['/', '\\']);

        if !is_plain {
            return Err(Error::from(ErrorKind::InvalidTemplateName).context(name.to_owned()));
        }

        Ok(self.templates_dir().join(format!("{}{}", name, TEMPLATE_SUFFIX)))
    }
}

/// Method implementations for [`Config`].
impl Config {
    /// Parses config file contents & generates a [`Config`] item.
    ///
    /// A missing config file is created with the default values, an unparsable one is backed up
    /// (`<path>.bak`) before falling back to the defaults.
    pub fn load(&mut self, config_file_path: &Path) -> Result<Config, Box<dyn StdErr>> {
        use crate::utils::create_file;

        debug!("parsing config file: {}", config_file_path.display());

        let mut config_string = String::new();

        if !config_file_path.exists() {
            create_file(config_file_path)?;
        }

        let mut config_file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(config_file_path)?;
        self.path = config_file_path.to_string_lossy().into_owned();

        if config_file.read_to_string(&mut config_string).unwrap_or(0) > 0 {
            match toml::from_str::<Config>(config_string.trim()) {
                Ok(cfg) => {
                    debug!("done parsing config file");
                    *self = Config {
                        path: self.path.clone(),
                        ..cfg
                    };
                    return Ok(self.clone());
                }
                Err(err) => {
                    warn!("invalid config file ({}), backing it up", err);
                    std::fs::copy(config_file_path, format!("{}.bak", self.path))?;
                    config_file.set_len(0)?;
                    config_file.rewind()?;
                }
            }
        }

        info!("config file is empty, using default config values");
        self.update_file(&mut config_file)?;
        debug!("config: {:?}", self);

        Ok(self.clone())
    }

    /// Updates the contents of the config file with the current [`Config`].
    fn update_file(&self, config_file: &mut File) -> Result<(), Box<dyn StdErr>> {
        config_file.write_all(toml::to_string(&self)?.as_bytes())?;
        debug!("updated config file");

        Ok(())
    }
}
