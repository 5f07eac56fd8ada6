// SPDX-License-Identifier: MIT

//! The `state` module defines the cached templates' state struct, trait & method implementations.

use std::error::Error as StdErr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Constant specifying the name of the state file within the data directory.
const STATE_FILE_NAME: &str = ".state";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// `struct` containing identifiers on the state of the locally cached templates.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct State {
    /// Absolute path to the state file (not for the user).
    #[serde(skip)]
    path: PathBuf,

    /// Timestamp of the last successful `update`.
    pub last_update: Option<SystemTime>,
}

/// Method implementations for [`State`].
impl State {
    /// Parses the state file within `data_dir` & generates a [`State`] item.
    ///
    /// A missing or unreadable state file yields a fresh [`State`]; nothing is written.
    pub fn load(data_dir: &Path) -> Result<State, Box<dyn StdErr>> {
        let path = data_dir.join(STATE_FILE_NAME);

        if !path.is_file() {
            debug!("no state file at: {}", path.display());
            return Ok(State {
                path,
                last_update: None,
            });
        }

        let state_content = fs::read_to_string(&path)?;
        let state = match toml::from_str::<State>(state_content.trim()) {
            Ok(state) => State { path, ..state },
            Err(err) => {
                warn!("ignoring invalid state file {}: {}", path.display(), err);
                State {
                    path,
                    last_update: None,
                }
            }
        };
        debug!("done parsing state file, state: {:#?}", state);

        Ok(state)
    }

    /// Checks whether the cached templates should be refreshed.
    pub fn is_stale(&self, now: &SystemTime, stale_after_days: u64) -> bool {
        match self.last_update {
            None => true,
            Some(last_update) => {
                let max_age = Duration::from_secs(stale_after_days.saturating_mul(SECONDS_PER_DAY));

                now.duration_since(last_update)
                    .map(|age| age > max_age)
                    .unwrap_or(false)
            }
        }
    }

    /// Saves the contents of the current [`State`] to the state file.
    pub fn save_file(&self) -> Result<(), Box<dyn StdErr>> {
        use crate::utils::create_parent_dir;

        debug!("updating file: {}", self.path.display());

        create_parent_dir(&self.path)?;
        fs::write(&self.path, toml::to_string(&self)?)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_state_is_not_created() {
        let root = TempDir::new().unwrap();

        let state = State::load(root.path()).unwrap();

        assert_eq!(state.last_update, None);
        assert!(!root.path().join(STATE_FILE_NAME).exists());
    }

    #[test]
    fn saved_state_is_reloaded() {
        let root = TempDir::new().unwrap();
        let mut state = State::load(root.path()).unwrap();
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        state.last_update = Some(now);
        state.save_file().unwrap();

        assert_eq!(State::load(root.path()).unwrap().last_update, Some(now));
    }

    #[test]
    fn staleness() {
        let now = SystemTime::now();
        let day = Duration::from_secs(SECONDS_PER_DAY);

        let never = State::default();
        let fresh = State {
            last_update: Some(now - day),
            ..State::default()
        };
        let old = State {
            last_update: Some(now - day * 31),
            ..State::default()
        };

        assert!(never.is_stale(&now, 30));
        assert!(!fresh.is_stale(&now, 30));
        assert!(old.is_stale(&now, 30));
    }

    #[test]
    fn huge_threshold_never_goes_stale() {
        let now = SystemTime::now();
        let state = State {
            last_update: Some(now - Duration::from_secs(SECONDS_PER_DAY * 3650)),
            ..State::default()
        };

        assert!(!state.is_stale(&now, u64::MAX / 1000));
        assert!(!state.is_stale(&now, u64::MAX));
    }
}
