//! Display preference persistence with file locking.
//!
//! Preferences are a UI concern kept entirely outside the calculation
//! engine. They are stored as JSON next to the rest of the user data and
//! written atomically.

use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

/// Colour theme of the presentation layer
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(Error::Input(format!("unknown theme: {}", other))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

/// User display preferences
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

impl Preferences {
    /// Load preferences from a file with shared locking
    ///
    /// Falls back to the defaults when the file is missing. A file that
    /// cannot be read or parsed also yields the defaults, with a warning.
    pub fn load(path: &Path) -> Self {
        let contents = match read_shared(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No preferences file found, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to read preferences file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<Preferences>(&contents) {
            Ok(prefs) => {
                tracing::debug!("Loaded preferences from {:?}", path);
                prefs
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse preferences file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Save preferences atomically
    ///
    /// Writes a locked temp file in the target directory, syncs it, then
    /// renames it over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "preferences path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Load preferences, modify them, and save them back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut prefs = Self::load(path);
        f(&mut prefs);
        prefs.save(path)?;
        Ok(prefs)
    }
}

/// Read the whole file under a shared lock
fn read_shared(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;
    let mut contents = String::new();
    let read = (&file).read_to_string(&mut contents);
    file.unlock()?;
    read.map(|_| contents)
}
