//! On-disk layout under the data directory
//!
//! ```text
//! ~/.pocket-battle/
//!   config.toml
//!   pokemon.db
//!   logs/pocket-battle.log
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DEFAULT_DIR_NAME: &str = ".pocket-battle";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// A file kept under the data directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    Config,
    Database,
    Log,
}

impl DataFile {
    fn relative(self) -> &'static Path {
        Path::new(match self {
            DataFile::Config => "config.toml",
            DataFile::Database => "pokemon.db",
            DataFile::Log => "logs/pocket-battle.log",
        })
    }

    /// Location of this file under `root`
    pub fn path_in(self, root: &Path) -> PathBuf {
        root.join(self.relative())
    }

    /// Location of this file under the active data directory
    pub fn path(self) -> PathBuf {
        self.path_in(&data_dir())
    }
}

/// Point the data directory somewhere other than `~/.pocket-battle`.
/// Only the first override sticks; call it before anything reads a path.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let Some(path) = custom_path else {
        return;
    };
    if let Err(rejected) = DATA_DIR.set(path) {
        tracing::warn!(
            rejected = %rejected.display(),
            active = %data_dir().display(),
            "Data directory already set, ignoring override"
        );
    }
}

/// Active data directory: the override if one was set, else `~/.pocket-battle`
pub fn data_dir() -> PathBuf {
    match DATA_DIR.get() {
        Some(dir) => dir.clone(),
        None => dirs::home_dir().unwrap_or_default().join(DEFAULT_DIR_NAME),
    }
}
