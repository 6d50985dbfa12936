// * optional settings file, ~/.pingsweep/config.toml unless --config says otherwise
use std::path::{Path, PathBuf};

use config_file::FromConfigFile;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SweepError};

pub const DEFAULT_CONFIG_PATH: &str = "~/.pingsweep/config.toml";
pub const DEFAULT_TIMEOUT_MS: u64 = 200;
pub const DEFAULT_CONFIRM_THRESHOLD: usize = 256;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// fping binary, looked up on PATH when not absolute
    pub fping: String,
    /// ping timeout in milliseconds
    pub timeout: u64,
    /// sweeps larger than this ask for confirmation
    pub confirm_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fping: "fping".to_string(),
            timeout: DEFAULT_TIMEOUT_MS,
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
        }
    }
}

fn load(path: &Path) -> Result<Config> {
    Config::from_config_file(path).map_err(|e| SweepError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// The default location may be absent, in which case defaults apply
pub fn read_default(path: &Path) -> Result<Config> {
    if path.exists() {
        debug!(path = %path.display(), "reading config");
        load(path)
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::default())
    }
}

/// An explicit path must exist; the default one may be absent.
pub fn read_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
            debug!(path = %expanded.display(), "reading config");
            load(&expanded)
        }
        None => read_default(&PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())),
    }
}
