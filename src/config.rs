//! Project configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, Result};
use crate::logging::LogConfig;

/// Settings an application reads before opening a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Output folder; the default output folder is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,

    /// Logger settings.
    pub log: LogConfig,
}

impl ProjectConfig {
    /// Read a JSON configuration. Missing fields take their default.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ProjectError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ProjectError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
