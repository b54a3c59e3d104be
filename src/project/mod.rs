//! Project Workspace
//!
//! A project owns an output folder (with `temp/` and `export/` subfolders
//! created on demand) and the index of the layers currently loaded.

mod index;
mod layers;

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::error::{ProjectError, Result};
use crate::explorer::{FolderExplorer, SystemExplorer};
use crate::progress::{LogProgress, Progress};
use crate::source::SourceTypeResolver;

pub use index::LayerIndex;

/// Scratch subfolder, cleared when all layers are closed.
pub const TEMP_DIR: &str = "temp";
/// Export subfolder.
pub const EXPORT_DIR: &str = "export";
/// Folder name used under the user data directory by default.
pub const DEFAULT_FOLDER_NAME: &str = "bathy-project";

/// A workspace of loaded layers.
pub struct Project {
    output_folder: PathBuf,
    resolver: Box<dyn SourceTypeResolver>,
    progress: Box<dyn Progress>,
    explorer: Box<dyn FolderExplorer>,
    index: LayerIndex,
}

impl Project {
    /// Create a project writing into `output_folder`.
    ///
    /// Falls back to [`Project::default_output_folder`] when no folder is
    /// given or the given one does not exist.
    pub fn new(output_folder: Option<&Path>, resolver: Box<dyn SourceTypeResolver>) -> Result<Self> {
        let output_folder = match output_folder {
            Some(folder) if folder.exists() => folder.to_path_buf(),
            _ => {
                let folder = Self::default_output_folder()?;
                debug!("using default output folder: {}", folder.display());
                folder
            }
        };

        Ok(Self {
            output_folder,
            resolver,
            progress: Box::new(LogProgress::new()),
            explorer: Box::new(SystemExplorer),
            index: LayerIndex::new(),
        })
    }

    /// Create a project from a loaded configuration.
    pub fn from_config(config: &ProjectConfig, resolver: Box<dyn SourceTypeResolver>) -> Result<Self> {
        Self::new(config.output_folder.as_deref(), resolver)
    }

    /// Replace the progress reporter.
    pub fn with_progress(mut self, progress: Box<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the folder explorer.
    pub fn with_explorer(mut self, explorer: Box<dyn FolderExplorer>) -> Self {
        self.explorer = explorer;
        self
    }

    /// `<user data dir>/bathy-project`, created if missing.
    pub fn default_output_folder() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);
        let output_folder = base.join(DEFAULT_FOLDER_NAME);
        create_folder(&output_folder)?;
        Ok(output_folder)
    }

    // ### OUTPUT FOLDER ###

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Point the project at another existing folder.
    pub fn set_output_folder(&mut self, output_folder: &Path) -> Result<()> {
        if !output_folder.exists() {
            return Err(ProjectError::InvalidOutputFolder {
                path: output_folder.to_path_buf(),
            });
        }
        self.output_folder = output_folder.to_path_buf();
        Ok(())
    }

    pub fn open_output_folder(&self) {
        self.explorer.explore(&self.output_folder);
    }

    // ### TEMP FOLDER ###

    pub fn temp_folder(&self) -> Result<PathBuf> {
        let temp_folder = self.output_folder.join(TEMP_DIR);
        create_folder(&temp_folder)?;
        Ok(temp_folder)
    }

    pub fn is_temp_folder_empty(&self) -> Result<bool> {
        let temp_folder = self.temp_folder()?;
        Ok(WalkDir::new(&temp_folder)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .next()
            .is_none())
    }

    /// Remove the scratch folder and its content.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn clear_temp_folder(&self) {
        match self.is_temp_folder_empty() {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                warn!("unable to inspect the temp folder: {}", e);
                return;
            }
        }

        let temp_folder = self.output_folder.join(TEMP_DIR);
        match fs::remove_dir_all(&temp_folder) {
            Ok(()) => debug!("cleared: {}", temp_folder.display()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                info!("unable to clean the temp folder: {}", e);
            }
            Err(e) => warn!("unable to clean the temp folder: {}", e),
        }
    }

    // ### EXPORT FOLDER ###

    pub fn export_folder(&self) -> Result<PathBuf> {
        let export_folder = self.output_folder.join(EXPORT_DIR);
        create_folder(&export_folder)?;
        Ok(export_folder)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Project>")?;
        writeln!(f, "  <output folder: {}>", self.output_folder.display())?;
        writeln!(
            f,
            "  <temp folder: {}>",
            self.output_folder.join(TEMP_DIR).display()
        )?;
        writeln!(f, "  <layers: {}>", self.index.len())
    }
}

fn create_folder(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| ProjectError::DirectoryCreateError {
        path: path.to_path_buf(),
        source: e,
    })
}
