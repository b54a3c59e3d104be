//! Project Info
//!
//! Persists the project bookkeeping in `info.json` inside the project
//! directory: conventions, version, creation and modification timestamps,
//! and the `raws` and `products` registries.
//!
//! Registry entries are keyed by the SHA-256 of the normalized source path,
//! so the same file always maps to the same entry.

mod container;
mod registry;
pub mod time_units;

use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::progress::{LogProgress, Progress};

pub use container::{TimeAxis, CONTAINER_VERSION, CONVENTIONS};
pub use registry::{AddOutcome, EntryState, Registry, RegistryEntry, RegistryKind};

use container::InfoContainer;

/// Name of the info file inside the project directory.
pub const INFO_FILE: &str = "info.json";

/// Metadata store of a project directory.
pub struct ProjectInfo {
    path: PathBuf,
    container: InfoContainer,
    progress: Box<dyn Progress>,
}

impl ProjectInfo {
    /// Open the info file of `project_path`, creating it if missing.
    ///
    /// Baseline attributes and the registry groups are added when absent;
    /// existing values are kept.
    pub fn open(project_path: &Path) -> Result<Self> {
        let path = project_path.join(INFO_FILE);

        let (open_mode, container) = if path.exists() {
            ("a", InfoContainer::read(&path)?)
        } else {
            ("w", InfoContainer::new()?)
        };
        container.write(&path)?;

        let info = Self {
            path,
            container,
            progress: Box::new(LogProgress::new()),
        };
        info!(
            "open in '{}' mode: [v.{}] {}",
            open_mode,
            info.version(),
            info.path.display()
        );

        Ok(info)
    }

    /// Replace the progress reporter.
    pub fn with_progress(mut self, progress: Box<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the info file.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn project_path(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn conventions(&self) -> &str {
        &self.container.conventions
    }

    pub fn time_units(&self) -> &str {
        &self.container.time.units
    }

    pub fn time_calendar(&self) -> &str {
        &self.container.time.calendar
    }

    pub fn version(&self) -> &str {
        &self.container.version
    }

    pub fn created(&self) -> Result<DateTime<Utc>> {
        self.container.time_reference()?.to_date(self.container.created)
    }

    pub fn modified(&self) -> Result<DateTime<Utc>> {
        self.container.time_reference()?.to_date(self.container.modified)
    }

    pub fn raws(&self) -> &Registry {
        &self.container.groups.raws
    }

    pub fn products(&self) -> &Registry {
        &self.container.groups.products
    }

    /// Registry targeted by `kind`.
    pub fn registry(&self, kind: RegistryKind) -> &Registry {
        match kind {
            RegistryKind::Raw => self.raws(),
            RegistryKind::Product => self.products(),
        }
    }

    /// Stamp the modification time and write the file.
    pub fn updated(&mut self) -> Result<()> {
        self.container.touch()?;
        self.container.write(&self.path)
    }

    /// SHA-256 hex digest of `input`.
    pub fn hash_string(input: &str) -> String {
        format!("{:x}", Sha256::digest(input.as_bytes()))
    }

    // ### RAWS ###

    pub fn valid_raws(&self) -> Vec<String> {
        self.raws().valid_keys()
    }

    pub fn add_raw(&mut self, path: &Path) -> Result<bool> {
        self.add_entry(RegistryKind::Raw, path)
    }

    pub fn remove_raw(&mut self, path: &Path) -> Result<bool> {
        self.remove_entry(RegistryKind::Raw, path)
    }

    // ### PRODUCTS ###

    pub fn valid_products(&self) -> Vec<String> {
        self.products().valid_keys()
    }

    pub fn add_product(&mut self, path: &Path) -> Result<bool> {
        self.add_entry(RegistryKind::Product, path)
    }

    pub fn remove_product(&mut self, path: &Path) -> Result<bool> {
        self.remove_entry(RegistryKind::Product, path)
    }

    fn registry_mut(&mut self, kind: RegistryKind) -> &mut Registry {
        match kind {
            RegistryKind::Raw => &mut self.container.groups.raws,
            RegistryKind::Product => &mut self.container.groups.products,
        }
    }

    fn add_entry(&mut self, kind: RegistryKind, path: &Path) -> Result<bool> {
        self.progress
            .start("Reading", "Ongoing reading. Please wait!", 10.0);

        let path = normalize_path(path);
        if !path.exists() {
            warn!("The source does not exist: {}", path.display());
            self.progress.end();
            return Ok(false);
        }

        let source_path = path.to_string_lossy().into_owned();
        let path_hash = Self::hash_string(&source_path);

        match self.registry_mut(kind).add(path_hash, source_path.clone()) {
            AddOutcome::Added => debug!("{} entry was added: {}", kind, source_path),
            AddOutcome::Refreshed => debug!("{} entry was refreshed: {}", kind, source_path),
            AddOutcome::Reactivated => info!("{} entry was restored: {}", kind, source_path),
        }

        let written = self.container.write(&self.path);
        self.progress.end();
        written.map(|_| true)
    }

    fn remove_entry(&mut self, kind: RegistryKind, path: &Path) -> Result<bool> {
        self.progress
            .start("Deleting", "Ongoing deleting. Please wait!", 10.0);

        let source_path = normalize_path(path).to_string_lossy().into_owned();
        let path_hash = Self::hash_string(&source_path);

        if !self.registry_mut(kind).remove(&path_hash) {
            info!("{} entry already removed: {}", kind, source_path);
            self.progress.end();
            return Ok(false);
        }
        debug!("{} entry removed: {}", kind, source_path);

        self.progress.update(40.0);
        let written = self.container.write(&self.path);
        self.progress.end();
        written.map(|_| true)
    }
}

impl fmt::Display for ProjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show_time = |time: Result<DateTime<Utc>>| match time {
            Ok(time) => time.to_rfc3339(),
            Err(e) => format!("invalid ({})", e),
        };

        writeln!(f, "<ProjectInfo>")?;
        writeln!(f, "  <name: {}>", self.name())?;
        writeln!(f, "  <project path: {}>", self.project_path().display())?;
        writeln!(f, "  <conventions: {}>", self.conventions())?;
        writeln!(f, "  <time: {} [{}]>", self.time_units(), self.time_calendar())?;
        writeln!(f, "  <version: {}>", self.version())?;
        writeln!(f, "  <created: {}>", show_time(self.created()))?;
        writeln!(f, "  <modified: {}>", show_time(self.modified()))?;
        for kind in [RegistryKind::Raw, RegistryKind::Product] {
            let registry = self.registry(kind);
            writeln!(f, "  <{}: {}>", kind.group_name(), registry.len())?;
            for (key, entry) in registry.iter() {
                writeln!(
                    f,
                    "    <{}[D{}]: {}>",
                    key,
                    u8::from(entry.is_deleted()),
                    entry.source_path
                )?;
            }
        }
        Ok(())
    }
}

/// Lexically normalize `path`: drop `.` components and fold `..` into the
/// preceding component. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
