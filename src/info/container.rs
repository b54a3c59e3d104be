//! On-disk layout of the project info file.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::registry::Registry;
use super::time_units::{TimeReference, DEFAULT_TIME_CALENDAR, DEFAULT_TIME_UNITS};
use crate::error::{ProjectError, Result};

/// Conventions attribute written into new containers.
pub const CONVENTIONS: &str = "CF-1.8";

/// Container format version written into new containers.
pub const CONTAINER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Units and calendar of the `created`/`modified` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAxis {
    pub units: String,
    pub calendar: String,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            units: DEFAULT_TIME_UNITS.to_string(),
            calendar: DEFAULT_TIME_CALENDAR.to_string(),
        }
    }
}

/// The two registry groups, plus any group written by a newer version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Groups {
    #[serde(default)]
    pub raws: Registry,
    #[serde(default)]
    pub products: Registry,
    #[serde(flatten)]
    pub unknown_groups: HashMap<String, serde_json::Value>,
}

/// What is read from disk; any attribute may be missing.
#[derive(Debug, Default, Deserialize)]
struct StoredContainer {
    #[serde(rename = "Conventions")]
    conventions: Option<String>,
    version: Option<String>,
    time: Option<TimeAxis>,
    created: Option<f64>,
    modified: Option<f64>,
    #[serde(default)]
    groups: Groups,
    #[serde(flatten)]
    unknown_fields: HashMap<String, serde_json::Value>,
}

/// The container with every baseline attribute present.
#[derive(Debug, Clone, Serialize)]
pub struct InfoContainer {
    #[serde(rename = "Conventions")]
    pub conventions: String,
    pub version: String,
    pub time: TimeAxis,
    pub created: f64,
    pub modified: f64,
    pub groups: Groups,
    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl InfoContainer {
    /// A fresh container stamped with the current time.
    pub fn new() -> Result<Self> {
        Self::with_baseline(StoredContainer::default())
    }

    /// Read a container, filling in any missing baseline attribute.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ProjectError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let stored: StoredContainer = serde_json::from_reader(BufReader::new(file))?;
        Self::with_baseline(stored)
    }

    /// Write the container to `path`.
    ///
    /// The content goes to a sibling `.tmp` file first and is renamed over
    /// `path`, so an interrupted write leaves the previous file intact.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProjectError::DirectoryCreateError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content).map_err(|e| ProjectError::FileWriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(ProjectError::FileWriteError {
                path: path.to_path_buf(),
                source: e,
            });
        }

        Ok(())
    }

    pub fn time_reference(&self) -> Result<TimeReference> {
        TimeReference::parse(&self.time.units, &self.time.calendar)
    }

    /// Stamp `modified` with the current time.
    pub fn touch(&mut self) -> Result<()> {
        self.modified = self.time_reference()?.to_num(Utc::now());
        Ok(())
    }

    fn with_baseline(stored: StoredContainer) -> Result<Self> {
        let time = stored.time.unwrap_or_default();
        let now = TimeReference::parse(&time.units, &time.calendar)?.to_num(Utc::now());
        let created = stored.created.unwrap_or(now);

        Ok(Self {
            conventions: stored.conventions.unwrap_or_else(|| CONVENTIONS.to_string()),
            version: stored.version.unwrap_or_else(|| CONTAINER_VERSION.to_string()),
            time,
            created,
            modified: stored.modified.unwrap_or(created),
            groups: stored.groups,
            unknown_fields: stored.unknown_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_new_container_has_baseline() {
        let container = InfoContainer::new().unwrap();
        assert_eq!(container.conventions, CONVENTIONS);
        assert_eq!(container.version, CONTAINER_VERSION);
        assert_eq!(container.time, TimeAxis::default());
        assert_eq!(container.created, container.modified);
        assert!(container.groups.raws.is_empty());
        assert!(container.groups.products.is_empty());
    }

    #[test]
    fn test_read_fills_missing_attributes() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("info.json");
        fs::write(
            &path,
            r#"{"version": "0.0.9", "created": 100.0, "time": {"units": "days since 2000-01-01", "calendar": "standard"}}"#,
        )
        .unwrap();

        let container = InfoContainer::read(&path).unwrap();
        assert_eq!(container.version, "0.0.9");
        assert_eq!(container.conventions, CONVENTIONS);
        assert_eq!(container.created, 100.0);
        assert_eq!(container.modified, 100.0);
        assert_eq!(container.time.units, "days since 2000-01-01");
        assert!(container.groups.raws.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("info.json");
        fs::write(
            &path,
            r#"{"history": "made by hand", "groups": {"notes": {"variables": {}}}}"#,
        )
        .unwrap();

        let container = InfoContainer::read(&path).unwrap();
        container.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["history"], "made by hand");
        assert!(value["groups"]["notes"].is_object());
        assert!(value["groups"]["raws"].is_object());
        assert!(value["groups"]["products"].is_object());
    }

    #[test]
    fn test_read_corrupted_file() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("info.json");
        fs::write(&path, "not json").unwrap();

        let err = InfoContainer::read(&path).unwrap_err();
        assert!(matches!(err, ProjectError::JsonSerializationError(_)));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("info.json");

        InfoContainer::new().unwrap().write(&path).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("info.json.tmp").exists());
        assert!(InfoContainer::read(&path).is_ok());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("info.json");
        fs::create_dir(&path).unwrap();

        let err = InfoContainer::new().unwrap().write(&path).unwrap_err();
        assert!(matches!(err, ProjectError::FileWriteError { .. }));
        assert!(path.is_dir());
        assert!(!temp_dir.path().join("info.json.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_content() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("info.json");
        let container = InfoContainer::new().unwrap();
        container.write(&path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // the temp file slot is taken by a directory, so the write cannot start
        fs::create_dir(temp_dir.path().join("info.json.tmp")).unwrap();
        let mut changed = container.clone();
        changed.version = "9.9.9".to_string();
        assert!(changed.write(&path).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
