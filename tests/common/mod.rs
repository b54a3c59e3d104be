//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bathy_project::explorer::FolderExplorer;
use bathy_project::progress::Progress;
use bathy_project::source::{DecodedLayers, LayerFormats, OutputLayers};
use bathy_project::{FormatType, Layer, LayerType, ProjectError, Result, SourceTypeResolver};

/// A decoded layer that only remembers where it came from.
#[derive(Debug)]
pub struct MockLayer {
    pub layer_type: LayerType,
    pub format_type: FormatType,
    pub source: PathBuf,
    pub modified: bool,
    pub raster: bool,
}

impl Layer for MockLayer {
    fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    fn format_type(&self) -> FormatType {
        self.format_type
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn is_raster(&self) -> bool {
        self.raster
    }
}

/// One call to [`MockResolver::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveCall {
    pub path: PathBuf,
    pub layer_types: Vec<LayerType>,
    pub format: FormatType,
}

/// Resolver classifying by extension:
/// - `.bag`: bathymetry, uncertainty and designated (designated is vector)
/// - `.tif`, `.asc`: bathymetry only
///
/// Files whose stem starts with `broken` fail to classify.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    /// Types the decoder silently fails to return.
    pub undecodable: Vec<LayerType>,
    /// Types decoded with the dirty flag set.
    pub modified: Vec<LayerType>,
    /// Value returned by `save`.
    pub save_result: bool,
    /// Whether BAG files report variable resolution.
    pub vr: bool,
    pub decoded: Rc<RefCell<Vec<(PathBuf, Vec<LayerType>, FormatType)>>>,
    pub saves: Rc<RefCell<Vec<SaveCall>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            save_result: true,
            ..Self::default()
        }
    }
}

impl SourceTypeResolver for MockResolver {
    fn classify(&self, path: &Path, hint: LayerType) -> Result<LayerFormats> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.starts_with("broken") {
            return Err(ProjectError::SourceError {
                path: path.to_path_buf(),
                reason: "unreadable header".to_string(),
            });
        }

        let format = FormatType::from_path(path);
        let types: &[LayerType] = match format {
            FormatType::Bag => &[
                LayerType::Bathymetry,
                LayerType::Uncertainty,
                LayerType::Designated,
            ],
            FormatType::GeoTiff | FormatType::AsciiGrid => &[LayerType::Bathymetry],
            FormatType::Unknown => &[],
        };

        Ok(types
            .iter()
            .filter(|t| hint == LayerType::Unknown || **t == hint)
            .map(|t| (*t, format))
            .collect())
    }

    fn decode(
        &self,
        path: &Path,
        layer_types: &[LayerType],
        format: FormatType,
    ) -> Result<DecodedLayers> {
        self.decoded
            .borrow_mut()
            .push((path.to_path_buf(), layer_types.to_vec(), format));

        Ok(layer_types
            .iter()
            .filter(|t| !self.undecodable.contains(*t))
            .map(|t| {
                let layer = MockLayer {
                    layer_type: *t,
                    format_type: format,
                    source: path.to_path_buf(),
                    modified: self.modified.contains(t),
                    raster: *t != LayerType::Designated,
                };
                (*t, Box::new(layer) as Box<dyn Layer>)
            })
            .collect())
    }

    fn save(&self, path: &Path, layers: &OutputLayers<'_>, format: FormatType) -> Result<bool> {
        self.saves.borrow_mut().push(SaveCall {
            path: path.to_path_buf(),
            layer_types: layers.keys().copied().collect(),
            format,
        });
        Ok(self.save_result)
    }

    fn is_vr(&self, _path: &Path) -> bool {
        self.vr
    }
}

/// Progress reporter recording every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    pub events: Rc<RefCell<Vec<String>>>,
}

impl Progress for RecordingProgress {
    fn start(&mut self, title: &str, _text: &str, init_value: f64) {
        self.events
            .borrow_mut()
            .push(format!("start {} {:.0}", title, init_value));
    }

    fn update(&mut self, value: f64) {
        self.events.borrow_mut().push(format!("update {:.0}", value));
    }

    fn add(&mut self, quantum: f64) {
        self.events.borrow_mut().push(format!("add {:.2}", quantum));
    }

    fn end(&mut self) {
        self.events.borrow_mut().push("end".to_string());
    }
}

/// Folder explorer recording every revealed folder.
#[derive(Debug, Clone, Default)]
pub struct RecordingExplorer {
    pub explored: Rc<RefCell<Vec<PathBuf>>>,
}

impl FolderExplorer for RecordingExplorer {
    fn explore(&self, path: &Path) {
        self.explored.borrow_mut().push(path.to_path_buf());
    }
}

/// Write a placeholder source file and return its path.
pub fn write_source(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("source bytes of {}", name)).unwrap();
    path
}
