//! Loading, closing and saving layers.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, error, warn};

use super::{LayerIndex, Project};
use crate::source::{FormatType, Layer, LayerKey, LayerType};

impl Project {
    /// Whether `path` is a variable-resolution BAG.
    pub fn is_vr(&self, path: &Path) -> bool {
        let layer_formats = match self.resolver.classify(path, LayerType::Unknown) {
            Ok(layer_formats) => layer_formats,
            Err(e) => {
                debug!("unable to classify {}: {}", path.display(), e);
                return false;
            }
        };

        match layer_formats.values().next() {
            Some(FormatType::Bag) => self.resolver.is_vr(path),
            _ => false,
        }
    }

    pub fn index(&self) -> &LayerIndex {
        &self.index
    }

    /// Loaded keys grouped by basename for display.
    pub fn ordered_layers_list(&self) -> Vec<LayerKey> {
        self.index.ordered_keys()
    }

    pub fn layer_keys_by_basename(&self, basename: &str) -> Vec<LayerKey> {
        self.index.keys_by_basename(basename)
    }

    pub fn other_raster_layers_for_key(&self, layer_key: &str) -> Vec<&dyn Layer> {
        self.index.other_raster_layers_for_key(layer_key)
    }

    /// Load the layers contained in `path`.
    ///
    /// `hint_type` narrows the classification; types listed in
    /// `exclude_types` are not loaded. A key that is already loaded is
    /// closed first. Layers the resolver fails to decode are skipped with a
    /// warning.
    ///
    /// Returns true when at least one layer was registered.
    ///
    /// Behavior change: a load that got past decoding used to report true
    /// even when no layer was registered; it now reports false.
    pub fn load_from_source(
        &mut self,
        path: &Path,
        hint_type: LayerType,
        exclude_types: &[LayerType],
    ) -> bool {
        let mut layer_formats = match self.resolver.classify(path, hint_type) {
            Ok(layer_formats) => layer_formats,
            Err(e) => {
                error!("unable to classify {}: {}", path.display(), e);
                return false;
            }
        };

        if !exclude_types.is_empty() {
            debug!("filtering data types: {:?}", exclude_types);
            layer_formats.retain(|layer_type, _| !exclude_types.contains(layer_type));
        }

        self.progress
            .start("Loading", "Ongoing loading. Please wait!", 10.0);

        // all the layers in a source share its format
        let layer_types: Vec<LayerType> = layer_formats.keys().copied().collect();
        let input_format = layer_formats
            .values()
            .next()
            .copied()
            .unwrap_or_default();

        let mut actual_layers = match self.resolver.decode(path, &layer_types, input_format) {
            Ok(actual_layers) => actual_layers,
            Err(e) => {
                error!("unable to load {}: {}", path.display(), e);
                self.progress.end();
                return false;
            }
        };

        self.progress.update(60.0);

        let progress_quantum = 40.0 / (layer_types.len() + 1) as f64;
        let mut loaded = 0;

        for layer_type in layer_types {
            let layer_key = self.resolver.layer_key(path, layer_type);
            debug!("raster key: {}", layer_key);

            self.index.close(layer_key.as_str());

            let Some(layer) = actual_layers.shift_remove(&layer_type) else {
                warn!("skipping unretrieved {} layer", layer_type);
                continue;
            };

            self.index.insert(layer_key, layer, path.to_path_buf());
            loaded += 1;

            self.progress.add(progress_quantum);
        }

        self.progress.end();
        loaded > 0
    }

    pub fn has_layers(&self) -> bool {
        self.index.has_layers()
    }

    pub fn has_modified_layers(&self) -> bool {
        self.index.has_modified_layers()
    }

    /// Close a single layer. Returns false if it was not loaded.
    pub fn close_layer_by_key(&mut self, layer_key: &str) -> bool {
        self.index.close(layer_key)
    }

    /// Close every layer loaded from a file with this basename.
    pub fn close_layer_by_basename(&mut self, layer_basename: &str) -> bool {
        self.index.close_by_basename(layer_basename)
    }

    /// Close all the layers and clear the temp folder.
    pub fn close_layers(&mut self) {
        self.index.clear();
        self.clear_temp_folder();
    }

    /// Save the source behind `layer_key` to `output_path`.
    ///
    /// The source file (and its `.prj` sidecar, if any) is copied first,
    /// then every layer sharing the key's basename is handed to the
    /// resolver. Copied files are left in place when a later step fails.
    ///
    /// Behavior change: the resolver's result is returned instead of an
    /// unconditional true once the resolver was called.
    pub fn save_layer_by_key(&self, layer_key: &str, output_path: &Path, open_folder: bool) -> bool {
        let Some(input_path) = self.index.path(layer_key) else {
            warn!("missing layer key: {}", layer_key);
            return false;
        };

        if let Err(e) = copy_source(input_path, output_path) {
            error!(
                "unable to copy from {} to {} -> {}",
                input_path.display(),
                output_path.display(),
                e
            );
            return false;
        }

        let layer_key = LayerKey::from(layer_key);
        let layer_basename = layer_key.basename();
        debug!(
            "saving {} with keys {:?}",
            layer_basename,
            self.index.keys_by_basename(layer_basename)
        );

        let (output_layers, output_format) = self.index.layers_for_basename(layer_basename);
        let Some(output_format) = output_format else {
            warn!("no layers to save");
            return false;
        };

        let saved = match self.resolver.save(output_path, &output_layers, output_format) {
            Ok(saved) => saved,
            Err(e) => {
                error!("unable to save {}: {}", output_path.display(), e);
                false
            }
        };

        if open_folder && saved {
            if let Some(output_folder) = output_path.parent() {
                self.explorer.explore(output_folder);
            }
        }

        saved
    }
}

/// Copy `input_path` to `output_path`, along with a sibling `.prj` file.
///
/// Copying a file onto itself is refused for the source and skipped for the
/// sidecar.
fn copy_source(input_path: &Path, output_path: &Path) -> io::Result<()> {
    if is_same_file(input_path, output_path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        ));
    }
    fs::copy(input_path, output_path)?;

    let prj_path = input_path.with_extension("prj");
    if prj_path.exists() {
        if let Some(prj_name) = prj_path.file_name() {
            let output_folder = output_path.parent().unwrap_or_else(|| Path::new(""));
            let prj_output = output_folder.join(prj_name);
            if is_same_file(&prj_path, &prj_output) {
                debug!("projection file already in place: {}", prj_output.display());
            } else {
                fs::copy(&prj_path, prj_output)?;
            }
        }
    }

    Ok(())
}

/// Whether both paths resolve to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
