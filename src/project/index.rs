//! Layer Index
//!
//! Three parallel collections describe the loaded layers: the layer objects
//! by key, the source path by key, and the list of keys in load order.
//! Every mutation goes through this type so a key is either present in all
//! three or in none.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::source::{FormatType, Layer, LayerKey, LayerType, OutputLayers};

/// In-memory index of the loaded layers.
#[derive(Debug, Default)]
pub struct LayerIndex {
    pub(super) layers: HashMap<LayerKey, Box<dyn Layer>>,
    pub(super) paths: HashMap<LayerKey, PathBuf>,
    pub(super) keys: Vec<LayerKey>,
}

impl LayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers by key.
    pub fn layers(&self) -> &HashMap<LayerKey, Box<dyn Layer>> {
        &self.layers
    }

    /// Source paths by key.
    pub fn layer_paths(&self) -> &HashMap<LayerKey, PathBuf> {
        &self.paths
    }

    /// Keys in load order.
    pub fn keys(&self) -> &[LayerKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.layers.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&dyn Layer> {
        self.layers.get(key).map(|layer| layer.as_ref())
    }

    /// Source path the layer was loaded from.
    pub fn path(&self, key: &str) -> Option<&Path> {
        self.paths.get(key).map(PathBuf::as_path)
    }

    /// Register `layer` under `key`, replacing any previous entry.
    ///
    /// Returns the evicted layer, if any. The key is appended to the end of
    /// the key list.
    pub fn insert(&mut self, key: LayerKey, layer: Box<dyn Layer>, path: PathBuf) -> Option<Box<dyn Layer>> {
        let evicted = self.take(key.as_str());

        self.layers.insert(key.clone(), layer);
        self.paths.insert(key.clone(), path);
        self.keys.push(key);

        evicted
    }

    /// Remove `key` from the index. Returns false if it was not loaded.
    pub fn close(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Remove every key sharing `basename`.
    ///
    /// Always returns true, even when nothing matched.
    pub fn close_by_basename(&mut self, basename: &str) -> bool {
        for key in self.keys_by_basename(basename) {
            self.close(key.as_str());
        }
        true
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.paths.clear();
        self.keys.clear();
    }

    /// Keys whose basename is `basename`, in load order.
    pub fn keys_by_basename(&self, basename: &str) -> Vec<LayerKey> {
        self.keys
            .iter()
            .filter(|key| key.basename() == basename)
            .cloned()
            .collect()
    }

    /// Raster layers sharing the basename of `key`, excluding `key` itself.
    pub fn other_raster_layers_for_key(&self, key: &str) -> Vec<&dyn Layer> {
        let basename = LayerKey::from(key).basename().to_string();

        self.keys
            .iter()
            .filter(|other| other.as_str() != key && other.basename() == basename)
            .filter_map(|other| self.get(other.as_str()))
            .filter(|layer| layer.is_raster())
            .collect()
    }

    /// Keys grouped by basename for display.
    ///
    /// The key list is scanned once from the most recent entry backwards.
    /// Each basename gets a bucket in the order first met by that scan; a
    /// bathymetry key goes to the front of its bucket and any other key to
    /// the back. The buckets are then concatenated.
    pub fn ordered_keys(&self) -> Vec<LayerKey> {
        let mut buckets: IndexMap<&str, VecDeque<&LayerKey>> = IndexMap::new();

        for key in self.keys.iter().rev() {
            let bucket = buckets.entry(key.basename()).or_default();
            if key.is_bathymetry() {
                bucket.push_front(key);
            } else {
                bucket.push_back(key);
            }
        }

        buckets.into_values().flatten().cloned().collect()
    }

    /// Layers sharing `basename`, by layer type, with the format of the
    /// last one visited. Later keys win on layer type collisions.
    pub fn layers_for_basename(&self, basename: &str) -> (OutputLayers<'_>, Option<FormatType>) {
        let mut output_layers: IndexMap<LayerType, &dyn Layer> = IndexMap::new();
        let mut output_format = None;

        for key in self.keys_by_basename(basename) {
            let Some(layer) = self.get(key.as_str()) else {
                continue;
            };
            output_layers.insert(layer.layer_type(), layer);
            output_format = Some(layer.format_type());
        }

        (output_layers, output_format)
    }

    pub fn has_layers(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Whether any loaded layer carries unsaved edits.
    pub fn has_modified_layers(&self) -> bool {
        for key in &self.keys {
            if let Some(layer) = self.get(key.as_str()) {
                if layer.is_modified() {
                    debug!("{} was modified", key);
                    return true;
                }
            }
        }
        false
    }

    fn take(&mut self, key: &str) -> Option<Box<dyn Layer>> {
        let layer = self.layers.remove(key)?;
        self.paths.remove(key);
        self.keys.retain(|k| k.as_str() != key);
        Some(layer)
    }
}
