//! Source Module
//!
//! Layer types, layer keys, and the resolver that turns source files
//! (BAG, GeoTIFF, ASCII Grid) into decoded layers.
//!
//! The format readers themselves live outside this crate; they plug in
//! through [`SourceTypeResolver`].

mod key;
mod types;

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::Result;

pub use key::{LayerKey, KEY_SEPARATOR};
pub use types::{FormatType, LayerType};

/// Layer types found in a source, with the storage format of each.
pub type LayerFormats = IndexMap<LayerType, FormatType>;

/// Layers decoded from a source, by type.
pub type DecodedLayers = IndexMap<LayerType, Box<dyn Layer>>;

/// Layers handed to the resolver for writing, by type.
pub type OutputLayers<'a> = IndexMap<LayerType, &'a dyn Layer>;

/// A decoded raster or vector surface.
///
/// The project only looks at these few attributes; the data itself is
/// owned by the format reader that produced the layer.
pub trait Layer: fmt::Debug {
    /// Role of this layer (bathymetry, uncertainty, ...).
    fn layer_type(&self) -> LayerType;

    /// Format the layer was read from.
    fn format_type(&self) -> FormatType;

    /// Whether the layer was edited since it was loaded.
    fn is_modified(&self) -> bool;

    /// Whether the layer is a raster grid.
    fn is_raster(&self) -> bool;
}

/// Classifies, decodes and encodes source files.
pub trait SourceTypeResolver {
    /// Determine the layer types contained in `path` and their format.
    ///
    /// When `hint` is not [`LayerType::Unknown`] the result is restricted
    /// to that type.
    fn classify(&self, path: &Path, hint: LayerType) -> Result<LayerFormats>;

    /// Decode `layer_types` from `path`. Types that cannot be decoded are
    /// simply absent from the result.
    fn decode(&self, path: &Path, layer_types: &[LayerType], format: FormatType)
        -> Result<DecodedLayers>;

    /// Write `layers` to `path` using `format`.
    fn save(&self, path: &Path, layers: &OutputLayers<'_>, format: FormatType) -> Result<bool>;

    /// Key under which `layer_type` from `path` is registered.
    fn layer_key(&self, path: &Path, layer_type: LayerType) -> LayerKey {
        LayerKey::from_path(path, layer_type)
    }

    /// Whether `path` is a variable-resolution BAG.
    fn is_vr(&self, path: &Path) -> bool {
        let _ = path;
        false
    }
}
