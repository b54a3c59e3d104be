//! Layer and storage format types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Role of a decoded raster within its source file.
///
/// Each variant has a fixed three-letter token used in layer keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerType {
    #[default]
    Unknown,
    Bathymetry,
    Uncertainty,
    Designated,
    Mosaic,
}

impl LayerType {
    /// All layer types, in token order.
    pub const ALL: [LayerType; 5] = [
        LayerType::Unknown,
        LayerType::Bathymetry,
        LayerType::Uncertainty,
        LayerType::Designated,
        LayerType::Mosaic,
    ];

    /// Token used as the first component of a layer key.
    pub fn token(&self) -> &'static str {
        match self {
            LayerType::Unknown => "UNK",
            LayerType::Bathymetry => "BAT",
            LayerType::Uncertainty => "UNC",
            LayerType::Designated => "DES",
            LayerType::Mosaic => "MOS",
        }
    }

    /// Look up a layer type from its key token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == token)
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Storage format a layer was decoded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatType {
    #[default]
    Unknown,
    Bag,
    GeoTiff,
    AsciiGrid,
}

impl FormatType {
    /// Formats with a known file extension.
    pub const KNOWN: [FormatType; 3] = [FormatType::Bag, FormatType::GeoTiff, FormatType::AsciiGrid];

    /// Guess the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        Self::KNOWN
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
            .unwrap_or_default()
    }

    /// File extensions associated with this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FormatType::Unknown => &[],
            FormatType::Bag => &["bag"],
            FormatType::GeoTiff => &["tif", "tiff"],
            FormatType::AsciiGrid => &["asc"],
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatType::Unknown => "Unknown",
            FormatType::Bag => "BAG",
            FormatType::GeoTiff => "GeoTIFF",
            FormatType::AsciiGrid => "ASCII Grid",
        };
        f.write_str(name)
    }
}
