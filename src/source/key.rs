//! Composite layer keys of the form `"<TYPE_TOKEN>:<basename>"`.

use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::LayerType;

/// Separator between the type token and the basename.
pub const KEY_SEPARATOR: char = ':';

/// Identifier of a layer inside a project, e.g. `"BAT:survey1"`.
///
/// The basename is the stem of the source file, so sibling layers decoded
/// from the same file share it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerKey(String);

impl LayerKey {
    /// Build a key from a layer type and a basename.
    pub fn new(layer_type: LayerType, basename: &str) -> Self {
        Self(format!("{}{}{}", layer_type.token(), KEY_SEPARATOR, basename))
    }

    /// Build the key for `layer_type` decoded from the file at `path`.
    pub fn from_path(path: &Path, layer_type: LayerType) -> Self {
        let basename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(layer_type, &basename)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type token (text before the first separator).
    pub fn token(&self) -> &str {
        match self.0.split_once(KEY_SEPARATOR) {
            Some((token, _)) => token,
            None => &self.0,
        }
    }

    /// The basename (text after the first separator).
    pub fn basename(&self) -> &str {
        match self.0.split_once(KEY_SEPARATOR) {
            Some((_, basename)) => basename,
            None => &self.0,
        }
    }

    /// The layer type named by the token, if it is a known one.
    pub fn layer_type(&self) -> Option<LayerType> {
        LayerType::from_token(self.token())
    }

    pub fn is_bathymetry(&self) -> bool {
        self.token() == LayerType::Bathymetry.token()
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for LayerKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for LayerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LayerKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
