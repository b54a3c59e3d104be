//! bathy-project - Bathymetric Layer Workspace
//!
//! Keeps track of the raster layers loaded from geospatial sources (BAG,
//! GeoTIFF, ASCII Grid) and persists the project bookkeeping.
//!
//! # Architecture
//!
//! - [`project::Project`]: output/temp/export folders plus a [`project::LayerIndex`]
//!   keyed by `"<TYPE>:<basename>"` layer keys
//! - [`source`]: layer and format types, and the resolver trait that decodes files
//! - [`info::ProjectInfo`]: the `info.json` container with the raws/products registries

pub mod config;
pub mod error;
pub mod explorer;
pub mod info;
pub mod logging;
pub mod progress;
pub mod project;
pub mod source;

pub use config::ProjectConfig;
pub use error::{ProjectError, Result};
pub use info::ProjectInfo;
pub use project::{LayerIndex, Project};
pub use source::{FormatType, Layer, LayerKey, LayerType, SourceTypeResolver};
