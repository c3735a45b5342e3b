//! Sprote export
//!
//! Drives the skeleton's pose evaluator across sampled times, rasterizes each
//! pose, and writes either a numbered PNG sequence or a looping GIF.

pub mod assets;
pub mod config;
pub mod error;
pub mod exporter;
pub mod raster;

pub use assets::{AssetLoader, FsAssetLoader, NoAssets};
pub use config::{ExportConfig, DEFAULT_DURATION_SECS, MAX_FRAMES};
pub use error::ExportError;
pub use exporter::{frame_file_name, ExportSummary, Exporter};
pub use raster::{Rasterizer, SoftwareRasterizer};
