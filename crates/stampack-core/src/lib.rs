//! Stampack Core - stamping and staging logic for the chart build actions
//!
//! This crate provides the pieces shared by the two stampack binaries:
//! - `StampMap`: placeholder resolution from status files and image manifests
//! - `ChartManifest`: stamped and sanitized chart manifest
//! - `StagedChart`: chart staging directory assembly
//! - `ToolCommand`: hermetic external-tool invocation
//! - `ChartMetadata`: archive-name parsing and metadata emission

pub mod archive;
pub mod chart;
pub mod error;
pub mod files;
pub mod metadata;
pub mod staging;
pub mod stamp;
pub mod tool;

pub use archive::{chart_root, extract_archive};
pub use chart::ChartManifest;
pub use error::{CoreError, Result};
pub use metadata::ChartMetadata;
pub use staging::StagedChart;
pub use stamp::{ImageManifest, StampMap};
pub use tool::{ToolCommand, ToolOutput};
