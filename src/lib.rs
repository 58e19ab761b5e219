//! msdf-text: multi-channel signed distance field font atlases and GPU text
//! layout.
//!
//! The workspace crates are re-exported here; the binary adds the command
//! line, the log bridge and the debug artifact writer on top.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
pub mod output;

pub use msdf_text_atlas as atlas;
pub use msdf_text_config as config;
pub use msdf_text_fonts as fonts;
pub use msdf_text_render as render;

pub use msdf_text_atlas::{AtlasBuilder, AtlasGeometry, FontAtlas};
pub use msdf_text_config::AtlasConfig;
pub use msdf_text_render::{TextStyle, VertexBatch, layout_text, measure_text};
