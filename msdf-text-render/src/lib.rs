//! Text layout and GPU rendering helpers for MSDF font atlases.
//!
//! This crate provides:
//!
//! - The text layout engine: strings to pixel-snapped glyph quads
//! - A caller-owned vertex accumulator and its wgpu vertex layout
//! - Atlas texture upload, the MSDF shader and its render pipeline

pub mod batch;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod texture;
pub mod vertex;

// Re-export main public types
pub use batch::VertexBatch;
pub use error::RenderError;
pub use layout::{TextExtent, TextStyle, layout_text, measure_text};
pub use pipeline::{
    TextUniforms, create_text_bind_group, create_text_bind_group_layout, create_text_pipeline,
    create_uniform_buffer, screen_projection,
};
pub use texture::{AtlasTexture, expand_to_rgba8};
pub use vertex::Vertex;
