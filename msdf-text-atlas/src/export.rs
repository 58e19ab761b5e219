//! JSON layout export in the msdf-atlas-gen document shape.
//!
//! The document is a side artifact for tooling and debugging; nothing in
//! this workspace reads it back to build or lay out text.

use serde::{Deserialize, Serialize};

use crate::glyph::PlaneBounds;
use crate::table::{AtlasBounds, AtlasGeometry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub distance_range: f64,
    /// Pixels per em
    pub size: f64,
    pub width: u32,
    pub height: u32,
    pub y_origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub em_size: f64,
    pub line_height: f64,
    pub ascender: f64,
    pub descender: f64,
    pub underline_y: f64,
    pub underline_thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGlyph {
    pub unicode: u32,
    pub advance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane_bounds: Option<PlaneBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atlas_bounds: Option<AtlasBounds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutKerning {
    pub unicode1: u32,
    pub unicode2: u32,
    pub advance: f64,
}

/// Serializable description of a built atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasLayout {
    pub atlas: AtlasInfo,
    pub name: String,
    pub metrics: LayoutMetrics,
    pub glyphs: Vec<LayoutGlyph>,
    #[serde(default)]
    pub kerning: Vec<LayoutKerning>,
}

impl AtlasLayout {
    /// Describe `geometry`; glyphs and kerning pairs are ordered by code point
    pub fn from_geometry(geometry: &AtlasGeometry) -> Self {
        let metrics = geometry.metrics();
        let (width, height) = geometry.dimensions();
        let glyphs = geometry
            .records()
            .into_iter()
            .map(|record| {
                let blank = record.is_whitespace();
                LayoutGlyph {
                    unicode: u32::from(record.character),
                    advance: record.advance,
                    plane_bounds: (!blank).then_some(record.plane_bounds),
                    atlas_bounds: (!blank).then_some(record.atlas_bounds),
                }
            })
            .collect();
        let kerning = geometry
            .kerning_pairs()
            .into_iter()
            .map(|((left, right), advance)| LayoutKerning {
                unicode1: u32::from(left),
                unicode2: u32::from(right),
                advance,
            })
            .collect();

        Self {
            atlas: AtlasInfo {
                kind: format!("{:?}", geometry.pixel_format()).to_lowercase(),
                distance_range: geometry.pixel_range(),
                size: geometry.em_size(),
                width,
                height,
                y_origin: "top".to_string(),
            },
            name: geometry.name().to_string(),
            metrics: LayoutMetrics {
                em_size: metrics.em_size,
                line_height: metrics.line_height,
                ascender: metrics.ascender,
                descender: metrics.descender,
                underline_y: metrics.underline_y,
                underline_thickness: metrics.underline_thickness,
            },
            glyphs,
            kerning,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
