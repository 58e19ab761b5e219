//! Atlas construction: charset, outline preparation, parallel edge
//! coloring, packing with scale relaxation, parallel rasterization and the
//! geometry table.
//!
//! A build either returns a complete [`FontAtlas`] or an [`AtlasError`];
//! nothing partial escapes. Coloring and rasterization fan out over a rayon
//! pool sized by `worker_count` and are joined before the next stage starts.
//! Tiles are rendered in parallel and copied into the bitmap afterwards, so
//! the bitmap is never observable half-written and its bytes do not depend
//! on the worker count.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use msdf_text_config::{AtlasConfig, UnplacedGlyphPolicy};
use msdf_text_fonts::{FontLibrary, OutlineSource};
use rayon::prelude::*;

use crate::bitmap::AtlasBitmap;
use crate::charset::Charset;
use crate::coloring::{color_shape, glyph_seed};
use crate::error::AtlasError;
use crate::generator::{GeneratorParams, render_tile};
use crate::glyph::{GlyphBox, PreparedGlyph};
use crate::packer::{PackResult, Placement, pack};
use crate::table::{AtlasBounds, AtlasGeometry, GlyphRecord};

/// Scale factor applied per relaxation step when the atlas is too large
const RELAXATION_FACTOR: f64 = 0.9;

/// What happened during a build, for logging and tooling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Characters present in the finished atlas
    pub loaded: Vec<char>,
    /// Charset members the font has no glyph for
    pub missing: Vec<char>,
    /// Glyphs removed under [`UnplacedGlyphPolicy::Drop`]
    pub dropped: Vec<char>,
    /// Glyphs whose outline had no usable area; they are kept as blanks
    pub degenerate: Vec<char>,
    /// Pixels per em actually used
    pub em_size: f64,
    /// Number of times the scale was reduced to fit `max_dimension`
    pub relaxation_steps: u32,
    pub width: u32,
    pub height: u32,
}

/// A finished atlas. Both halves are immutable and cheap to share.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    pub geometry: Arc<AtlasGeometry>,
    pub bitmap: Arc<AtlasBitmap>,
    pub report: BuildReport,
}

/// Builds atlases from an [`OutlineSource`] with one fixed configuration.
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    config: AtlasConfig,
}

impl AtlasBuilder {
    /// Validate `config` and create a builder.
    pub fn new(config: AtlasConfig) -> Result<Self, AtlasError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Load the font at `path` and build its atlas.
    pub fn build_from_file(&self, path: &Path) -> Result<FontAtlas, AtlasError> {
        let library = FontLibrary::new();
        let face = library.load_font(path)?;
        self.build(&face)
    }

    /// Build the atlas for every charset member `source` can provide.
    pub fn build(&self, source: &dyn OutlineSource) -> Result<FontAtlas, AtlasError> {
        let config = &self.config;
        let mut report = BuildReport::default();

        let mut charset = Charset::from_ranges(&config.charset);
        charset.insert(config.fallback_char);
        log::info!(
            "Building {:?} atlas for '{}': {} characters, {} px/em, range {} px",
            config.pixel_format,
            source.name(),
            charset.len(),
            config.em_size,
            config.pixel_range
        );

        let mut glyphs = self.prepare_glyphs(source, &charset, &mut report)?;
        if report.missing.contains(&config.fallback_char) {
            log::warn!(
                "Fallback character {:?} is not in font '{}'; lookups outside the charset will return nothing",
                config.fallback_char,
                source.name()
            );
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|i| format!("msdf-worker-{i}"))
            .build()?;

        let strategy = config.coloring;
        let angle_threshold = config.angle_threshold;
        let seed = config.coloring_seed;
        pool.install(|| {
            glyphs.par_iter_mut().enumerate().for_each(|(i, glyph)| {
                color_shape(&mut glyph.shape, strategy, angle_threshold, glyph_seed(seed, i as u64));
            })
        });
        log::debug!("Colored {} glyphs with {} strategy", glyphs.len(), strategy.display_name());

        let (scale, boxes, packed) = self.pack_glyphs(&mut glyphs, &mut report)?;

        let params = GeneratorParams {
            range: config.pixel_range / scale,
            format: config.pixel_format,
            overlap_support: config.overlap_support,
        };
        let tiles: Vec<Vec<u8>> = pool.install(|| {
            glyphs
                .par_iter()
                .zip(boxes.par_iter())
                .map(|(glyph, glyph_box)| render_tile(&glyph.shape, glyph_box, &params))
                .collect()
        });

        let mut bitmap = AtlasBitmap::new(packed.width, packed.height, config.pixel_format);
        for (tile, placement) in tiles.iter().zip(&packed.placements) {
            if let Some(placement) = placement {
                bitmap.blit(placement, tile);
            }
        }

        let mut records = HashMap::with_capacity(glyphs.len());
        for ((glyph, glyph_box), placement) in glyphs.iter().zip(&boxes).zip(&packed.placements) {
            records.insert(
                glyph.character,
                GlyphRecord {
                    character: glyph.character,
                    advance: glyph.advance,
                    plane_bounds: glyph_box.plane_bounds(),
                    atlas_bounds: placement.as_ref().map(atlas_bounds).unwrap_or_default(),
                    edge_colors: glyph
                        .shape
                        .contours
                        .iter()
                        .flat_map(|c| c.edges.iter().map(|e| e.color))
                        .collect(),
                },
            );
        }

        let kerning = if config.kerning {
            let chars: Vec<char> = glyphs.iter().map(|g| g.character).collect();
            kerning_pairs(source, &chars)
        } else {
            HashMap::new()
        };

        report.loaded = glyphs.iter().map(|g| g.character).collect();
        report.em_size = scale;
        report.width = packed.width;
        report.height = packed.height;
        log::info!(
            "Atlas built: {}x{} px, {} glyphs, {} kerning pairs, {:.2} px/em ({} relaxation steps), {} missing, {} dropped",
            packed.width,
            packed.height,
            report.loaded.len(),
            kerning.len(),
            scale,
            report.relaxation_steps,
            report.missing.len(),
            report.dropped.len()
        );

        let geometry = AtlasGeometry {
            name: source.name().to_string(),
            glyphs: records,
            kerning,
            metrics: source.metrics(),
            width: packed.width,
            height: packed.height,
            em_size: scale,
            pixel_range: config.pixel_range,
            pixel_format: config.pixel_format,
            fallback_char: config.fallback_char,
        };

        Ok(FontAtlas {
            geometry: Arc::new(geometry),
            bitmap: Arc::new(bitmap),
            report,
        })
    }

    /// Fetch and normalize every outline in charset order
    fn prepare_glyphs(
        &self,
        source: &dyn OutlineSource,
        charset: &Charset,
        report: &mut BuildReport,
    ) -> Result<Vec<PreparedGlyph>, AtlasError> {
        let mut glyphs = Vec::with_capacity(charset.len());
        for character in charset.iter() {
            let Some(outline) = source.outline(character) else {
                log::debug!("No glyph for {character:?} in '{}'", source.name());
                report.missing.push(character);
                continue;
            };
            let mut glyph = PreparedGlyph::new(character, &outline);
            if glyph.is_malformed() {
                self.unplaced(character, "outline has non-finite coordinates", report)?;
                continue;
            }
            if glyph.diagnostics.degenerate_contours > 0 || glyph.degenerate {
                log::warn!(
                    "Degenerate outline for {character:?}: {} contour(s) without area removed",
                    glyph.diagnostics.degenerate_contours
                );
            }
            if glyph.degenerate {
                glyph.shape.contours.clear();
                report.degenerate.push(character);
            }
            glyphs.push(glyph);
        }
        Ok(glyphs)
    }

    /// Apply the unplaced-glyph policy to one glyph
    fn unplaced(&self, character: char, reason: &str, report: &mut BuildReport) -> Result<(), AtlasError> {
        match self.config.unplaced_glyphs {
            UnplacedGlyphPolicy::Abort => Err(AtlasError::UnplaceableGlyph {
                character,
                reason: reason.to_string(),
            }),
            UnplacedGlyphPolicy::Drop => {
                log::warn!("Dropping glyph {character:?}: {reason}");
                report.dropped.push(character);
                Ok(())
            }
        }
    }

    /// Pack glyph boxes, reducing the scale until the atlas fits
    /// `max_dimension` or `min_em_size` is reached.
    ///
    /// Glyphs whose box exceeds `max_dimension` even at `min_em_size` can
    /// never be placed; they go through the unplaced-glyph policy before any
    /// relaxation so they do not drag the scale of the others down.
    fn pack_glyphs(
        &self,
        glyphs: &mut Vec<PreparedGlyph>,
        report: &mut BuildReport,
    ) -> Result<(f64, Vec<GlyphBox>, PackResult), AtlasError> {
        let config = &self.config;
        let max = config.max_dimension;
        let padding = config.padding;
        let min_scale = config.min_em_size.min(config.em_size);

        let min_range = config.pixel_range / min_scale;
        let mut index = 0;
        while index < glyphs.len() {
            let glyph_box = glyphs[index].wrap_box(min_scale, min_range, config.miter_limit);
            if fits_dimension(&glyph_box, padding, max) {
                index += 1;
                continue;
            }
            let reason = format!(
                "{}x{} px box plus padding exceeds the maximum dimension {max} at {min_scale:.2} px/em",
                glyph_box.width, glyph_box.height
            );
            self.unplaced(glyphs[index].character, &reason, report)?;
            glyphs.remove(index);
        }

        let mut scale = config.em_size;
        loop {
            let range = config.pixel_range / scale;
            let boxes: Vec<GlyphBox> = glyphs
                .iter()
                .map(|g| g.wrap_box(scale, range, config.miter_limit))
                .collect();

            let mut too_large = None;
            if boxes.iter().all(|b| fits_dimension(b, padding, max)) {
                let sizes: Vec<(u32, u32)> = boxes.iter().map(|b| (b.width, b.height)).collect();
                let packed = pack(&sizes, padding, config.dimensions);
                if packed.width <= max && packed.height <= max {
                    log::debug!(
                        "Packed {} glyphs into {}x{} at {scale:.2} px/em",
                        glyphs.len(),
                        packed.width,
                        packed.height
                    );
                    return Ok((scale, boxes, packed));
                }
                too_large = Some((packed.width, packed.height));
            }

            if scale <= min_scale {
                let (width, height) = too_large.unwrap_or((max.saturating_add(1), max.saturating_add(1)));
                return Err(AtlasError::AtlasTooLarge { width, height, max });
            }
            let next = (scale * RELAXATION_FACTOR).max(min_scale);
            log::info!("Atlas exceeds {max} px at {scale:.2} px/em, retrying at {next:.2}");
            scale = next;
            report.relaxation_steps += 1;
        }
    }
}

/// Whether a glyph box plus padding on both sides fits within `max`
fn fits_dimension(glyph_box: &GlyphBox, padding: u32, max: u32) -> bool {
    let border = padding.saturating_mul(2);
    glyph_box.width.saturating_add(border) <= max && glyph_box.height.saturating_add(border) <= max
}

/// Atlas rectangle through the centers of the placement's edge texels
fn atlas_bounds(placement: &Placement) -> AtlasBounds {
    AtlasBounds {
        left: f64::from(placement.x) + 0.5,
        top: f64::from(placement.y) + 0.5,
        right: f64::from(placement.x + placement.width) - 0.5,
        bottom: f64::from(placement.y + placement.height) - 0.5,
    }
}

/// Non-zero kerning adjustments between members of `chars`
fn kerning_pairs(source: &dyn OutlineSource, chars: &[char]) -> HashMap<(char, char), f64> {
    source
        .kerning_pairs(chars)
        .into_iter()
        .filter(|(_, adjustment)| *adjustment != 0.0 && adjustment.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdf_text_config::CharsetRange;
    use msdf_text_fonts::MemoryFont;

    #[test]
    fn test_atlas_bounds_inset_half_texel() {
        let bounds = atlas_bounds(&Placement {
            x: 4,
            y: 2,
            width: 10,
            height: 6,
        });
        assert_eq!(bounds.left, 4.5);
        assert_eq!(bounds.right, 13.5);
        assert_eq!(bounds.top, 2.5);
        assert_eq!(bounds.bottom, 7.5);
    }

    #[test]
    fn test_fallback_added_to_charset() {
        let font = MemoryFont::blocks("blocks", ['A', 'B', '?']);
        let config = AtlasConfig::default().with_charset(vec![CharsetRange::new(0x41, 0x42)]);
        let atlas = AtlasBuilder::new(config).unwrap().build(&font).unwrap();
        assert!(atlas.geometry.lookup('?').is_some());
        assert_eq!(atlas.report.loaded, vec!['?', 'A', 'B']);
    }

    #[test]
    fn test_relaxation_reduces_scale() {
        let font = MemoryFont::blocks("blocks", 'A'..='Z');
        let config = AtlasConfig::default()
            .with_charset(vec![CharsetRange::new(0x41, 0x5A)])
            .with_em_size(64.0)
            .with_max_dimension(120);
        let atlas = AtlasBuilder::new(config).unwrap().build(&font).unwrap();
        assert!(atlas.report.relaxation_steps > 0);
        assert!(atlas.geometry.em_size() < 64.0);
        let (w, h) = atlas.geometry.dimensions();
        assert!(w <= 120 && h <= 120);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AtlasConfig::default().with_worker_count(0);
        assert!(matches!(
            AtlasBuilder::new(config),
            Err(AtlasError::InvalidConfig(_))
        ));
    }
}
