//! Distance field evaluation.
//!
//! For every pixel of a glyph box the generator finds, per channel, the
//! nearest edge carrying that channel and converts it to a pseudo-distance.
//! With overlap support, contours are combined by winding so that
//! overlapping contours (common in variable and composite glyphs) do not
//! produce seams where they intersect.

use glam::DVec2;
use msdf_text_config::PixelFormat;

use crate::color::EdgeColor;
use crate::edge::{Curve, EdgeSegment, SignedDistance};
use crate::glyph::GlyphBox;
use crate::shape::Shape;

/// Parameters shared by every glyph of one build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    /// Distance in em units that spans the full channel range
    pub range: f64,
    pub format: PixelFormat,
    pub overlap_support: bool,
}

/// Channel distances at one point: three pseudo-distances and the true
/// signed distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Distances {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Distances {
    const FAR: Distances = Distances {
        r: -f64::MAX,
        g: -f64::MAX,
        b: -f64::MAX,
        a: -f64::MAX,
    };
}

fn median(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).max(a.max(b).min(c))
}

/// Scalar used to compare and combine distances for the given format
fn resolve(d: &Distances, format: PixelFormat) -> f64 {
    match format {
        PixelFormat::Sdf => d.a,
        PixelFormat::Msdf | PixelFormat::Mtsdf => median(d.r, d.g, d.b),
    }
}

/// Nearest-edge tracking for one channel.
#[derive(Debug, Clone, Copy)]
struct ChannelSelector {
    min_true_distance: SignedDistance,
    min_negative_pseudo_distance: f64,
    min_positive_pseudo_distance: f64,
    near_edge: Option<Curve>,
    near_edge_param: f64,
}

impl ChannelSelector {
    const EMPTY: ChannelSelector = ChannelSelector {
        min_true_distance: SignedDistance::INFINITE,
        min_negative_pseudo_distance: -f64::MAX,
        min_positive_pseudo_distance: f64::MAX,
        near_edge: None,
        near_edge_param: 0.0,
    };

    fn add_true_distance(&mut self, curve: &Curve, distance: SignedDistance, param: f64) {
        if distance.closer_than(&self.min_true_distance) {
            self.min_true_distance = distance;
            self.near_edge = Some(*curve);
            self.near_edge_param = param;
        }
    }

    fn add_pseudo_distance(&mut self, distance: f64) {
        if distance <= 0.0 && distance > self.min_negative_pseudo_distance {
            self.min_negative_pseudo_distance = distance;
        }
        if distance >= 0.0 && distance < self.min_positive_pseudo_distance {
            self.min_positive_pseudo_distance = distance;
        }
    }

    fn merge(&mut self, other: &ChannelSelector) {
        if other.min_true_distance.closer_than(&self.min_true_distance) {
            self.min_true_distance = other.min_true_distance;
            self.near_edge = other.near_edge;
            self.near_edge_param = other.near_edge_param;
        }
        if other.min_negative_pseudo_distance > self.min_negative_pseudo_distance {
            self.min_negative_pseudo_distance = other.min_negative_pseudo_distance;
        }
        if other.min_positive_pseudo_distance < self.min_positive_pseudo_distance {
            self.min_positive_pseudo_distance = other.min_positive_pseudo_distance;
        }
    }

    fn distance(&self, p: DVec2) -> f64 {
        let mut min_distance = if self.min_true_distance.distance < 0.0 {
            self.min_negative_pseudo_distance
        } else {
            self.min_positive_pseudo_distance
        };
        if let Some(edge) = &self.near_edge {
            let mut distance = self.min_true_distance;
            edge.distance_to_pseudo_distance(&mut distance, p, self.near_edge_param);
            if distance.distance.abs() < min_distance.abs() {
                min_distance = distance.distance;
            }
        }
        min_distance
    }
}

/// Whether `p` lies in the region where `edge` (not its neighbors) owns the
/// extension past its endpoint.
fn point_facing_edge(prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment, p: DVec2, param: f64) -> bool {
    if param < 0.0 {
        let prev_edge_dir = -prev.curve.direction(1.0).normalize_or_zero();
        let edge_dir = edge.curve.direction(0.0).normalize_or_zero();
        let point_dir = p - edge.curve.point(0.0);
        return point_dir.dot(edge_dir) >= point_dir.dot(prev_edge_dir);
    }
    if param > 1.0 {
        let edge_dir = -edge.curve.direction(1.0).normalize_or_zero();
        let next_edge_dir = next.curve.direction(0.0).normalize_or_zero();
        let point_dir = p - edge.curve.point(1.0);
        return point_dir.dot(edge_dir) >= point_dir.dot(next_edge_dir);
    }
    true
}

/// Per-channel selectors plus the overall true distance.
#[derive(Debug, Clone, Copy)]
struct EdgeSelector {
    channels: [ChannelSelector; 3],
    min_true_distance: SignedDistance,
}

const CHANNELS: [EdgeColor; 3] = [EdgeColor::RED, EdgeColor::GREEN, EdgeColor::BLUE];

impl EdgeSelector {
    const EMPTY: EdgeSelector = EdgeSelector {
        channels: [ChannelSelector::EMPTY; 3],
        min_true_distance: SignedDistance::INFINITE,
    };

    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment, p: DVec2) {
        let (distance, param) = edge.curve.signed_distance(p);
        if distance.closer_than(&self.min_true_distance) {
            self.min_true_distance = distance;
        }
        for (channel, flag) in self.channels.iter_mut().zip(CHANNELS) {
            if edge.color.contains(flag) {
                channel.add_true_distance(&edge.curve, distance, param);
            }
        }
        if point_facing_edge(prev, edge, next, p, param) {
            let mut pseudo = distance;
            edge.curve.distance_to_pseudo_distance(&mut pseudo, p, param);
            for (channel, flag) in self.channels.iter_mut().zip(CHANNELS) {
                if edge.color.contains(flag) {
                    channel.add_pseudo_distance(pseudo.distance);
                }
            }
        }
    }

    fn merge(&mut self, other: &EdgeSelector) {
        for (channel, theirs) in self.channels.iter_mut().zip(&other.channels) {
            channel.merge(theirs);
        }
        if other.min_true_distance.closer_than(&self.min_true_distance) {
            self.min_true_distance = other.min_true_distance;
        }
    }

    fn distance(&self, p: DVec2) -> Distances {
        Distances {
            r: self.channels[0].distance(p),
            g: self.channels[1].distance(p),
            b: self.channels[2].distance(p),
            a: self.min_true_distance.distance,
        }
    }
}

/// Evaluates a shape's distance field; holds scratch buffers reused across
/// the pixels of one glyph.
struct ShapeDistanceFinder<'a> {
    shape: &'a Shape,
    windings: Vec<i32>,
    selectors: Vec<EdgeSelector>,
    format: PixelFormat,
    overlap_support: bool,
}

impl<'a> ShapeDistanceFinder<'a> {
    fn new(shape: &'a Shape, format: PixelFormat, overlap_support: bool) -> Self {
        Self {
            shape,
            windings: shape.windings(),
            selectors: Vec::with_capacity(shape.contours.len()),
            format,
            overlap_support,
        }
    }

    fn distance(&mut self, p: DVec2) -> Distances {
        self.selectors.clear();
        for contour in &self.shape.contours {
            let mut selector = EdgeSelector::EMPTY;
            let edges = &contour.edges;
            let n = edges.len();
            if n > 0 {
                let mut prev = if n >= 2 { &edges[n - 2] } else { &edges[0] };
                let mut cur = &edges[n - 1];
                for next in edges {
                    selector.add_edge(prev, cur, next, p);
                    prev = cur;
                    cur = next;
                }
            }
            self.selectors.push(selector);
        }

        if !self.overlap_support {
            let mut combined = EdgeSelector::EMPTY;
            for selector in &self.selectors {
                combined.merge(selector);
            }
            return combined.distance(p);
        }
        self.combine_overlapping(p)
    }

    /// Combine per-contour distances so that a point inside any filled
    /// contour reads as inside, even where contours overlap.
    fn combine_overlapping(&self, p: DVec2) -> Distances {
        let format = self.format;
        let mut shape_selector = EdgeSelector::EMPTY;
        let mut inner_selector = EdgeSelector::EMPTY;
        let mut outer_selector = EdgeSelector::EMPTY;
        let contour_distances: Vec<Distances> =
            self.selectors.iter().map(|s| s.distance(p)).collect();

        for (i, selector) in self.selectors.iter().enumerate() {
            let scalar = resolve(&contour_distances[i], format);
            shape_selector.merge(selector);
            if self.windings[i] > 0 && scalar >= 0.0 {
                inner_selector.merge(selector);
            }
            if self.windings[i] < 0 && scalar <= 0.0 {
                outer_selector.merge(selector);
            }
        }

        let shape_distance = shape_selector.distance(p);
        let inner_distance = inner_selector.distance(p);
        let outer_distance = outer_selector.distance(p);
        let inner_scalar = resolve(&inner_distance, format);
        let outer_scalar = resolve(&outer_distance, format);

        let mut distance;
        let winding;
        if inner_scalar >= 0.0 && inner_scalar.abs() <= outer_scalar.abs() {
            distance = inner_distance;
            winding = 1;
            for (i, contour_distance) in contour_distances.iter().enumerate() {
                if self.windings[i] > 0 {
                    let scalar = resolve(contour_distance, format);
                    if scalar.abs() < outer_scalar.abs() && scalar > resolve(&distance, format) {
                        distance = *contour_distance;
                    }
                }
            }
        } else if outer_scalar <= 0.0 && outer_scalar.abs() < inner_scalar.abs() {
            distance = outer_distance;
            winding = -1;
            for (i, contour_distance) in contour_distances.iter().enumerate() {
                if self.windings[i] < 0 {
                    let scalar = resolve(contour_distance, format);
                    if scalar.abs() < inner_scalar.abs() && scalar < resolve(&distance, format) {
                        distance = *contour_distance;
                    }
                }
            }
        } else {
            return shape_distance;
        }

        for (i, contour_distance) in contour_distances.iter().enumerate() {
            if self.windings[i] != winding {
                let scalar = resolve(contour_distance, format);
                let current = resolve(&distance, format);
                if scalar * current >= 0.0 && scalar.abs() < current.abs() {
                    distance = *contour_distance;
                }
            }
        }

        if resolve(&distance, format) == resolve(&shape_distance, format) {
            distance = shape_distance;
        }
        distance
    }
}

/// Map a distance in em units to a byte, 128 on the outline.
fn quantize(distance: f64, range: f64) -> u8 {
    let value = (distance / range + 0.5).clamp(0.0, 1.0);
    (255.0 * value).round() as u8
}

/// Render the distance field of `shape` into a tightly packed tile of
/// `glyph_box.width * glyph_box.height` pixels, rows top to bottom.
pub fn render_tile(shape: &Shape, glyph_box: &GlyphBox, params: &GeneratorParams) -> Vec<u8> {
    let channels = params.format.channels();
    let mut tile = vec![0u8; glyph_box.width as usize * glyph_box.height as usize * channels];
    if glyph_box.is_empty() {
        return tile;
    }
    let mut finder = ShapeDistanceFinder::new(shape, params.format, params.overlap_support);
    let row_len = glyph_box.width as usize * channels;
    for (y, row) in tile.chunks_exact_mut(row_len).enumerate() {
        for (x, pixel) in row.chunks_exact_mut(channels).enumerate() {
            let p = glyph_box.pixel_center(x as u32, y as u32);
            let d = finder.distance(p);
            match params.format {
                PixelFormat::Sdf => pixel[0] = quantize(d.a, params.range),
                PixelFormat::Msdf => {
                    pixel[0] = quantize(d.r, params.range);
                    pixel[1] = quantize(d.g, params.range);
                    pixel[2] = quantize(d.b, params.range);
                }
                PixelFormat::Mtsdf => {
                    pixel[0] = quantize(d.r, params.range);
                    pixel[1] = quantize(d.g, params.range);
                    pixel[2] = quantize(d.b, params.range);
                    pixel[3] = quantize(d.a, params.range);
                }
            }
        }
    }
    tile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::edge_coloring_simple;
    use crate::glyph::PreparedGlyph;
    use msdf_text_fonts::GlyphOutline;

    fn square_glyph(format: PixelFormat) -> (Shape, GlyphBox, GeneratorParams) {
        let mut outline = GlyphOutline::new(1.0);
        outline.add_rect(0.0, 0.0, 1.0, 1.0);
        let mut glyph = PreparedGlyph::new('#', &outline);
        edge_coloring_simple(&mut glyph.shape, 3.0, 0);
        let range = 4.0 / 16.0;
        let glyph_box = glyph.wrap_box(16.0, range, 0.0);
        let params = GeneratorParams {
            range,
            format,
            overlap_support: true,
        };
        (glyph.shape, glyph_box, params)
    }

    fn median_at(tile: &[u8], width: u32, x: u32, y: u32) -> u8 {
        let i = ((y * width + x) * 3) as usize;
        let (r, g, b) = (tile[i], tile[i + 1], tile[i + 2]);
        r.min(g).max(r.max(g).min(b))
    }

    #[test]
    fn test_median() {
        assert_eq!(median(1.0, 3.0, 2.0), 2.0);
        assert_eq!(median(-1.0, -5.0, 0.0), -1.0);
    }

    #[test]
    fn test_quantize_midpoint() {
        assert_eq!(quantize(0.0, 1.0), 128);
        assert_eq!(quantize(10.0, 1.0), 255);
        assert_eq!(quantize(-10.0, 1.0), 0);
    }

    #[test]
    fn test_msdf_inside_and_outside() {
        let (shape, glyph_box, params) = square_glyph(PixelFormat::Msdf);
        let tile = render_tile(&shape, &glyph_box, &params);
        assert_eq!(tile.len(), (glyph_box.width * glyph_box.height * 3) as usize);
        let center = median_at(&tile, glyph_box.width, glyph_box.width / 2, glyph_box.height / 2);
        let corner = median_at(&tile, glyph_box.width, 0, 0);
        assert!(center > 128, "center {center}");
        assert!(corner < 128, "corner {corner}");
    }

    #[test]
    fn test_sdf_single_channel() {
        let (shape, glyph_box, params) = square_glyph(PixelFormat::Sdf);
        let tile = render_tile(&shape, &glyph_box, &params);
        assert_eq!(tile.len(), (glyph_box.width * glyph_box.height) as usize);
        let center = tile[(glyph_box.height / 2 * glyph_box.width + glyph_box.width / 2) as usize];
        assert_eq!(center, 255);
    }

    #[test]
    fn test_mtsdf_alpha_matches_sdf() {
        let (shape, glyph_box, params) = square_glyph(PixelFormat::Mtsdf);
        let mtsdf = render_tile(&shape, &glyph_box, &params);
        let sdf = render_tile(
            &shape,
            &glyph_box,
            &GeneratorParams {
                format: PixelFormat::Sdf,
                ..params
            },
        );
        let alpha: Vec<u8> = mtsdf.chunks_exact(4).map(|p| p[3]).collect();
        assert_eq!(alpha, sdf);
    }

    #[test]
    fn test_overlapping_contours_stay_inside() {
        // Two overlapping squares wound the same way
        let mut outline = GlyphOutline::new(1.0);
        outline.add_rect(0.0, 0.0, 0.6, 0.6);
        outline.add_rect(0.4, 0.0, 1.0, 0.6);
        let mut glyph = PreparedGlyph::new('m', &outline);
        edge_coloring_simple(&mut glyph.shape, 3.0, 0);
        let range = 4.0 / 20.0;
        let glyph_box = glyph.wrap_box(20.0, range, 0.0);
        let params = GeneratorParams {
            range,
            format: PixelFormat::Msdf,
            overlap_support: true,
        };
        let tile = render_tile(&glyph.shape, &glyph_box, &params);
        // Sample a pixel center near the seam at x = 0.5 em
        let mut best = (0, f64::MAX);
        for x in 0..glyph_box.width {
            let p = glyph_box.pixel_center(x, 0);
            let d = (p.x - 0.5).abs();
            if d < best.1 {
                best = (x, d);
            }
        }
        let mid_row = glyph_box.height / 2;
        assert!(median_at(&tile, glyph_box.width, best.0, mid_row) > 128);
    }
}
