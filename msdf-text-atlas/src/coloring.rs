//! Edge coloring.
//!
//! Each edge gets a set of channels so that the two edges meeting at a sharp
//! corner never share all of them. The median of the three channel distances
//! then reconstructs the corner instead of rounding it off.
//!
//! Three strategies are available:
//! - [`edge_coloring_simple`] walks corner runs and switches color at every
//!   corner, using a seed to vary the starting color and switch direction.
//! - [`edge_coloring_ink_trap`] does the same but treats corners that bound
//!   a short run as minor and colors them so the short run stays distinct
//!   from both neighbors.
//! - [`edge_coloring_by_distance`] is seed-free: it picks, for each run, the
//!   admissible color whose nearest same-colored edge is farthest away.

use glam::DVec2;
use msdf_text_config::ColoringStrategy;

use crate::color::EdgeColor;
use crate::edge::{EdgeSegment, unit};
use crate::shape::{Contour, Shape, is_corner};

/// Derive the coloring seed for glyph `index` from the build seed.
///
/// A zero build seed gives every glyph seed zero.
pub fn glyph_seed(seed: u64, index: u64) -> u64 {
    if seed == 0 {
        return 0;
    }
    6364136223846793005u64
        .wrapping_mul(seed ^ index)
        .wrapping_add(1442695040888963407)
}

/// Color `shape` with the chosen strategy
pub fn color_shape(shape: &mut Shape, strategy: ColoringStrategy, angle_threshold: f64, seed: u64) {
    match strategy {
        ColoringStrategy::Simple => edge_coloring_simple(shape, angle_threshold, seed),
        ColoringStrategy::InkTrap => edge_coloring_ink_trap(shape, angle_threshold, seed),
        ColoringStrategy::ByDistance => edge_coloring_by_distance(shape, angle_threshold),
    }
}

fn init_color(seed: &mut u64) -> EdgeColor {
    let color = EdgeColor::STARTS[(*seed % 3) as usize];
    *seed /= 3;
    color
}

/// Move `color` to another two-channel color, avoiding `banned` where it
/// leaves a choice.
fn switch_color(color: &mut EdgeColor, seed: &mut u64, banned: EdgeColor) {
    let combined = *color & banned;
    if combined.is_primary() {
        *color = combined ^ EdgeColor::WHITE;
        return;
    }
    if *color == EdgeColor::BLACK || *color == EdgeColor::WHITE {
        *color = init_color(seed);
        return;
    }
    let shifted = color.bits() << (1 + (*seed & 1) as u32);
    *color = EdgeColor::from_bits_truncate((shifted | (shifted >> 3)) & EdgeColor::WHITE.bits());
    *seed >>= 1;
}

/// Maps position `i` of `n` onto 0, 1 or 2, symmetric around the middle
fn symmetrical_trichotomy(position: usize, n: usize) -> usize {
    let value = 3.0 + 2.875 * position as f64 / (n - 1) as f64 - 1.4375 + 0.5;
    value as usize - 2
}

fn corner_indices(contour: &Contour, cross_threshold: f64) -> Vec<usize> {
    let Some(last) = contour.edges.last() else {
        return Vec::new();
    };
    let mut corners = Vec::new();
    let mut prev_direction = last.curve.direction(1.0);
    for (index, edge) in contour.edges.iter().enumerate() {
        if is_corner(unit(prev_direction), unit(edge.curve.direction(0.0)), cross_threshold) {
            corners.push(index);
        }
        prev_direction = edge.curve.direction(1.0);
    }
    corners
}

/// Color a contour with a single corner. `colors[1]` is the middle color;
/// the outer two meet at the corner. Contours with fewer than three edges
/// are split so that every color gets at least one edge.
fn color_teardrop(contour: &mut Contour, corner: usize, colors: [EdgeColor; 3]) {
    let m = contour.edges.len();
    if m >= 3 {
        for i in 0..m {
            contour.edges[(corner + i) % m].color = colors[symmetrical_trichotomy(i, m)];
        }
        return;
    }
    let first = contour.edges[0].curve.split_in_thirds();
    if m == 1 {
        contour.edges = first
            .into_iter()
            .zip(colors)
            .map(|(curve, color)| EdgeSegment { curve, color })
            .collect();
    } else {
        let second = contour.edges[1].curve.split_in_thirds();
        let mut parts = [first[0]; 6];
        parts[3 * corner..3 * corner + 3].copy_from_slice(&first);
        parts[3 - 3 * corner..6 - 3 * corner].copy_from_slice(&second);
        contour.edges = parts
            .into_iter()
            .enumerate()
            .map(|(i, curve)| EdgeSegment {
                curve,
                color: colors[i / 2],
            })
            .collect();
    }
}

fn seeded_teardrop(contour: &mut Contour, corner: usize, color: &mut EdgeColor, seed: &mut u64) {
    switch_color(color, seed, EdgeColor::BLACK);
    let first = *color;
    switch_color(color, seed, EdgeColor::BLACK);
    color_teardrop(contour, corner, [first, EdgeColor::WHITE, *color]);
}

/// Seeded corner-run coloring.
pub fn edge_coloring_simple(shape: &mut Shape, angle_threshold: f64, seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut seed = seed;
    let mut color = init_color(&mut seed);
    for contour in &mut shape.contours {
        if contour.edges.is_empty() {
            continue;
        }
        let corners = corner_indices(contour, cross_threshold);
        match corners.as_slice() {
            [] => {
                switch_color(&mut color, &mut seed, EdgeColor::BLACK);
                for edge in &mut contour.edges {
                    edge.color = color;
                }
            }
            [corner] => seeded_teardrop(contour, *corner, &mut color, &mut seed),
            _ => {
                let corner_count = corners.len();
                let start = corners[0];
                let m = contour.edges.len();
                let mut spline = 0;
                switch_color(&mut color, &mut seed, EdgeColor::BLACK);
                let initial_color = color;
                for i in 0..m {
                    let index = (start + i) % m;
                    if spline + 1 < corner_count && corners[spline + 1] == index {
                        spline += 1;
                        let banned = if spline == corner_count - 1 {
                            initial_color
                        } else {
                            EdgeColor::BLACK
                        };
                        switch_color(&mut color, &mut seed, banned);
                    }
                    contour.edges[index].color = color;
                }
            }
        }
    }
}

struct InkTrapCorner {
    index: usize,
    prev_edge_length_estimate: f64,
    minor: bool,
    color: EdgeColor,
}

/// Seeded corner-run coloring that keeps short runs distinct from both
/// neighbors.
pub fn edge_coloring_ink_trap(shape: &mut Shape, angle_threshold: f64, seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut seed = seed;
    let mut color = init_color(&mut seed);
    let mut corners: Vec<InkTrapCorner> = Vec::new();
    for contour in &mut shape.contours {
        let Some(last) = contour.edges.last() else {
            continue;
        };

        corners.clear();
        let mut spline_length = 0.0;
        let mut prev_direction = last.curve.direction(1.0);
        for (index, edge) in contour.edges.iter().enumerate() {
            if is_corner(unit(prev_direction), unit(edge.curve.direction(0.0)), cross_threshold) {
                corners.push(InkTrapCorner {
                    index,
                    prev_edge_length_estimate: spline_length,
                    minor: false,
                    color: EdgeColor::BLACK,
                });
                spline_length = 0.0;
            }
            spline_length += edge.curve.estimate_length();
            prev_direction = edge.curve.direction(1.0);
        }

        match corners.len() {
            0 => {
                switch_color(&mut color, &mut seed, EdgeColor::BLACK);
                for edge in &mut contour.edges {
                    edge.color = color;
                }
            }
            1 => {
                let corner = corners[0].index;
                seeded_teardrop(contour, corner, &mut color, &mut seed);
            }
            corner_count => {
                let mut major_corner_count = corner_count;
                if corner_count > 3 {
                    corners[0].prev_edge_length_estimate += spline_length;
                    for i in 0..corner_count {
                        let here = corners[i].prev_edge_length_estimate;
                        let next = corners[(i + 1) % corner_count].prev_edge_length_estimate;
                        let after = corners[(i + 2) % corner_count].prev_edge_length_estimate;
                        if here > next && next < after {
                            corners[i].minor = true;
                            major_corner_count -= 1;
                        }
                    }
                }

                let mut initial_color = EdgeColor::BLACK;
                for corner in corners.iter_mut().filter(|c| !c.minor) {
                    major_corner_count -= 1;
                    let banned = if major_corner_count == 0 {
                        initial_color
                    } else {
                        EdgeColor::BLACK
                    };
                    switch_color(&mut color, &mut seed, banned);
                    corner.color = color;
                    if initial_color == EdgeColor::BLACK {
                        initial_color = color;
                    }
                }
                for i in 0..corner_count {
                    if corners[i].minor {
                        let next_color = corners[(i + 1) % corner_count].color;
                        corners[i].color = (color & next_color) ^ EdgeColor::WHITE;
                    } else {
                        color = corners[i].color;
                    }
                }

                let m = contour.edges.len();
                let start = corners[0].index;
                let mut spline = 0;
                color = corners[0].color;
                for i in 0..m {
                    let index = (start + i) % m;
                    if spline + 1 < corner_count && corners[spline + 1].index == index {
                        spline += 1;
                        color = corners[spline].color;
                    }
                    contour.edges[index].color = color;
                }
            }
        }
    }
}

/// Sample points of an already colored edge, used for color distances.
struct ColoredPiece {
    color: EdgeColor,
    samples: [DVec2; 5],
}

impl ColoredPiece {
    fn new(edge: &EdgeSegment) -> Self {
        Self {
            color: edge.color,
            samples: std::array::from_fn(|i| edge.curve.point(i as f64 / 4.0)),
        }
    }
}

/// Distance from a run of edges to the nearest piece of `color`, or
/// infinity when no piece has that color yet.
fn distance_to_color(pieces: &[ColoredPiece], run: &[DVec2], color: EdgeColor) -> f64 {
    pieces
        .iter()
        .filter(|piece| piece.color == color)
        .flat_map(|piece| piece.samples.iter())
        .flat_map(|a| run.iter().map(move |b| a.distance_squared(*b)))
        .fold(f64::INFINITY, f64::min)
}

/// Among `candidates`, the color whose nearest same-colored piece is
/// farthest from `run`. Ties go to the earlier candidate.
fn farthest_color(pieces: &[ColoredPiece], run: &[DVec2], candidates: &[EdgeColor]) -> EdgeColor {
    let mut best = candidates[0];
    let mut best_distance = f64::NEG_INFINITY;
    for &candidate in candidates {
        let distance = distance_to_color(pieces, run, candidate);
        if distance > best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

fn run_samples(edges: &[EdgeSegment], indices: impl Iterator<Item = usize>) -> Vec<DVec2> {
    indices
        .flat_map(|i| (0..=4).map(move |s| edges[i].curve.point(s as f64 / 4.0)))
        .collect()
}

/// Deterministic coloring: adjacent corner runs always differ, and each run
/// takes the admissible color that is farthest from edges already using it,
/// across all contours of the shape.
pub fn edge_coloring_by_distance(shape: &mut Shape, angle_threshold: f64) {
    let cross_threshold = angle_threshold.sin();
    let mut pieces: Vec<ColoredPiece> = Vec::new();
    for contour in &mut shape.contours {
        if contour.edges.is_empty() {
            continue;
        }
        let corners = corner_indices(contour, cross_threshold);
        let m = contour.edges.len();
        match corners.as_slice() {
            [] => {
                let run = run_samples(&contour.edges, 0..m);
                let color = farthest_color(&pieces, &run, &EdgeColor::STARTS);
                for edge in &mut contour.edges {
                    edge.color = color;
                }
            }
            [corner] => {
                let run = run_samples(&contour.edges, 0..m);
                let first = farthest_color(&pieces, &run, &EdgeColor::STARTS);
                let remaining: Vec<EdgeColor> = EdgeColor::STARTS
                    .into_iter()
                    .filter(|c| *c != first)
                    .collect();
                let last = farthest_color(&pieces, &run, &remaining);
                color_teardrop(contour, *corner, [first, EdgeColor::WHITE, last]);
            }
            _ => {
                let run_count = corners.len();
                let mut run_colors: Vec<EdgeColor> = Vec::with_capacity(run_count);
                for r in 0..run_count {
                    let start = corners[r];
                    let end = corners[(r + 1) % run_count];
                    let len = (end + m - start - 1) % m + 1;
                    let indices = (0..len).map(|k| (start + k) % m);
                    let run = run_samples(&contour.edges, indices.clone());

                    let candidates: Vec<EdgeColor> = EdgeColor::STARTS
                        .into_iter()
                        .filter(|c| r == 0 || *c != run_colors[r - 1])
                        .filter(|c| r + 1 != run_count || *c != run_colors[0])
                        .collect();
                    let color = farthest_color(&pieces, &run, &candidates);
                    run_colors.push(color);
                    for index in indices {
                        contour.edges[index].color = color;
                        pieces.push(ColoredPiece::new(&contour.edges[index]));
                    }
                }
                continue;
            }
        }
        pieces.extend(contour.edges.iter().map(ColoredPiece::new));
    }
}
