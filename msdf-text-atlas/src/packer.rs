//! Shelf packing of glyph boxes into one atlas rectangle.
//!
//! Boxes are sorted tallest first and laid left to right in rows ("shelves");
//! a row is closed when the next box would overflow the atlas width. Several
//! candidate widths are tried and the smallest resulting area wins. Packing
//! is single-threaded and fully deterministic for a given input.

use msdf_text_config::DimensionsConstraint;
use serde::{Deserialize, Serialize};

/// Where one glyph box landed, in atlas pixels with y down. The rectangle
/// excludes padding; the padding surrounds it on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Whether two placements share any pixel when both are grown by `padding`
    pub fn overlaps(&self, other: &Placement, padding: u32) -> bool {
        let (ax0, ay0) = (self.x.saturating_sub(padding), self.y.saturating_sub(padding));
        let (ax1, ay1) = (self.x + self.width + padding, self.y + self.height + padding);
        let (bx0, by0) = (other.x.saturating_sub(padding), other.y.saturating_sub(padding));
        let (bx1, by1) = (other.x + other.width + padding, other.y + other.height + padding);
        ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
    }
}

/// Result of packing: atlas size and one optional placement per input box
/// (`None` for empty boxes).
#[derive(Debug, Clone, PartialEq)]
pub struct PackResult {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Option<Placement>>,
}

/// Width multipliers, relative to the square root of the total area, tried
/// for tight packing
const WIDTH_FACTORS: [f64; 7] = [0.8, 0.9, 1.0, 1.1, 1.25, 1.5, 2.0];

/// Pack boxes of the given `(width, height)` with `padding` pixels on every
/// side of each box.
pub fn pack(sizes: &[(u32, u32)], padding: u32, constraint: DimensionsConstraint) -> PackResult {
    let cells: Vec<(usize, u32, u32)> = sizes
        .iter()
        .enumerate()
        .filter(|(_, (w, h))| *w > 0 && *h > 0)
        .map(|(i, (w, h))| {
            let border = padding.saturating_mul(2);
            (i, w.saturating_add(border), h.saturating_add(border))
        })
        .collect();

    if cells.is_empty() {
        return PackResult {
            width: 0,
            height: 0,
            placements: vec![None; sizes.len()],
        };
    }

    let mut order: Vec<usize> = (0..cells.len()).collect();
    // Tallest first, then widest, then input order
    order.sort_by(|&a, &b| {
        let (ia, wa, ha) = cells[a];
        let (ib, wb, hb) = cells[b];
        hb.cmp(&ha).then(wb.cmp(&wa)).then(ia.cmp(&ib))
    });

    let widest = cells.iter().map(|c| c.1).max().unwrap_or(0);
    let area: f64 = cells.iter().map(|c| f64::from(c.1) * f64::from(c.2)).sum();

    let mut best: Option<(u64, u32, u32, Vec<(u32, u32)>)> = None;
    for factor in WIDTH_FACTORS {
        let limit = ((area.sqrt() * factor).ceil() as u32).max(widest);
        let (used_width, used_height, positions) = shelf_pack(&cells, &order, limit);
        let (width, height) = apply_constraint(used_width, used_height, constraint);
        let area = u64::from(width) * u64::from(height);
        let better = match &best {
            None => true,
            Some((best_area, best_w, best_h, _)) => {
                area < *best_area || (area == *best_area && width.max(height) < (*best_w).max(*best_h))
            }
        };
        if better {
            best = Some((area, width, height, positions));
        }
    }

    let Some((_, width, height, positions)) = best else {
        return PackResult {
            width: 0,
            height: 0,
            placements: vec![None; sizes.len()],
        };
    };

    let mut placements = vec![None; sizes.len()];
    for (cell, (x, y)) in cells.iter().zip(positions) {
        let (index, cell_w, cell_h) = *cell;
        placements[index] = Some(Placement {
            x: x + padding,
            y: y + padding,
            width: cell_w - 2 * padding,
            height: cell_h - 2 * padding,
        });
    }

    PackResult {
        width,
        height,
        placements,
    }
}

/// Lay cells on shelves no wider than `limit`. Returns the used width and
/// height and the top-left of each cell, indexed like `cells`.
fn shelf_pack(cells: &[(usize, u32, u32)], order: &[usize], limit: u32) -> (u32, u32, Vec<(u32, u32)>) {
    let mut positions = vec![(0, 0); cells.len()];
    let mut next_x = 0;
    let mut next_y = 0;
    let mut row_height = 0;
    let mut used_width = 0;
    for &i in order {
        let (_, w, h) = cells[i];
        if next_x > 0 && next_x + w > limit {
            next_x = 0;
            next_y += row_height;
            row_height = 0;
        }
        positions[i] = (next_x, next_y);
        next_x += w;
        used_width = used_width.max(next_x);
        row_height = row_height.max(h);
    }
    (used_width, next_y + row_height, positions)
}

fn apply_constraint(width: u32, height: u32, constraint: DimensionsConstraint) -> (u32, u32) {
    match constraint {
        DimensionsConstraint::Tight => (width, height),
        DimensionsConstraint::Square => {
            let side = width.max(height);
            (side, side)
        }
        DimensionsConstraint::PowerOfTwoSquare => {
            let side = width.max(height).next_power_of_two();
            (side, side)
        }
        DimensionsConstraint::PowerOfTwoRectangle => {
            (width.next_power_of_two(), height.next_power_of_two())
        }
    }
}
