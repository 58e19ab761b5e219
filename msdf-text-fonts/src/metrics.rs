//! Font-wide vertical and horizontal metrics.

/// Font-wide metrics in em-normalized units.
///
/// `descender` is negative (below the baseline), so `ascender - descender`
/// is the full line box height before the line gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Size of one em in the units of every other field (1.0 when normalized)
    pub em_size: f64,
    /// Distance from the baseline to the top of the line box
    pub ascender: f64,
    /// Distance from the baseline to the bottom of the line box (negative)
    pub descender: f64,
    /// Baseline-to-baseline distance
    pub line_height: f64,
    /// Extra spacing the font requests between lines
    pub line_gap: f64,
    /// Widest advance in the font
    pub max_advance: f64,
    /// Vertical position of the underline relative to the baseline
    pub underline_y: f64,
    /// Thickness of the underline stroke
    pub underline_thickness: f64,
}

impl FontMetrics {
    /// Build metrics from raw font-unit values.
    ///
    /// `descent` follows the positive-below-baseline convention used by
    /// swash and is flipped to a negative descender here.
    pub fn from_font_units(
        units_per_em: f64,
        ascent: f64,
        descent: f64,
        line_gap: f64,
        max_advance: f64,
        underline_offset: f64,
        underline_thickness: f64,
    ) -> Self {
        let upem = if units_per_em > 0.0 {
            units_per_em
        } else {
            1.0
        };
        let ascender = ascent / upem;
        let descender = -descent.abs() / upem;
        let line_gap = line_gap / upem;
        Self {
            em_size: 1.0,
            ascender,
            descender,
            line_height: ascender - descender + line_gap,
            line_gap,
            max_advance: max_advance / upem,
            underline_y: underline_offset / upem,
            underline_thickness: underline_thickness / upem,
        }
    }

    /// Height of the line box without the line gap
    pub fn ascent_descent_span(&self) -> f64 {
        self.ascender - self.descender
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            em_size: 1.0,
            ascender: 0.8,
            descender: -0.2,
            line_height: 1.2,
            line_gap: 0.2,
            max_advance: 1.0,
            underline_y: -0.1,
            underline_thickness: 0.05,
        }
    }
}
