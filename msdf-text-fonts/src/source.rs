use crate::metrics::FontMetrics;
use crate::outline::GlyphOutline;

/// Read-only provider of glyph outlines, metrics and kerning.
///
/// Implementations must be shareable across the atlas builder's worker
/// threads. All values are em-normalized.
pub trait OutlineSource: Send + Sync {
    /// Font-wide metrics.
    fn metrics(&self) -> FontMetrics;

    /// Outline and advance for `character`, or `None` when the font has no
    /// glyph for it. Blank glyphs such as the space return an outline with
    /// no commands.
    fn outline(&self, character: char) -> Option<GlyphOutline>;

    /// Horizontal advance adjustment for the pair `left` followed by `right`.
    /// Fonts without kerning data return `0.0`.
    fn kerning(&self, _left: char, _right: char) -> f64 {
        0.0
    }

    /// Every non-zero kerning adjustment between members of `chars`.
    ///
    /// The default queries [`kerning`](Self::kerning) for each ordered pair;
    /// sources that can enumerate their pair tables should override it.
    fn kerning_pairs(&self, chars: &[char]) -> Vec<((char, char), f64)> {
        chars
            .iter()
            .flat_map(|&left| chars.iter().map(move |&right| (left, right)))
            .filter_map(|(left, right)| {
                let adjustment = self.kerning(left, right);
                (adjustment != 0.0 && adjustment.is_finite()).then_some(((left, right), adjustment))
            })
            .collect()
    }

    /// Human-readable name for logs and exported layouts.
    fn name(&self) -> &str {
        "unnamed"
    }
}
