use msdf_text_fonts::{
    FontFace, FontLibrary, FontLoadError, FontMetrics, GlyphOutline, MemoryFont, OutlineSource,
};
use std::path::Path;

#[test]
fn test_load_missing_file_is_io_error() {
    let library = FontLibrary::new();
    let result = library.load_font(Path::new("/definitely/not/a/font.ttf"));
    assert!(matches!(result, Err(FontLoadError::Io { .. })));
}

#[test]
fn test_load_invalid_data() {
    let library = FontLibrary::new();
    let result = library.load_font_data(b"not a font".to_vec(), 0);
    assert!(matches!(result, Err(FontLoadError::InvalidData(_))));
}

#[test]
fn test_unknown_system_family_not_found() {
    let mut library = FontLibrary::new();
    let result = library.load_system_font("No Such Family 7f3a91");
    assert!(matches!(result, Err(FontLoadError::NotFound(_))));
}

#[test]
fn test_memory_font_lookup() {
    let font = MemoryFont::blocks("blocks", 'A'..='C');
    assert_eq!(font.glyph_count(), 3);
    assert!(font.outline('A').is_some());
    assert!(font.outline('D').is_none());
    assert_eq!(font.name(), "blocks");
}

#[test]
fn test_memory_font_whitespace_is_blank() {
    let font = MemoryFont::blocks("blocks", [' ', 'x']);
    let space = font.outline(' ').unwrap();
    assert!(space.is_empty());
    assert!(space.advance > 0.0);
    assert!(!font.outline('x').unwrap().is_empty());
}

#[test]
fn test_memory_font_kerning_defaults_to_zero() {
    let mut glyph = GlyphOutline::new(0.5);
    glyph.add_rect(0.0, 0.0, 0.4, 0.7);
    let font = MemoryFont::new("kerned", FontMetrics::default())
        .with_glyph('A', glyph.clone())
        .with_glyph('V', glyph)
        .with_kerning('A', 'V', -0.08);
    assert_eq!(font.kerning('A', 'V'), -0.08);
    assert_eq!(font.kerning('V', 'A'), 0.0);
}

/// Forwards everything except `kerning_pairs`, so the trait default is used
struct PairwiseOnly(MemoryFont);

impl OutlineSource for PairwiseOnly {
    fn metrics(&self) -> FontMetrics {
        self.0.metrics()
    }

    fn outline(&self, character: char) -> Option<GlyphOutline> {
        self.0.outline(character)
    }

    fn kerning(&self, left: char, right: char) -> f64 {
        self.0.kerning(left, right)
    }
}

fn sorted(mut pairs: Vec<((char, char), f64)>) -> Vec<((char, char), f64)> {
    pairs.sort_by_key(|(pair, _)| *pair);
    pairs
}

#[test]
fn test_kerning_pairs_limited_to_requested_chars() {
    let font = MemoryFont::blocks("kerned", ['A', 'V', 'W', 'T'])
        .with_kerning('A', 'V', -0.08)
        .with_kerning('V', 'A', -0.06)
        .with_kerning('A', 'W', -0.05)
        .with_kerning('T', 'A', 0.0);
    let chars = ['A', 'V', 'T'];

    let listed = sorted(font.kerning_pairs(&chars));
    assert_eq!(listed, vec![(('A', 'V'), -0.08), (('V', 'A'), -0.06)]);
    assert_eq!(sorted(PairwiseOnly(font).kerning_pairs(&chars)), listed);
}

/// A real face from the system font database, if any common family is installed
fn any_system_face() -> Option<FontFace> {
    let mut library = FontLibrary::new();
    ["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial", "Helvetica"]
        .into_iter()
        .find_map(|family| library.load_system_font(family).ok())
}

#[test]
fn test_system_face_outlines_metrics_and_kerning() {
    let Some(face) = any_system_face() else {
        eprintln!("no common system font installed, skipping");
        return;
    };

    let metrics = face.metrics();
    assert!(metrics.ascender > 0.0);
    assert!(metrics.descender <= 0.0);
    assert!(metrics.line_height > 0.0);

    let outline = face.outline('A').expect("face maps 'A'");
    assert!(outline.advance > 0.0);
    assert!(outline.contour_count() >= 1);
    assert!(face.outline(' ').is_some_and(|space| space.is_empty()));

    // Enumerated pairs must agree with per-pair lookups
    let chars: Vec<char> = ('A'..='Z').chain('a'..='z').chain(['.', ',']).collect();
    let mut pairwise = Vec::new();
    for &left in &chars {
        for &right in &chars {
            let adjustment = face.kerning(left, right);
            if adjustment != 0.0 {
                pairwise.push(((left, right), adjustment));
            }
        }
    }
    assert_eq!(sorted(face.kerning_pairs(&chars)), sorted(pairwise));
}
