//! Integration tests for msdf-text-render layout.

use std::sync::Arc;
use std::thread;

use glam::{Mat4, Vec2, Vec3};
use msdf_text_atlas::{AtlasBuilder, AtlasConfig, AtlasGeometry};
use msdf_text_config::CharsetRange;
use msdf_text_fonts::MemoryFont;
use msdf_text_render::{TextStyle, VertexBatch, layout_text, measure_text};

fn build_geometry(font: &MemoryFont) -> Arc<AtlasGeometry> {
    let config = AtlasConfig::default().with_charset(vec![CharsetRange::new(0x20, 0x5A)]);
    AtlasBuilder::new(config).unwrap().build(font).unwrap().geometry
}

fn printable_font() -> MemoryFont {
    MemoryFont::blocks("blocks", ' '..='Z')
}

/// Left x of each emitted quad
fn quad_lefts(batch: &VertexBatch) -> Vec<f32> {
    batch.vertices().chunks_exact(6).map(|q| q[0].position[0]).collect()
}

#[test]
fn test_two_glyphs_emit_twelve_vertices() {
    let geometry = build_geometry(&printable_font());
    let mut batch = VertexBatch::new();
    let emitted = layout_text(&geometry, Vec2::ZERO, "AB", &TextStyle::new(24.0), &mut batch);

    assert_eq!(emitted, 12);
    assert_eq!(batch.len(), 12);

    // One em spans the line, so the scale is 24 px per em
    let a = geometry.lookup('A').unwrap();
    let b = geometry.lookup('B').unwrap();
    let scale = 24.0 / geometry.metrics().ascent_descent_span();
    let lefts = quad_lefts(&batch);
    assert_eq!(lefts[0], (a.plane_bounds.left * scale).floor() as f32);
    assert_eq!(lefts[1], (a.advance * scale + b.plane_bounds.left * scale).floor() as f32);
}

#[test]
fn test_empty_string_emits_nothing() {
    let geometry = build_geometry(&printable_font());
    let mut batch = VertexBatch::new();
    assert_eq!(layout_text(&geometry, Vec2::ZERO, "", &TextStyle::new(24.0), &mut batch), 0);
    assert!(batch.is_empty());
    assert_eq!(measure_text(&geometry, "", 24.0).lines, 0);
}

#[test]
fn test_layout_is_idempotent() {
    let geometry = build_geometry(&printable_font());
    let style = TextStyle::new(31.0).with_color([0.2, 0.4, 0.6, 1.0]);
    let origin = Vec2::new(13.5, 7.25);
    let mut first = VertexBatch::new();
    let mut second = VertexBatch::new();
    layout_text(&geometry, origin, "HELLO, WORLD?", &style, &mut first);
    layout_text(&geometry, origin, "HELLO, WORLD?", &style, &mut second);
    assert_eq!(first, second);
}

#[test]
fn test_pen_advances_monotonically() {
    let geometry = build_geometry(&printable_font());
    let mut batch = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "ABCDEFGHIJKLMNOPQRSTUVWXYZ", &TextStyle::new(18.0), &mut batch);
    let lefts = quad_lefts(&batch);
    assert_eq!(lefts.len(), 26);
    assert!(lefts.windows(2).all(|w| w[1] >= w[0]), "{lefts:?}");
}

#[test]
fn test_missing_glyph_uses_fallback() {
    let geometry = build_geometry(&printable_font());
    let style = TextStyle::new(24.0);
    let mut missing = VertexBatch::new();
    let mut question = VertexBatch::new();
    // 'a' is outside the charset; '?' is the fallback
    layout_text(&geometry, Vec2::ZERO, "a", &style, &mut missing);
    layout_text(&geometry, Vec2::ZERO, "?", &style, &mut question);
    assert_eq!(missing.len(), 6);
    assert_eq!(missing, question);
}

#[test]
fn test_missing_glyph_without_fallback_is_skipped() {
    let font = MemoryFont::blocks("no fallback", 'A'..='C');
    let geometry = build_geometry(&font);
    let mut batch = VertexBatch::new();
    let emitted = layout_text(&geometry, Vec2::ZERO, "AzB", &TextStyle::new(24.0), &mut batch);
    assert_eq!(emitted, 12);
}

#[test]
fn test_whitespace_advances_without_quad() {
    let geometry = build_geometry(&printable_font());
    let style = TextStyle::new(24.0);
    let mut spaced = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "A B", &style, &mut spaced);
    assert_eq!(spaced.len(), 12);

    let mut tight = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "AB", &style, &mut tight);
    assert!(quad_lefts(&spaced)[1] > quad_lefts(&tight)[1]);
}

#[test]
fn test_kerning_applies_only_between_pairs() {
    let font = printable_font().with_kerning('A', 'V', -0.25).with_kerning('V', '?', -0.5);
    let geometry = build_geometry(&font);
    let plain = build_geometry(&printable_font());
    let style = TextStyle::new(20.0);

    let mut kerned = VertexBatch::new();
    let mut unkerned = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "AV", &style, &mut kerned);
    layout_text(&plain, Vec2::ZERO, "AV", &style, &mut unkerned);
    let shift = quad_lefts(&unkerned)[1] - quad_lefts(&kerned)[1];
    assert!((4.0..=6.0).contains(&shift), "shift {shift}");

    // A trailing glyph has no next character, so its advance is unkerned
    let with_pair = measure_text(&geometry, "V", 20.0);
    let without = measure_text(&plain, "V", 20.0);
    assert_eq!(with_pair.width, without.width);
}

#[test]
fn test_newline_starts_new_line() {
    let geometry = build_geometry(&printable_font());
    let style = TextStyle::new(24.0);
    let mut batch = VertexBatch::new();
    layout_text(&geometry, Vec2::new(5.0, 0.0), "AB\nA", &style, &mut batch);
    assert_eq!(batch.len(), 18);

    let quads: Vec<_> = batch.vertices().chunks_exact(6).collect();
    // Same glyph at the start of both lines: same x, one line lower
    assert_eq!(quads[0][0].position[0], quads[2][0].position[0]);
    let line_height = geometry.metrics().line_height * 24.0 / geometry.metrics().ascent_descent_span();
    let dy = quads[2][0].position[1] - quads[0][0].position[1];
    assert!((f64::from(dy) - line_height).abs() <= 1.0);

    let extent = measure_text(&geometry, "AB\nA", 24.0);
    assert_eq!(extent.lines, 2);
    assert!(extent.height > 24.0);
}

#[test]
fn test_measure_matches_layout_advance() {
    let geometry = build_geometry(&printable_font());
    let extent = measure_text(&geometry, "ABC", 24.0);
    let scale = 24.0 / geometry.metrics().ascent_descent_span();
    let expected: f64 = "ABC"
        .chars()
        .map(|c| geometry.lookup(c).unwrap().advance * scale)
        .sum();
    assert!((f64::from(extent.width) - expected).abs() < 1e-3);
    assert_eq!(extent.lines, 1);
    assert!((extent.height - 24.0).abs() < 1e-3);
}

#[test]
fn test_transform_applied_after_snapping() {
    let geometry = build_geometry(&printable_font());
    let offset = Vec3::new(0.25, 0.5, 0.0);
    let style = TextStyle::new(24.0);
    let mut plain = VertexBatch::new();
    let mut moved = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "A", &style, &mut plain);
    layout_text(
        &geometry,
        Vec2::ZERO,
        "A",
        &style.with_transform(Mat4::from_translation(offset)),
        &mut moved,
    );
    assert_eq!(moved.vertices()[0].position[0], plain.vertices()[0].position[0] + 0.25);
    assert_eq!(moved.vertices()[0].position[1], plain.vertices()[0].position[1] + 0.5);
}

#[test]
fn test_concurrent_layout_with_private_batches() {
    let geometry = build_geometry(&printable_font());
    let mut expected = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "CONCURRENT", &TextStyle::new(16.0), &mut expected);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let geometry = Arc::clone(&geometry);
            thread::spawn(move || {
                let mut batch = VertexBatch::new();
                layout_text(&geometry, Vec2::ZERO, "CONCURRENT", &TextStyle::new(16.0), &mut batch);
                batch
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_uvs_inside_unit_square() {
    let geometry = build_geometry(&printable_font());
    let mut batch = VertexBatch::new();
    layout_text(&geometry, Vec2::ZERO, "XYZ?", &TextStyle::new(40.0), &mut batch);
    for vertex in batch.vertices() {
        let [u, v] = vertex.tex_coords;
        assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v));
    }
}
