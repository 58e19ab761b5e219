//! Integration tests for the debug artifacts and config bootstrap.

use msdf_text::atlas::{AtlasLayout, PixelFormat};
use msdf_text::cli::{AtlasArgs, init_config};
use msdf_text::config::CharsetRange;
use msdf_text::fonts::MemoryFont;
use msdf_text::output::{IMAGE_FILE_NAME, LAYOUT_FILE_NAME, write_artifacts};
use msdf_text::{AtlasBuilder, AtlasConfig, FontAtlas};
use tempfile::TempDir;

fn build(format: PixelFormat) -> FontAtlas {
    let font = MemoryFont::blocks("blocks", ('A'..='H').chain(['?', ' ']));
    let config = AtlasConfig::default()
        .with_charset(vec![CharsetRange::new(0x41, 0x48)])
        .with_pixel_format(format);
    AtlasBuilder::new(config).unwrap().build(&font).unwrap()
}

#[test]
fn test_writes_png_and_json() {
    let dir = TempDir::new().unwrap();
    let atlas = build(PixelFormat::Msdf);
    let paths = write_artifacts(&atlas, dir.path()).unwrap();

    let image_path = paths.image.expect("non-empty atlas writes an image");
    assert_eq!(image_path, dir.path().join(IMAGE_FILE_NAME));
    assert_eq!(paths.layout, dir.path().join(LAYOUT_FILE_NAME));

    let image = image::open(&image_path).unwrap();
    assert_eq!(image.color(), image::ColorType::Rgb8);
    assert_eq!(
        (image.width(), image.height()),
        atlas.geometry.dimensions()
    );
    assert_eq!(image.to_rgb8().into_raw(), atlas.bitmap.pixels());

    let json = std::fs::read_to_string(&paths.layout).unwrap();
    let layout = AtlasLayout::from_json(&json).unwrap();
    assert_eq!(layout, AtlasLayout::from_geometry(&atlas.geometry));
    assert_eq!(layout.glyphs.len(), atlas.geometry.len());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["atlas"]["type"], "msdf");
    assert_eq!(value["atlas"]["yOrigin"], "top");
}

#[test]
fn test_image_color_type_follows_pixel_format() {
    for (format, color) in [
        (PixelFormat::Sdf, image::ColorType::L8),
        (PixelFormat::Mtsdf, image::ColorType::Rgba8),
    ] {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(&build(format), dir.path()).unwrap();
        let image = image::open(paths.image.unwrap()).unwrap();
        assert_eq!(image.color(), color, "{format:?}");
    }
}

#[test]
fn test_empty_atlas_writes_layout_only() {
    let dir = TempDir::new().unwrap();
    let font = MemoryFont::blocks("blocks", ['A']);
    let config = AtlasConfig::default().with_charset(Vec::new());
    let atlas = AtlasBuilder::new(config).unwrap().build(&font).unwrap();
    assert_eq!(atlas.geometry.dimensions(), (0, 0));

    let paths = write_artifacts(&atlas, dir.path().join("nested").as_path()).unwrap();
    assert!(paths.image.is_none());
    assert!(paths.layout.exists());
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config").join("atlas.yaml");

    init_config(&path, false).unwrap();
    assert_eq!(AtlasConfig::load(&path).unwrap(), AtlasConfig::default());

    assert!(init_config(&path, false).is_err());
    init_config(&path, true).unwrap();
}

#[test]
fn test_resolve_config_applies_flags_over_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("atlas.yaml");
    AtlasConfig::default()
        .with_em_size(20.0)
        .with_padding(3)
        .save(&path)
        .unwrap();

    let args = AtlasArgs {
        config: Some(path),
        em_size: Some(36.0),
        ..Default::default()
    };
    let config = args.resolve_config().unwrap();
    assert_eq!(config.em_size, 36.0);
    assert_eq!(config.padding, 3);
}
