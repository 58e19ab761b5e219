use msdf_text_config::{
    AtlasConfig, CharsetRange, ColoringStrategy, ConfigError, DimensionsConstraint, PixelFormat,
    UnplacedGlyphPolicy,
};
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = AtlasConfig::default();
    assert_eq!(config.charset, vec![CharsetRange::new(0x20, 0xFF)]);
    assert_eq!(config.em_size, 32.0);
    assert_eq!(config.pixel_range, 2.0);
    assert_eq!(config.padding, 1);
    assert_eq!(config.miter_limit, 1.0);
    assert_eq!(config.coloring, ColoringStrategy::InkTrap);
    assert_eq!(config.angle_threshold, 3.0);
    assert_eq!(config.coloring_seed, 0);
    assert_eq!(config.worker_count, 8);
    assert!(config.overlap_support);
    assert_eq!(config.pixel_format, PixelFormat::Msdf);
    assert_eq!(config.dimensions, DimensionsConstraint::Tight);
    assert_eq!(config.unplaced_glyphs, UnplacedGlyphPolicy::Abort);
    assert_eq!(config.fallback_char, '?');
    assert!(config.kerning);
    assert_eq!(config.charset_len(), 224);
}

#[test]
fn test_config_builder_methods() {
    let config = AtlasConfig::new()
        .with_em_size(48.0)
        .with_pixel_range(4.0)
        .with_worker_count(2)
        .with_coloring(ColoringStrategy::ByDistance)
        .with_charset(vec![CharsetRange::new(0x41, 0x5A)]);
    assert_eq!(config.em_size, 48.0);
    assert_eq!(config.pixel_range, 4.0);
    assert_eq!(config.worker_count, 2);
    assert_eq!(config.coloring, ColoringStrategy::ByDistance);
    assert_eq!(config.charset_len(), 26);
}

#[test]
fn test_config_yaml_serialization() {
    let config = AtlasConfig::default();
    let yaml = serde_yaml_ng::to_string(&config).unwrap();
    assert!(yaml.contains("em_size: 32.0"));
    assert!(yaml.contains("coloring: ink_trap"));
    assert!(yaml.contains("pixel_format: msdf"));
}

#[test]
fn test_config_yaml_partial_uses_defaults() {
    let yaml = r#"
em_size: 64.0
coloring: by_distance
charset:
  - start: 65
    end: 70
"#;
    let config: AtlasConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.em_size, 64.0);
    assert_eq!(config.coloring, ColoringStrategy::ByDistance);
    assert_eq!(config.charset_len(), 6);
    // Unspecified fields fall back to defaults
    assert_eq!(config.pixel_range, 2.0);
    assert_eq!(config.worker_count, 8);
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("atlas.yaml");

    let config = AtlasConfig::new()
        .with_em_size(40.0)
        .with_padding(3)
        .with_dimensions(DimensionsConstraint::PowerOfTwoSquare);
    config.save(&path).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("yaml.tmp").exists());

    let loaded = AtlasConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_or_default_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.yaml");
    let config = AtlasConfig::load_or_default(&path).unwrap();
    assert_eq!(config, AtlasConfig::default());
}

#[test]
fn test_config_load_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atlas.yaml");
    std::fs::write(&path, "em_size: [not a number").unwrap();
    assert!(matches!(
        AtlasConfig::load(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_load_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atlas.yaml");
    std::fs::write(&path, "worker_count: 0\n").unwrap();
    assert!(matches!(
        AtlasConfig::load(&path),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_config_validate() {
    assert!(AtlasConfig::default().validate().is_ok());
    assert!(AtlasConfig::new().with_em_size(0.0).validate().is_err());
    assert!(AtlasConfig::new().with_pixel_range(-1.0).validate().is_err());
    assert!(AtlasConfig::new().with_max_dimension(0).validate().is_err());
    assert!(
        AtlasConfig::new()
            .with_charset(vec![CharsetRange::new(0x7A, 0x61)])
            .validate()
            .is_err()
    );
}

#[test]
fn test_config_validate_padding_bounded_by_max_dimension() {
    assert!(
        AtlasConfig::new()
            .with_max_dimension(64)
            .with_padding(32)
            .validate()
            .is_ok()
    );
    assert!(matches!(
        AtlasConfig::new()
            .with_max_dimension(64)
            .with_padding(33)
            .validate(),
        Err(ConfigError::Validation(_))
    ));
    assert!(matches!(
        AtlasConfig::new().with_padding(u32::MAX / 2 + 1).validate(),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_config_validate_charset_past_last_code_point() {
    assert!(
        AtlasConfig::new()
            .with_charset(vec![CharsetRange::new(0x10FF00, 0x10FFFF)])
            .validate()
            .is_ok()
    );
    assert!(matches!(
        AtlasConfig::new()
            .with_charset(vec![CharsetRange::new(0x41, u32::MAX)])
            .validate(),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_config_path_ends_with_atlas_yaml() {
    let path = AtlasConfig::config_path();
    assert!(path.ends_with("atlas.yaml"));
}
