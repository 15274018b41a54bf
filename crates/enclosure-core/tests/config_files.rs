//! RON enclosure documents

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use enclosure_core::{
    BaseType, BoxConfig, ConfigError, ConfigFileError, EnclosureFile, FilletType, VariantKind,
    build, presets,
};

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs")
        .join(name)
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("battery.ron");
    let file = EnclosureFile::new(VariantKind::Battery, presets::gm328a_battery());
    file.save(&path).unwrap();

    let loaded = EnclosureFile::load(&path).unwrap();
    assert_eq!(loaded, file);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = EnclosureFile::load(dir.path().join("missing.ron"));
    assert!(matches!(result, Err(ConfigFileError::Io(_))));
}

#[test]
fn test_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ron");
    std::fs::write(&path, "(variant: Case, config: (dim_top: (1.0, 2.0)").unwrap();
    assert!(matches!(
        EnclosureFile::load(&path),
        Err(ConfigFileError::Deserialize(_))
    ));
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fused.ron");
    let mut config = presets::gm328a_case();
    config.base_type = BaseType::Fused;
    config.fillet_type_bottom = FilletType::IndependentFillet;
    // saving does not validate, loading does
    EnclosureFile::new(VariantKind::Plain, config).save(&path).unwrap();

    assert!(matches!(
        EnclosureFile::load(&path),
        Err(ConfigFileError::Invalid(ConfigError::IndependentFilletOnFusedBase))
    ));
}

#[test]
fn test_sample_case_matches_preset() {
    let file = EnclosureFile::load(sample("gm328a_case.ron")).unwrap();
    assert_eq!(file.variant, VariantKind::Case);

    let preset = presets::gm328a_case();
    for (a, b) in [
        (file.config.dim_top, preset.dim_top),
        (file.config.dim_bottom, preset.dim_bottom),
        (file.config.dim_wall, preset.dim_wall),
        (file.config.clearance, preset.clearance),
    ] {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-9);
    }
    assert_eq!(file.config.snap_top, preset.snap_top);
    assert_eq!(file.config.fillet_type_top, preset.fillet_type_top);
}

#[test]
fn test_samples_build() {
    for (name, expected) in [
        ("gm328a_case.ron", "gm328a case"),
        ("gm328a_battery.ron", "gm328a battery"),
    ] {
        let file = EnclosureFile::load(sample(name)).unwrap();
        let enclosure = build(file.variant, file.config).unwrap();
        assert_eq!(enclosure.name(), expected);
    }
}

#[test]
fn test_unknown_fields_are_ignored() {
    let result = BoxConfig::from_ron_str(
        "(dim_top: (10.0, 10.0, 1.0), dim_bottom: (10.0, 10.0, 1.0), \
         dim_wall: (1.0, 1.0, 10.0), clearance: (0.2, 0.2, 0.2), lid_colour: 3)",
    );
    let config = result.unwrap();
    assert_eq!(config.fillet_type_top, FilletType::IndependentChamfer);
    assert_abs_diff_eq!(config.corners_size, 3.5, epsilon = 1e-12);
}
