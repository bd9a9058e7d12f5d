use ld_config::{
    BeamProfile, ConfigBundle, ConfigError, LaserConfiguration, MaterialSpec, load_json,
    load_yaml, save_json,
};

const BUNDLE_YAML: &str = r#"
laser_parameters:
  power_w: 1500.0
  wavelength_nm: 1064.0
  beam_diameter_mm: 4.0
  beam_profile: flat-top
material_parameters:
  name: Al-6061
  thermal_conductivity: 167.0
  specific_heat: 896.0
  density: 2700.0
  melting_point: 933.0
  absorption_coefficient: 0.15
environment_parameters:
  ambient_temperature_k: 280.0
target_parameters:
  component: wing_leading_edge
model_path: models/wing.stp
"#;

#[test]
fn yaml_bundle_loads_and_builds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.yaml");
    std::fs::write(&path, BUNDLE_YAML).unwrap();

    let bundle = load_yaml(&path).unwrap();
    let cfg = bundle.build().unwrap();

    assert_eq!(cfg.laser.beam_profile, BeamProfile::FlatTop);
    assert_eq!(cfg.laser.pulse_duration_s, 1e-3);
    assert_eq!(cfg.environment.ambient_temperature_k, 280.0);
    assert_eq!(cfg.environment.pressure_pa, 101_325.0);
    assert_eq!(cfg.target.component, "wing_leading_edge");
    assert_eq!(cfg.target.resolution, [51, 51]);
    assert_eq!(cfg.material.effective_yield_strength(), 250e6);
    assert_eq!(cfg.model.format(), "stp");
}

#[test]
fn json_bundle_roundtrips_with_preset_material() {
    let bundle = ConfigBundle {
        laser_parameters: Some(LaserConfiguration::new(800.0, 532.0, 3.0)),
        material_parameters: Some(MaterialSpec::Preset {
            preset: "Ti-6Al-4V".to_string(),
        }),
        model_path: Some("blade.x_t".into()),
        ..Default::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    save_json(&path, &bundle).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(loaded, bundle);
    let cfg = loaded.build().unwrap();
    assert_eq!(cfg.material.melting_point, 1933.0);
}

#[test]
fn unsupported_model_extension_is_a_config_error() {
    let yaml = BUNDLE_YAML.replace("models/wing.stp", "models/wing.obj");
    let bundle: ConfigBundle = serde_yaml::from_str(&yaml).unwrap();
    assert!(matches!(
        bundle.build(),
        Err(ConfigError::UnsupportedModelFormat { .. })
    ));
}

#[test]
fn missing_material_section_is_a_config_error() {
    let bundle = ConfigBundle {
        laser_parameters: Some(LaserConfiguration::new(800.0, 532.0, 3.0)),
        model_path: Some("blade.step".into()),
        ..Default::default()
    };
    let err = bundle.build().unwrap_err();
    assert!(format!("{err}").contains("material_parameters"));
}
