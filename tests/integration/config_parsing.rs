//! Integration tests for configuration and descriptor loading.

use steelkeys::config::{ConfigValue, LightingConfig, open_registry};
use steelkeys::error::SkError;
use steelkeys::keyboard::Keyboard;
use steelkeys::layout::{DescriptorSource, Registry};
use tempfile::TempDir;

use crate::common::fixtures::{DescriptorDir, config_file};
use crate::common::init_test_logging;

#[test]
fn test_same_config_in_every_format() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let json = config_file(
        &dir,
        "lights.json",
        r#"{"letters": {"color": "ff0000"}, "enter": "letters"}"#,
    );
    let yaml = config_file(&dir, "lights.yaml", "letters:\n  color: ff0000\nenter: letters\n");
    let toml = config_file(&dir, "lights.toml", "enter = \"letters\"\n\n[letters]\ncolor = \"ff0000\"\n");

    let descriptors = DescriptorDir::create();
    let registry = Registry::from_dir(descriptors.path()).unwrap();
    let kb = Keyboard::load(&registry, "tiny").unwrap();

    let plans: Vec<_> = [json, yaml, toml]
        .iter()
        .map(|path| kb.plan_config(&LightingConfig::load(path).unwrap()).unwrap())
        .collect();

    for plan in &plans {
        assert_eq!(plan.regions["alphanum"].len(), 3);
        assert_eq!(plan.solo.len(), 1);
    }
    assert_eq!(plans[0], plans[1]);
}

#[test]
fn test_yaml_config_keeps_order() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "order.yml", "c: {color: '000001'}\na: {color: '000002'}\nb: a\n");

    let config = LightingConfig::load(&path).unwrap();
    let names: Vec<&str> = config.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
    assert_eq!(config.get("b"), Some(&ConfigValue::Alias("a".to_string())));
}

#[test]
fn test_malformed_config_file() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "broken.toml", "a = {");

    assert!(matches!(
        LightingConfig::load(&path),
        Err(SkError::ConfigParse(_))
    ));
}

#[test]
fn test_descriptor_dir_overrides_builtin() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let registry = open_registry(Some(descriptors.path())).unwrap();

    assert_eq!(
        registry.source(),
        &DescriptorSource::Directory(descriptors.path().to_path_buf())
    );
    let names: Vec<&str> = registry.list_models().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["tiny", "wide"]);
    assert!(matches!(
        registry.model("gs65"),
        Err(SkError::UnknownModel { .. })
    ));
}

#[test]
fn test_broken_group_is_rejected() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    descriptors.write(
        "layouts/wide.yaml",
        "max_entries_per_packet: 1\n\
         padding: { kind: zero_pad_to_capacity, capacity: 1, trailer: [] }\n\
         regions: { main: { code: 1 } }\n\
         keys: { x: { region: main, keycode: 2 } }\n\
         groups: { g: [x, ghost] }\n",
    );
    let registry = Registry::from_dir(descriptors.path()).unwrap();

    let err = Keyboard::load(&registry, "wide").unwrap_err();
    assert!(matches!(err, SkError::DescriptorInvalid(ref msg) if msg.contains("ghost")));
}

#[test]
fn test_invalid_preset_hex_is_rejected() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    descriptors.write("presets/tiny.yaml", "bad:\n  - 0e zz\n");
    let registry = Registry::from_dir(descriptors.path()).unwrap();

    assert!(matches!(
        Keyboard::load(&registry, "tiny"),
        Err(SkError::DescriptorInvalid(_))
    ));
}

#[test]
fn test_missing_layout_file() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    descriptors.write(
        "models.yaml",
        "ghost:\n  id: { vendor: 1, product: 2 }\n  layout: nowhere\n",
    );
    let registry = Registry::from_dir(descriptors.path()).unwrap();

    assert!(matches!(
        Keyboard::load(&registry, "ghost"),
        Err(SkError::DescriptorInvalid(_))
    ));
}
