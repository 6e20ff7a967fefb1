//! End-to-end config scenarios: load from disk, validate, resolve refs.

use std::fs;
use std::path::PathBuf;

use crate::config::{load_and_validate_config, Backend, ConfigNode, DeviceCategory};
use crate::errors::{ConfigError, ValidationError};
use crate::registry::DuplicatePolicy;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_nas_pipeline_yaml_loading() {
    let config = load_and_validate_config("configs/nas-pipeline.yaml").unwrap();

    assert_eq!(config.general().backend, Backend::PyTorch);
    assert_eq!(config.general().device_category, DeviceCategory::Gpu);
    assert_eq!(config.general().registration, DuplicatePolicy::Warn);
    assert_eq!(
        config.step_names().collect::<Vec<_>>(),
        vec!["nas", "fully_train"]
    );

    let fully_train = config.step("fully_train").unwrap();
    // inherited from nas
    assert!(fully_train.get("estimator").is_some());
    // overridden
    assert_eq!(fully_train.get("epochs"), Some(&ConfigNode::Int(3)));
    // callbacks are never inherited; this one is the step's own
    let callbacks = fully_train.get("callbacks").and_then(ConfigNode::as_sequence).unwrap();
    assert_eq!(callbacks.len(), 1);
    assert_eq!(callbacks[0].get("type"), Some(&ConfigNode::from("TrainerReporter")));
    assert!(fully_train.get("ref").is_none());
}

#[test]
fn test_chained_ref_yaml_is_rejected() {
    let err = load_and_validate_config("configs/invalid-ref.yaml").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ChainedRef { ref path, ref inner } if path == "tune" && inner == "nas"
    ));
}

#[test]
fn ref_into_nested_item() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "nested.yaml",
        r#"
pipeline: [nas, fully_train]
nas:
  trainer:
    epochs: 50
    optimizer: {type: SGD, lr: 0.1}
    callbacks: [TrainerReporter]
fully_train:
  trainer:
    ref: nas.trainer
    optimizer: {lr: 0.01}
"#,
    );

    let config = load_and_validate_config(&path).unwrap();
    let trainer = config.step("fully_train").unwrap().get("trainer").unwrap();
    assert_eq!(trainer.get("epochs"), Some(&ConfigNode::Int(50)));
    assert_eq!(trainer.get_path("optimizer.type"), Some(&ConfigNode::from("SGD")));
    assert_eq!(trainer.get_path("optimizer.lr"), Some(&ConfigNode::Float(0.01)));
    assert!(trainer.get("callbacks").is_none());

    // the referenced node is left untouched
    let source = config.step("nas").unwrap().get("trainer").unwrap();
    assert_eq!(source.get_path("optimizer.lr"), Some(&ConfigNode::Float(0.1)));
}

#[test]
fn dangling_ref_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "dangling.yaml",
        "pipeline: [fully_train]\nfully_train:\n  ref: nas.trainer\n",
    );

    let err = load_and_validate_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::DanglingRef { ref path } if path == "nas.trainer"));
}

#[test]
fn structural_errors_surface_before_refs() {
    struct TestCase {
        name: &'static str,
        yaml: &'static str,
    }

    let test_cases = vec![
        TestCase {
            name: "no pipeline key",
            yaml: "nas: {epochs: 1}\n",
        },
        TestCase {
            name: "pipeline is a string",
            yaml: "pipeline: nas\nnas: {epochs: 1}\n",
        },
        TestCase {
            name: "step section missing",
            yaml: "pipeline: [nas, fully_train]\nnas: {epochs: 1}\n",
        },
    ];

    let dir = tempfile::tempdir().unwrap();
    for tc in test_cases {
        let path = write(&dir, "case.yaml", tc.yaml);
        let result = load_and_validate_config(&path);
        assert!(
            matches!(result, Err(ConfigError::Validation(_))),
            "{}: {:?}",
            tc.name,
            result.map(|c| c.step_names().count())
        );
    }
}

#[test]
fn bad_general_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "general.yaml",
        "general: {backend: jax}\npipeline: [nas]\nnas: {epochs: 1}\n",
    );
    let err = load_and_validate_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::General { .. }));
}

#[test]
fn missing_step_names_the_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "missing.yaml", "pipeline: [hpo]\n");
    let err = load_and_validate_config(&path).unwrap_err();
    assert_eq!(
        err.to_string(),
        ConfigError::Validation(ValidationError::MissingPipelineStep {
            step: "hpo".to_string()
        })
        .to_string()
    );
}
