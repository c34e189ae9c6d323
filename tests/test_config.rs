// Configuration loading from JSON files.

use autoencoder_anomaly::config::{load_config, RunConfig};
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"seed": 7, "epochs": 2, "hidden_width": 32, "bottleneck_width": 4}}"#
    )
    .unwrap();

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.epochs, 2);
    assert_eq!(config.hidden_width, 32);
    // untouched fields keep their defaults
    assert_eq!(config.batch_size, 100);
    assert_eq!(config.train_split_percent, 0.8);
}

#[test]
fn test_load_config_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"learning_rate": -0.5}}"#).unwrap();
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_load_config_rejects_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_load_config_missing_file() {
    assert!(load_config("/nonexistent/run.json").is_err());
}

#[test]
fn test_default_architecture_dimensions() {
    let config = RunConfig::default();
    assert_eq!(config.feature_len(), 784);
    assert_eq!(config.hidden_width, 250);
    assert_eq!(config.bottleneck_width, 10);
}
