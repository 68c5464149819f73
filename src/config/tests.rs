//! Configuration tests

use super::*;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config, parsed);
}

#[test]
fn test_config_from_file() {
    let mut config = Config::default();
    config.schema_paths = vec![PathBuf::from("lists"), PathBuf::from("~/shared-lists")];
    config.validation.strict = true;
    config.validation.max_fields = Some(50);
    config.output.format = OutputFormat::Json;

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.schema_paths, vec![PathBuf::from("schemas")]);
    assert_eq!(config.include_patterns, vec!["**/*.dsl".to_string()]);
    assert!(config.validation.allow_unknown_fields);
    assert!(config.output.pretty);
    assert_eq!(config.output.format, OutputFormat::Text);
}

#[test]
fn test_config_validation() {
    assert!(Config::default().validate().is_ok());

    let mut config = Config::default();
    config.version = "2.0".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.schema_paths.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.exclude_patterns.push("[unclosed".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.validation.max_fields = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_options_follow_config() {
    let config = ValidationConfig {
        strict: true,
        allow_unknown_fields: false,
        max_fields: Some(10),
    };
    let schema_options = config.schema_options();
    assert!(schema_options.strict);
    assert_eq!(schema_options.max_fields, Some(10));
    assert!(!config.form_options().allow_unknown_fields);
}

#[test]
fn test_output_format_parsing() {
    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    assert!("xml".parse::<OutputFormat>().is_err());
}
