use crate::util::config::{ConfigError, OptimizeConfig};
use crate::util::logger::LogLevel;

#[test]
fn test_defaults_from_empty_document() {
    let config = OptimizeConfig::from_toml_str("").unwrap();
    assert_eq!(config, OptimizeConfig::default());
    assert!(config.passes.literal_inliner);
    assert!(!config.silence_errors);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_parse_all_keys() {
    let config = OptimizeConfig::from_toml_str(
        r#"
        silence_errors = true
        emit_ast = true
        log_level = "debug"

        [passes]
        literal_inliner = false
        "#,
    )
    .unwrap();

    assert!(config.silence_errors);
    assert!(config.emit_ast);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(!config.passes.literal_inliner);
}

#[test]
fn test_parse_error() {
    let err = OptimizeConfig::from_toml_str("silence_errors = \"yes\"").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().starts_with("Config parse error"));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = OptimizeConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, OptimizeConfig::default());
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("optimize.toml");

    let mut config = OptimizeConfig::default();
    config.emit_ast = true;
    config.log_level = LogLevel::Warn;
    config.save(&path).unwrap();

    assert_eq!(OptimizeConfig::load(&path).unwrap(), config);
}
