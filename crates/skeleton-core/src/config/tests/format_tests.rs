use std::path::Path;

use crate::config::{ConfigFormat, Settings};

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("app.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("APP.JSON")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("app.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("app")), None);
}

#[cfg(feature = "toml-config")]
#[test]
fn test_toml_extension() {
    assert_eq!(ConfigFormat::from_path(Path::new("config/app.toml")), Some(ConfigFormat::Toml));
    assert_eq!(ConfigFormat::from_path(Path::new("app.TOML")), Some(ConfigFormat::Toml));
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_settings() {
    assert_eq!(ConfigFormat::from_path(Path::new("app.yml")), Some(ConfigFormat::Yaml));

    let content = "app:\n  name: skeleton\n  env: production\nserver:\n  addr: 127.0.0.1:0\n";
    let settings = Settings::parse(content, ConfigFormat::Yaml, None).unwrap();
    assert_eq!(settings.app.env, "production");
    assert_eq!(settings.server.addr, "127.0.0.1:0");
}

#[test]
fn test_json_settings() {
    let content = r#"{"app": {"name": "skeleton", "debug": true}, "queue": {"driver": "redis"}}"#;
    let settings = Settings::parse(content, ConfigFormat::Json, None).unwrap();
    assert!(settings.app.debug);
    assert_eq!(settings.queue.driver, "redis");
}

#[test]
fn test_parse_errors_are_readable() {
    let err = ConfigFormat::Json.parse::<Settings>("{not json").unwrap_err();
    assert!(err.starts_with("invalid JSON"));
}
