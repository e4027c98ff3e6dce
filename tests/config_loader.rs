use conduit::cli::Cli;
use conduit::config::{Config, ConfigError};
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    (dir, path)
}

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "https://conduit.productionready.io/api");
    assert_eq!(config.api.connect_timeout_seconds, 10);
    assert_eq!(config.api.page_size, 10);
    assert!(config.storage.token_path.ends_with("conduit/auth.json"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let (_dir, path) = write_config(
        r#"
[api]
base_url = "http://localhost:3000/api"
"#,
    );

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.api.base_url, "http://localhost:3000/api");
    assert_eq!(config.api.page_size, 10);
    assert_eq!(config.storage, Config::default().storage);
}

#[test]
fn test_full_file() {
    let (_dir, path) = write_config(
        r#"
[api]
base_url = "https://api.example.com/api"
connect_timeout_seconds = 3
page_size = 20

[storage]
token_path = "/var/lib/conduit/token.json"
"#,
    );

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.api.connect_timeout_seconds, 3);
    assert_eq!(config.api.page_size, 20);
    assert_eq!(config.storage.token_path, PathBuf::from("/var/lib/conduit/token.json"));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = write_config("[api\nbase_url = ");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_validation_rejects_bad_values() {
    let (_dir, path) = write_config("[api]\nbase_url = \"ftp://example.com\"\n");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ValidationError { .. })
    ));

    let (_dir, path) = write_config("[api]\npage_size = 0\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("page_size"));

    let (_dir, path) = write_config("[api]\nbase_url = \"not a url\"\n");
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_cli_overrides_are_validated() {
    let (_dir, path) = write_config("[api]\npage_size = 5\n");
    let path_arg = path.to_str().unwrap();

    let cli = Cli::parse_from(["conduit", "--config", path_arg, "--api-url", "http://127.0.0.1:9/api"]);
    let config = cli.load_config().unwrap();
    assert_eq!(config.api.base_url, "http://127.0.0.1:9/api");
    assert_eq!(config.api.page_size, 5);

    let cli = Cli::parse_from(["conduit", "--config", path_arg, "--api-url", "nope"]);
    assert!(matches!(cli.load_config(), Err(ConfigError::ValidationError { .. })));
}
