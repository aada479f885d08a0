//! Configuration resolution and graceful degradation tests
//!
//! Tests that manipulate SONGMARK_ROOT_FOLDER are marked with #[serial]
//! so they never race on the process environment.

use serial_test::serial;
use songmark_common::config::{
    CompiledDefaults, ConfigOrigin, RootFolderInitializer, RootFolderResolver, StorageKind, TomlConfig,
    DEFAULT_OEMBED_ENDPOINT, DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use std::env;
use std::io::Write;
use std::path::PathBuf;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new().resolve();

    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(root_folder, defaults.root_folder);
}

#[test]
#[serial]
fn test_resolver_cli_beats_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/songmark-env");

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(Some(PathBuf::from("/tmp/songmark-cli")))
        .with_toml_value(Some(PathBuf::from("/tmp/songmark-toml")))
        .resolve();

    env::remove_var(ROOT_FOLDER_ENV);
    assert_eq!(root_folder, PathBuf::from("/tmp/songmark-cli"));
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/songmark-env");

    let root_folder = RootFolderResolver::new()
        .with_toml_value(Some(PathBuf::from("/tmp/songmark-toml")))
        .resolve();

    env::remove_var(ROOT_FOLDER_ENV);
    assert_eq!(root_folder, PathBuf::from("/tmp/songmark-env"));
}

#[test]
#[serial]
fn test_resolver_falls_back_to_toml() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new()
        .with_toml_value(Some(PathBuf::from("/tmp/songmark-toml")))
        .resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/songmark-toml"));
}

#[test]
fn test_missing_toml_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let config = TomlConfig::load_or_default(Some(&missing));

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.storage, StorageKind::Sqlite);
    assert_eq!(config.oembed_endpoint, DEFAULT_OEMBED_ENDPOINT);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_partial_toml_file_fills_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 6000").unwrap();
    writeln!(file, "storage = \"memory\"").unwrap();
    writeln!(file, "[logging]").unwrap();
    writeln!(file, "level = \"debug\"").unwrap();

    let config = TomlConfig::load_or_default(Some(file.path()));

    assert_eq!(config.port, 6000);
    assert_eq!(config.storage, StorageKind::Memory);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.oembed_timeout_secs, 10);
    assert!(config.root_folder.is_none());
}

#[test]
fn test_invalid_toml_file_degrades_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();

    assert!(TomlConfig::from_file(file.path()).is_err());

    let config = TomlConfig::load_or_default(Some(file.path()));
    assert_eq!(config.port, DEFAULT_PORT);
}

#[test]
fn test_load_with_origin_reports_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let (_, origin) = TomlConfig::load_with_origin(Some(&missing));
    assert_eq!(origin, ConfigOrigin::Missing(missing));
    assert!(origin.uses_defaults());

    let mut valid = tempfile::NamedTempFile::new().unwrap();
    writeln!(valid, "port = 6001").unwrap();
    let (config, origin) = TomlConfig::load_with_origin(Some(valid.path()));
    assert_eq!(config.port, 6001);
    assert_eq!(origin, ConfigOrigin::File(valid.path().to_path_buf()));
    assert!(!origin.uses_defaults());

    let mut invalid = tempfile::NamedTempFile::new().unwrap();
    writeln!(invalid, "port = \"not a number\"").unwrap();
    let (config, origin) = TomlConfig::load_with_origin(Some(invalid.path()));
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(matches!(origin, ConfigOrigin::Invalid { ref path, .. } if path == invalid.path()));
}

#[test]
fn test_storage_kind_from_str() {
    assert_eq!("sqlite".parse::<StorageKind>().unwrap(), StorageKind::Sqlite);
    assert_eq!(" Memory ".parse::<StorageKind>().unwrap(), StorageKind::Memory);
    assert!("postgres".parse::<StorageKind>().is_err());
}

#[test]
fn test_initializer_creates_directory_and_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("songmark");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("songmark.db"));
}
