//! Configuration loading tests
//!
//! `Settings::new` reads `config.toml` from the working directory, so
//! these tests change the process CWD and must not run concurrently.

use serial_test::serial;

use gatherly::config::Settings;

const FULL_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 9090

[database]
url = "postgresql://localhost/gatherly_test"
max_connections = 5
min_connections = 1

[redis]
url = "redis://localhost:6379"
prefix = "gatherly-test:"

[auth]
session_cookie = "session"
session_ttl_seconds = 3600
bcrypt_cost = 4

[media]
root = "media"

[pagination]
events_per_page = 5

[logging]
level = "debug"
file_path = "logs"
"#;

#[test]
#[serial]
fn test_settings_load_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), FULL_CONFIG).unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let settings = Settings::new().expect("settings should load");
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 9090);
    assert_eq!(settings.database.max_connections, 5);
    assert_eq!(settings.redis.prefix, "gatherly-test:");
    assert_eq!(settings.pagination.events_per_page, 5);
    assert!(settings.validate().is_ok());
}

#[test]
#[serial]
fn test_settings_missing_file_is_an_error() {
    // No config.toml and no environment overrides: required fields are
    // absent and deserialization fails.
    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    assert!(Settings::new().is_err());
}

#[test]
#[serial]
fn test_invalid_level_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let broken = FULL_CONFIG.replace("level = \"debug\"", "level = \"loud\"");
    std::fs::write(dir.path().join("config.toml"), broken).unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let settings = Settings::new().expect("settings should load");
    assert!(settings.validate().is_err());
}
