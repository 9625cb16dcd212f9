//! Persistence and configuration tests (no network)
//!
//! Covers:
//! - JsonFileStore missing/round-trip/corrupt paths
//! - Config YAML defaults and validation

use std::fs;

use weather_dashboard::{CityStore, Config, JsonFileStore, StorageError};

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("none.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_overwrites_whole_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("cities.json"));

    store.save(&["Paris".to_string(), "Rome".to_string()]).unwrap();
    store.save(&["Rome".to_string()]).unwrap();

    assert_eq!(store.load().unwrap(), ["Rome"]);
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({ "savedCities": ["Rome"] }));
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cities.json");
    fs::write(&path, "not json").unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StorageError::Serde(_)));
}

#[test]
fn yaml_fills_in_defaults() {
    let config = Config::from_yaml(
        r#"
api_key: abc123
request_timeout_secs: 15
device_location:
  lat: 52.52
  lon: 13.40
"#,
    )
    .unwrap();

    assert_eq!(config.api_key, "abc123");
    assert_eq!(config.weather_base, "https://api.openweathermap.org");
    assert_eq!(config.ip_services.len(), 2);
    assert_eq!(config.ip_lookup_timeout_secs, 5);
    assert_eq!(config.geolocation_timeout_secs, 20);
    assert_eq!(config.request_timeout().map(|d| d.as_secs()), Some(15));
    assert_eq!(config.device_location.map(|c| c.lat), Some(52.52));
    assert!(config.validate().is_ok());
}

#[test]
fn config_file_errors_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "api_key: [unclosed").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("config.yaml"));
}

#[test]
fn empty_api_key_fails_validation() {
    let config = Config::default();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("missing API key"));
}
