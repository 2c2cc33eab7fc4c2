//! JSON profile definition tests.
#![cfg(feature = "json")]

use std::io::Write;
use tempfile::NamedTempFile;
use wiremask::client::Client;
use wiremask::emulation::{Browser, ProfileDefinition, ProfileRegistry};
use wiremask::http::{BoundaryStyle, PriorityParam, PseudoOrder, SettingId};
use wiremask::tls::TlsFingerprintId;
use wiremask::ProfileError;

const CRAWLER: &str = r#"{
    "name": "internal_crawler",
    "browser": "chrome",
    "version": 119,
    "tls_fingerprint": "chrome_120",
    "http2_settings": [
        { "id": "HEADER_TABLE_SIZE", "value": 65536 },
        { "id": "ENABLE_PUSH", "value": 0 },
        { "id": "INITIAL_WINDOW_SIZE", "value": 6291456 }
    ],
    "window_increment": 15663105,
    "pseudo_header_order": [":method", ":authority", ":scheme", ":path"],
    "header_order": ["host", "user-agent", "accept"],
    "default_headers": [["user-agent", "crawler/1.0"], ["accept", "*/*"]],
    "header_priority": { "stream_dependency": 0, "exclusive": true, "weight": 255 },
    "boundary": "gecko"
}"#;

#[test]
fn test_load_single_definition() {
    let mut registry = ProfileRegistry::with_builtin().unwrap();
    let added = registry.load_json(CRAWLER).unwrap();
    assert_eq!(added, vec!["internal_crawler"]);

    let profile = registry.get("internal crawler").unwrap();
    assert_eq!(profile.browser(), Browser::Chrome);
    assert_eq!(profile.version(), 119);
    assert_eq!(profile.tls_fingerprint(), TlsFingerprintId::Chrome120);
    assert_eq!(profile.http2_settings().get(SettingId::EnablePush), Some(0));
    assert_eq!(profile.pseudo_header_order(), &PseudoOrder::CHROME);
    assert_eq!(profile.default_headers()["user-agent"], "crawler/1.0");
    assert_eq!(profile.header_priority(), PriorityParam::chrome());
    assert_eq!(profile.boundary().style(), Some(BoundaryStyle::Gecko));

    let client = Client::new();
    client.apply_profile(profile);
    assert_eq!(client.wire_config().window_increment, 15663105);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{ "name": "one" }}, {{ "name": "two", "window_increment": 65535 }}]"#
    )
    .unwrap();

    let mut registry = ProfileRegistry::new();
    let added = registry.load_json_file(file.path()).unwrap();
    assert_eq!(added, vec!["one", "two"]);
    assert_eq!(registry.get("two").unwrap().window_increment(), 65535);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ProfileRegistry::new();
    let err = registry
        .load_json_file(dir.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(err, ProfileError::Config(_)));
}

#[test]
fn test_bad_pseudo_order_rejected() {
    let json = r#"{ "name": "p", "pseudo_header_order": [":method", ":method", ":path", ":scheme"] }"#;
    let err = ProfileDefinition::from_json(json).unwrap_err();
    assert!(matches!(err, ProfileError::Config(_)));
}

#[test]
fn test_unknown_setting_cannot_alias_known_id() {
    let json = r#"{
        "name": "alias",
        "http2_settings": [
            { "id": "HEADER_TABLE_SIZE", "value": 65536 },
            { "id": { "UNKNOWN": 1 }, "value": 4096 }
        ]
    }"#;
    let mut registry = ProfileRegistry::new();
    let err = registry.load_json(json).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidProfile { .. }));
    assert!(registry.is_empty());
}

#[test]
fn test_window_increment_out_of_range() {
    let json = r#"{ "name": "w", "window_increment": 4294967295 }"#;
    let mut registry = ProfileRegistry::new();
    let err = registry.load_json(json).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidProfile { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_collision_with_builtin() {
    let mut registry = ProfileRegistry::with_builtin().unwrap();
    let err = registry.load_json(r#"{ "name": "Safari 17" }"#).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidProfile { .. }));
}

#[test]
fn test_builtins_export_to_json() {
    for profile in ProfileRegistry::builtin().unwrap() {
        let json = profile.to_definition().unwrap().to_json().unwrap();
        let back = ProfileDefinition::from_json(&json).unwrap().into_profile().unwrap();
        assert_eq!(&back, profile);
    }
}
