use super::*;

#[test]
fn empty_object_yields_defaults() {
    let config = DesktopConfig::from_json_str("{}").unwrap();
    assert_eq!(config, DesktopConfig::default());
    assert_eq!(config.refresh_delay(), Duration::from_millis(150));
}

#[test]
fn partial_object_overrides_only_named_fields() {
    let config =
        DesktopConfig::from_json_str(r#"{ "wrap_tab_order": true, "refresh_delay_ms": 40 }"#)
            .unwrap();
    assert!(config.wrap_tab_order);
    assert_eq!(config.refresh_delay_ms, 40);
    assert!(config.bell);
}

#[test]
fn zero_delay_is_clamped_to_one_millisecond() {
    let config = DesktopConfig {
        refresh_delay_ms: 0,
        ..DesktopConfig::default()
    };
    assert_eq!(config.refresh_delay(), Duration::from_millis(1));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = DesktopConfig::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_or_default_handles_missing_and_present_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("desktop.json");
    assert_eq!(
        DesktopConfig::load_or_default(&path).unwrap(),
        DesktopConfig::default()
    );

    std::fs::write(&path, r#"{ "bell": false }"#).unwrap();
    assert!(!DesktopConfig::load_or_default(&path).unwrap().bell);
}

#[test]
fn load_reports_the_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match DesktopConfig::load(&path).unwrap_err() {
        ConfigError::Read { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}
