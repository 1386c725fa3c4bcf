use super::*;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_missing_file_means_defaults() {
    let dir = TempDir::new().unwrap();
    let config = PropscanConfig::discover(None, dir.path()).unwrap();
    assert_eq!(config, PropscanConfig::default());

    let options = config.resolve();
    assert_eq!(options.fallback, FallbackPolicy::Lenient);
    assert!(options.is_marker("React.Component"));
    assert!(!config.pretty());
}

#[test]
fn test_discovers_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        CONFIG_FILE_NAME,
        r#"{
            "fallback": "strict",
            "markers": ["Preact.Component"],
            "knownSymbols": { "Preact.JSX.Element": "reactElement" },
            "pretty": true
        }"#,
    );

    let config = PropscanConfig::discover(None, dir.path()).unwrap();
    assert!(config.pretty());
    let options = config.resolve();
    assert_eq!(options.fallback, FallbackPolicy::Strict);
    assert!(options.is_marker("Preact.Component"));
    assert!(!options.is_marker("React.Component"));
    assert_eq!(
        options.known_symbols.get("Preact.JSX.Element"),
        Some(KnownSymbol::ReactElement)
    );
    assert_eq!(
        options.known_symbols.get("React.MouseEvent"),
        Some(KnownSymbol::Event)
    );
}

#[test]
fn test_explicit_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let err = PropscanConfig::discover(Some(&missing), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_parse_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{ "fallback": "sometimes" }"#);
    let err = PropscanConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.json"), "{err}");

    let path = write(&dir, "typo.json", r#"{ "marker": [] }"#);
    assert!(matches!(
        PropscanConfig::load(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_empty_marker_list_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "empty.json", r#"{ "markers": [] }"#);
    assert!(matches!(
        PropscanConfig::load(&path),
        Err(ConfigError::NoMarkers { .. })
    ));
}

#[test]
fn test_cli_overrides_win() {
    let file = PropscanConfig {
        fallback: Some(FallbackPolicy::Strict),
        markers: Some(vec!["Preact.Component".to_string()]),
        known_symbols: BTreeMap::new(),
        pretty: None,
    };

    let unchanged = file.clone().apply(&CliOverrides::default());
    assert_eq!(unchanged, file);

    let merged = file.apply(&CliOverrides {
        fallback: Some(FallbackPolicy::Lenient),
        markers: vec!["lit.LitElement".to_string()],
        pretty: true,
    });
    let options = merged.resolve();
    assert_eq!(options.fallback, FallbackPolicy::Lenient);
    assert_eq!(options.markers, vec!["lit.LitElement".to_string()]);
    assert!(merged.pretty());
}
