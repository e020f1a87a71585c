use std::fs;

use tempfile::TempDir;
use tsbind_collector::{CollectorConfig, ConfigError, ExpansionPolicy, PrimitiveKind, SnapshotOracle};

#[test]
fn load_config_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tsbind.toml");
    fs::write(
        &path,
        r#"
entry_files = ["pixi.js.d.ts"]
expansion = "all-declared"

[known_types]
"NodeJS.Timeout" = "number"
"#,
    )
    .unwrap();

    let config = CollectorConfig::load(&path).unwrap();
    assert_eq!(config.entry_files, ["pixi.js.d.ts"]);
    assert_eq!(config.expansion, ExpansionPolicy::AllDeclared);
    assert_eq!(config.known_types["NodeJS.Timeout"], PrimitiveKind::Number);
}

#[test]
fn missing_config_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = CollectorConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn load_snapshot_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pixi.snapshot.json");
    fs::write(
        &path,
        r#"{ "files": [{ "path": "pixi.d.ts", "exports": [] }] }"#,
    )
    .unwrap();

    let oracle = SnapshotOracle::from_path(&path).unwrap();
    assert_eq!(oracle.snapshot().files[0].path, "pixi.d.ts");
    assert!(SnapshotOracle::from_path(&dir.path().join("missing.json")).is_err());
}
