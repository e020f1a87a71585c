use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tsbind_collector::{Signature, SnapshotBuilder, TypeFlags};

const FILE: &str = "pixi.d.ts";

/// `Foo` with an overloaded `bar`, written as `pixi.snapshot.json`
fn write_snapshot(dir: &Path) -> PathBuf {
    let mut b = SnapshotBuilder::new();
    let number = b.primitive(TypeFlags::NUMBER, "number");
    let string = b.primitive(TypeFlags::STRING, "string");
    let void = b.primitive(TypeFlags::VOID, "void");
    let foo = b.class(FILE, "Foo");
    let x_num = b.param("x", number);
    let x_str = b.param("x", string);
    let y = b.param("y", number);
    let bar = b.method(
        FILE,
        "bar",
        vec![
            Signature::new(vec![x_num], void),
            Signature::new(vec![x_str, y], void),
        ],
    );
    b.member(foo.instance, bar);
    b.export(FILE, foo.symbol);

    let path = dir.join("pixi.snapshot.json");
    fs::write(&path, serde_json::to_string_pretty(&b.build()).unwrap()).unwrap();
    path
}

#[test]
fn collect_writes_program_json() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let output = dir.path().join("out");

    let path = tsbind::run_collect(&snapshot, None, &output, None).unwrap();
    assert_eq!(path, output.join("pixi.program.json"));

    let program: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(program["classes"][0]["name"], "Foo");
}

#[test]
fn collect_honors_package_and_config() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let config = dir.path().join("tsbind.toml");
    fs::write(&config, "entry_files = [\"pixi.d.ts\"]\n").unwrap();
    let output = dir.path().join("out");

    let path = tsbind::run_collect(&snapshot, Some(&config), &output, Some("pixi_js")).unwrap();
    assert_eq!(path, output.join("pixi_js.program.json"));
    assert!(path.exists());
}

#[test]
fn failed_collection_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("broken.json");
    fs::write(&snapshot, "{ not json").unwrap();
    let output = dir.path().join("out");

    let err = tsbind::run_collect(&snapshot, None, &output, None).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
    assert!(!output.exists());
}

#[test]
fn empty_snapshot_without_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("empty.json");
    fs::write(&snapshot, "{}").unwrap();

    assert!(tsbind::run_overloads(&snapshot, None).is_err());
}

#[test]
fn overload_report_lists_resolved_names() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());

    let report = tsbind::run_overloads(&snapshot, None).unwrap();
    assert_eq!(report, "class Foo\n  methods: bar, bar_2\n");
}
