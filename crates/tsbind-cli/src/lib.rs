//! Driver for the `tsbind` command line

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use tsbind_collector::{collect, CollectorConfig, SnapshotOracle};
use tsbind_core::{ListOfFunctions, Program};

/// Load the collector config, or treat every file of the snapshot as an entry
pub fn load_config(config: Option<&Path>, oracle: &SnapshotOracle) -> Result<CollectorConfig> {
    match config {
        Some(path) => CollectorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => {
            let files = oracle.snapshot().files.iter().map(|f| f.path.clone());
            let config = CollectorConfig::new(files);
            config
                .validate()
                .context("Snapshot declares no files to collect")?;
            debug!("Using {} snapshot files as entries", config.entry_files.len());
            Ok(config)
        }
    }
}

fn load_snapshot(path: &Path) -> Result<SnapshotOracle> {
    SnapshotOracle::from_path(path)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))
}

/// Package name derived from a snapshot path (`pixi.snapshot.json` -> `pixi`)
pub fn package_name(snapshot: &Path) -> String {
    snapshot
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            name.trim_end_matches(".json")
                .trim_end_matches(".snapshot")
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "bindings".to_string())
}

/// Collect a snapshot and write `<output>/<package>.program.json`
///
/// Nothing is written unless collection succeeds.
pub fn run_collect(
    snapshot: &Path,
    config: Option<&Path>,
    output: &Path,
    package: Option<&str>,
) -> Result<PathBuf> {
    let oracle = load_snapshot(snapshot)?;
    let config = load_config(config, &oracle)?;
    let collection = collect(&oracle, &config).context("Collection failed")?;

    let warnings = collection.warnings().count();
    if warnings > 0 {
        info!("{} positions fell back to a default type", warnings);
    }

    let json = serde_json::to_string_pretty(&collection.program)
        .context("Failed to serialize program")?;

    let package = package
        .map(str::to_string)
        .unwrap_or_else(|| package_name(snapshot));
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    let path = output.join(format!("{}.program.json", package));
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "Collected {} classes, {} interfaces, {} closures into {}",
        collection.program.classes.len(),
        collection.program.interfaces.len(),
        collection.program.closures.len(),
        path.display()
    );
    Ok(path)
}

/// Collect a snapshot and render its resolved overload names
pub fn run_overloads(snapshot: &Path, config: Option<&Path>) -> Result<String> {
    let oracle = load_snapshot(snapshot)?;
    let config = load_config(config, &oracle)?;
    let collection = collect(&oracle, &config).context("Collection failed")?;
    overload_report(&collection.program)
}

/// One block per container that holds functions, listing output names in
/// canonical order
pub fn overload_report(program: &Program) -> Result<String> {
    let mut out = String::new();

    for (id, namespace) in program.namespaces.iter() {
        if namespace.functions.is_empty() {
            continue;
        }
        let path = program.namespaces.qualified_path(id);
        let label = if path.is_empty() {
            "crate".to_string()
        } else {
            path.join("::")
        };
        writeln!(out, "namespace {}", label)?;
        section(&mut out, "functions", &namespace.functions)?;
    }

    for class in &program.classes {
        if class.constructors.is_empty() && class.methods.is_empty() && class.static_methods.is_empty() {
            continue;
        }
        writeln!(out, "class {}", class.qualified_name)?;
        section(&mut out, "constructors", &class.constructors)?;
        section(&mut out, "methods", &class.methods)?;
        section(&mut out, "static methods", &class.static_methods)?;
    }

    for iface in &program.interfaces {
        if iface.methods.is_empty() {
            continue;
        }
        writeln!(out, "interface {}", iface.qualified_name)?;
        section(&mut out, "methods", &iface.methods)?;
    }

    let closures = program.closures.named()?;
    if !closures.is_empty() {
        let names: Vec<String> = closures.into_iter().map(|c| c.name).collect();
        writeln!(out, "closures")?;
        writeln!(out, "  {}", names.join(", "))?;
    }
    Ok(out)
}

fn section(out: &mut String, label: &str, functions: &ListOfFunctions) -> Result<()> {
    if functions.is_empty() {
        return Ok(());
    }
    let names: Vec<String> = functions
        .resolved_functions()?
        .into_iter()
        .map(|r| r.name)
        .collect();
    writeln!(out, "  {}: {}", label, names.join(", "))?;
    Ok(())
}
