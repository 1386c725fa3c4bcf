//! Snapshot discovery and extraction runs used by the binary.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use tsz_props::{ExtractOptions, PropsFinder};
use tsz_typegraph::{GraphSnapshot, TypeInterner};
use walkdir::WalkDir;

use crate::config::CONFIG_FILE_NAME;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// One pass per source file.
    #[default]
    PerFile,
    /// One pass per snapshot, sharing a reference table across its files.
    Batch,
}

/// Expand inputs into snapshot paths. Directories are walked recursively
/// for `*.json` files in a stable order; `propscan.json` is skipped.
/// A path reached twice is kept once.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let walker = WalkDir::new(input).sort_by_file_name();
            for entry in walker {
                let entry =
                    entry.with_context(|| format!("failed to walk {}", input.display()))?;
                let path = entry.path();
                if entry.file_type().is_file()
                    && is_snapshot_file(path)
                    && !paths.iter().any(|p| p == path)
                {
                    paths.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            if !paths.contains(input) {
                paths.push(input.clone());
            }
        } else {
            bail!("input not found: {}", input.display());
        }
    }
    Ok(paths)
}

fn is_snapshot_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path.file_name().is_some_and(|name| name != CONFIG_FILE_NAME)
}

pub fn load_graph(path: &Path) -> Result<TypeInterner> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot = GraphSnapshot::from_json(&source)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    TypeInterner::from_snapshot(&snapshot)
        .with_context(|| format!("invalid type graph in {}", path.display()))
}

/// Run extraction over every source file in `graph`.
///
/// `PerFile` yields an object keyed by source file name and fails when two
/// files share a name; `Batch` yields a single `FinderResult`.
pub fn scan_graph(graph: &TypeInterner, options: &ExtractOptions, mode: ScanMode) -> Result<Value> {
    let finder = PropsFinder::with_options(graph, options.clone());
    let files = graph.files();
    match mode {
        ScanMode::Batch => {
            let result = finder.find_in_files(&files)?;
            info!(
                files = files.len(),
                components = result.components.len(),
                refs = result.refs.len(),
                "batch pass"
            );
            Ok(serde_json::to_value(result)?)
        }
        ScanMode::PerFile => {
            let mut out = Map::new();
            for file in files {
                let name = graph
                    .file(file)
                    .map(|source| graph.resolve_atom(source.name).to_string())
                    .unwrap_or_else(|| format!("#{}", file.0));
                if out.contains_key(&name) {
                    bail!("duplicate source file name `{name}` in snapshot");
                }
                let result = finder
                    .find_in_file(file)
                    .with_context(|| format!("extracting props from {name}"))?;
                info!(
                    file = %name,
                    components = result.components.len(),
                    refs = result.refs.len(),
                    "processed file"
                );
                out.insert(name, serde_json::to_value(result)?);
            }
            Ok(Value::Object(out))
        }
    }
}

/// Load and scan each snapshot. A single snapshot yields its output
/// directly; several are keyed by path.
pub fn scan_paths(paths: &[PathBuf], options: &ExtractOptions, mode: ScanMode) -> Result<Value> {
    if let [path] = paths {
        let graph = load_graph(path)?;
        return scan_graph(&graph, options, mode);
    }
    let mut out = Map::new();
    for path in paths {
        let graph = load_graph(path)?;
        let value = scan_graph(&graph, options, mode)
            .with_context(|| format!("while scanning {}", path.display()))?;
        out.insert(path.display().to_string(), value);
    }
    Ok(Value::Object(out))
}

#[cfg(test)]
#[path = "tests/scan_tests.rs"]
mod tests;
