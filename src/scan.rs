//! Scanning pass: every rendered element that belongs to a component gets
//! the ids of that component.
//!
//! Mirrors what the compiler plugin does per file, without rewriting the
//! source: results are records a host can attach or persist.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::classify::is_element;
use crate::comment;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::id::{component_id, ComponentId};
use crate::locate::locate_component;
use crate::lower::parse_source;
use crate::naming::component_names;
use crate::tree::SyntaxTree;

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// 1-based line and column of byte `offset` in `source`.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let offset = (offset as usize).min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Self {
            line: before.matches('\n').count() as u32 + 1,
            column: before[line_start..].chars().count() as u32 + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedId {
    pub name: String,
    pub id: ComponentId,
}

/// One rendered element and the component that returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Primary name first.
    pub names: Vec<NamedId>,
    pub location: SourceLocation,
    pub start: u32,
    pub end: u32,
}

impl ComponentRecord {
    pub fn primary(&self) -> Option<&NamedId> {
        self.names.first()
    }

    /// Attribute selector matching elements tagged with the primary id.
    pub fn selector(&self, config: &Config) -> Option<String> {
        self.primary()
            .map(|named| format!("[{}~=\"{}\"]", config.attribute_name(), named.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileScan {
    pub file: String,
    pub components: Vec<ComponentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub files: BTreeMap<String, Vec<ComponentRecord>>,
}

impl Manifest {
    pub fn insert(&mut self, scan: FileScan) {
        if !scan.components.is_empty() {
            self.files.insert(scan.file, scan.components);
        }
    }

    /// Every id a component name resolved to, across files.
    pub fn ids(&self) -> BTreeMap<String, BTreeSet<ComponentId>> {
        let mut ids: BTreeMap<String, BTreeSet<ComponentId>> = BTreeMap::new();
        for named in self.files.values().flatten().flat_map(|r| &r.names) {
            ids.entry(named.name.clone())
                .or_default()
                .insert(named.id.clone());
        }
        ids
    }

    pub fn to_comment(&self) -> Result<String> {
        comment::encode(self)
    }

    pub fn from_comment(text: &str) -> Result<Option<Self>> {
        comment::decode(text)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Records for every element in `tree` that resolves to a component.
pub fn scan_tree(tree: &SyntaxTree, source: &str, filename: &str) -> Result<Vec<ComponentRecord>> {
    let mut records = Vec::new();

    for node in tree.node_ids().map(|id| tree.cursor(id)) {
        if !is_element(Some(node)) {
            continue;
        }
        let Some(location) = locate_component(node) else {
            continue;
        };

        let names = component_names(&location)?
            .into_iter()
            .map(|name| NamedId {
                id: component_id(filename, &name),
                name,
            })
            .collect();

        let span = node.span();
        records.push(ComponentRecord {
            names,
            location: SourceLocation::from_offset(source, span.start),
            start: span.start,
            end: span.end,
        });
    }

    Ok(records)
}

pub fn scan_source(source: &str, filename: &str) -> Result<FileScan> {
    let tree = parse_source(source, filename)?;
    let components = scan_tree(&tree, source, filename)?;
    tracing::debug!("{}: {} component element(s)", filename, components.len());
    Ok(FileScan {
        file: filename.to_string(),
        components,
    })
}

pub fn scan_file(path: &Path) -> Result<FileScan> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    scan_source(&source, &path.to_string_lossy())
}

fn is_ignored(entry: &DirEntry, config: &Config) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| config.ignore.iter().any(|ignored| ignored == name))
}

fn find_sources(dir: &Path, config: &Config) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry, config))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && config.accepts_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Scans every source file under `dir`. Files that fail to parse are
/// skipped with a warning; anything else aborts the scan.
pub fn scan_dir(dir: &Path, config: &Config) -> Result<Manifest> {
    let files = find_sources(dir, config);
    tracing::debug!("scanning {} file(s) under {}", files.len(), dir.display());

    let results: Vec<Result<FileScan>> = files.par_iter().map(|path| scan_file(path)).collect();

    let mut manifest = Manifest::default();
    for result in results {
        match result {
            Ok(scan) => manifest.insert(scan),
            Err(Error::Parse { file, messages }) => {
                tracing::warn!("skipping {}: {}", file, messages.join("; "));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(manifest)
}

#[cfg(feature = "napi")]
#[napi]
pub fn scan_source_native(source: String, filename: String) -> napi::Result<String> {
    let scan = scan_source(&source, &filename).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_string(&scan)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}

#[cfg(feature = "napi")]
#[napi]
pub fn scan_dir_native(dir: String) -> napi::Result<String> {
    let dir = PathBuf::from(dir);
    let config = Config::load(&dir).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let manifest = scan_dir(&dir, &config).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    manifest
        .to_comment()
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}
