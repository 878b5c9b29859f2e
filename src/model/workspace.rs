//! Documents and cached compilation units.
//!
//! The [`Workspace`] is the semantic model handed to rules and quick fixes:
//! - a [`DocumentStore`] supplying the current text of each document
//! - a cache of parsed units keyed by URI
//! - an index of project types, so supertype chains can cross files
//!
//! A cached unit is reused only while its source matches the document, so
//! every request sees the current text.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context;
use rayon::prelude::*;
use tracing::debug;

use super::hierarchy::{TypeHierarchy, TypeResolver};
use super::java::JavaParser;
use super::platform;
use super::types::CompilationUnit;

/// Supplies document text by URI.
pub trait DocumentStore: Send + Sync {
    fn read(&self, uri: &str) -> anyhow::Result<String>;

    fn write(&self, uri: &str, text: &str) -> anyhow::Result<()>;

    /// URIs of all documents the store knows about.
    fn uris(&self) -> Vec<String>;
}

/// Documents on disk; URIs are file paths, optionally with a `file://` prefix.
pub struct FileDocuments {
    files: Vec<PathBuf>,
}

impl FileDocuments {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    fn path(uri: &str) -> &Path {
        Path::new(uri.strip_prefix("file://").unwrap_or(uri))
    }
}

impl DocumentStore for FileDocuments {
    fn read(&self, uri: &str) -> anyhow::Result<String> {
        let path = Self::path(uri);
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn write(&self, uri: &str, text: &str) -> anyhow::Result<()> {
        let path = Self::path(uri);
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }

    fn uris(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    }
}

/// Documents held in memory, as an editor holds unsaved buffers.
#[derive(Default)]
pub struct MemoryDocuments {
    docs: RwLock<BTreeMap<String, String>>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: impl Into<String>, text: impl Into<String>) {
        self.docs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.into(), text.into());
    }
}

impl DocumentStore for MemoryDocuments {
    fn read(&self, uri: &str) -> anyhow::Result<String> {
        self.docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown document: {}", uri))
    }

    fn write(&self, uri: &str, text: &str) -> anyhow::Result<()> {
        self.insert(uri, text);
        Ok(())
    }

    fn uris(&self) -> Vec<String> {
        self.docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

pub struct Workspace {
    store: Box<dyn DocumentStore>,
    parser: JavaParser,
    /// Parsed units keyed by URI.
    units: RwLock<HashMap<String, Arc<CompilationUnit>>>,
    /// Qualified type name to the URI declaring it.
    type_index: RwLock<HashMap<String, String>>,
}

impl Workspace {
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            parser: JavaParser::new(),
            units: RwLock::new(HashMap::new()),
            type_index: RwLock::new(HashMap::new()),
        }
    }

    /// Workspace over in-memory documents.
    pub fn in_memory<U, T>(docs: impl IntoIterator<Item = (U, T)>) -> Self
    where
        U: Into<String>,
        T: Into<String>,
    {
        let store = MemoryDocuments::new();
        for (uri, text) in docs {
            store.insert(uri, text);
        }
        Self::new(store)
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Current text of a document.
    pub fn text(&self, uri: &str) -> anyhow::Result<String> {
        self.store.read(uri)
    }

    /// Replace a document's text. The next `unit` call reparses it.
    pub fn write_document(&self, uri: &str, text: &str) -> anyhow::Result<()> {
        self.store.write(uri, text)
    }

    /// Unit for the current text of `uri`. The cached parse is reused only
    /// while its source still matches the document.
    pub fn unit(&self, uri: &str) -> anyhow::Result<Arc<CompilationUnit>> {
        let text = self.store.read(uri)?;
        if let Some(unit) = self
            .units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
        {
            if unit.source == text {
                return Ok(Arc::clone(unit));
            }
            debug!(uri, "document changed since last parse");
        }
        self.parse_text(uri, &text)
    }

    fn parse_text(&self, uri: &str, text: &str) -> anyhow::Result<Arc<CompilationUnit>> {
        let unit = Arc::new(self.parser.parse(uri, text)?);
        debug!(uri, has_errors = unit.has_errors, "parsed document");
        self.insert_unit(Arc::clone(&unit));
        Ok(unit)
    }

    /// Drop the cached unit for `uri`.
    pub fn invalidate(&self, uri: &str) {
        self.units
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
        self.type_index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, u| u != uri);
    }

    /// Parse every document in the store in parallel. Returns the number of
    /// units loaded; documents that fail to load are logged and skipped.
    pub fn load_all(&self) -> usize {
        let uris = self.store.uris();
        let parsed: Vec<Arc<CompilationUnit>> = uris
            .par_iter()
            .filter_map(|uri| {
                let loaded = self
                    .store
                    .read(uri)
                    .and_then(|text| self.parser.parse(uri, &text));
                match loaded {
                    Ok(unit) => Some(Arc::new(unit)),
                    Err(e) => {
                        tracing::warn!(uri = uri.as_str(), error = %e, "failed to load document");
                        None
                    }
                }
            })
            .collect();
        let count = parsed.len();
        for unit in parsed {
            self.insert_unit(unit);
        }
        count
    }

    /// Resolver for names written in `unit`, backed by this workspace.
    pub fn resolver<'a>(&'a self, unit: &'a CompilationUnit) -> TypeResolver<'a> {
        TypeResolver::new(unit, self)
    }

    fn insert_unit(&self, unit: Arc<CompilationUnit>) {
        {
            let mut index = self
                .type_index
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            index.retain(|_, u| u != &unit.uri);
            for t in unit.all_types() {
                index.insert(t.qualified_name.clone(), unit.uri.clone());
            }
        }
        self.units
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit.uri.clone(), unit);
    }

    fn declaring_uri(&self, qualified_name: &str) -> Option<String> {
        self.type_index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(qualified_name)
            .cloned()
    }
}

impl TypeHierarchy for Workspace {
    fn is_known(&self, qualified_name: &str) -> bool {
        self.declaring_uri(qualified_name).is_some() || platform::is_known(qualified_name)
    }

    fn direct_supertypes(&self, qualified_name: &str) -> Option<Vec<String>> {
        if let Some(uri) = self.declaring_uri(qualified_name) {
            let unit = self.unit(&uri).ok()?;
            let decl = unit.find_type(qualified_name)?;
            return TypeResolver::new(&unit, self).declared_supertypes(decl);
        }
        platform::direct_supertypes(qualified_name)
            .map(|supers| supers.iter().map(|s| s.to_string()).collect())
    }
}
