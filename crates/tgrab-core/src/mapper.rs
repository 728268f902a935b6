//! JSON-backed store of raw title -> canonical title mappings.
//!
//! Once a messy caption has been resolved to a canonical title, the pair is
//! remembered so the same source never needs resolving twice. The store is
//! a single pretty-printed JSON object, persisted on every addition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub struct TitleMapper {
    path: PathBuf,
    mappings: HashMap<String, String>,
}

impl TitleMapper {
    /// Open the store at `path`. A missing file starts empty; a corrupt one
    /// is logged and treated as empty rather than blocking startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mappings = match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(error = %e, "could not parse {}, starting with empty mappings", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read {}, starting with empty mappings", path.display());
                HashMap::new()
            }
        };
        Self { path, mappings }
    }

    /// Default location under the XDG config dir.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("tgrab")?;
        Ok(xdg_dirs.place_config_file("mappings.json")?)
    }

    /// Canonical title for a raw one, if known. Keys are matched trimmed.
    pub fn get(&self, raw_title: &str) -> Option<&str> {
        self.mappings.get(raw_title.trim()).map(String::as_str)
    }

    /// Remember a mapping and persist the store. Empty keys or values are
    /// ignored.
    pub fn add(&mut self, raw_title: &str, canonical: &str) -> Result<()> {
        let raw = raw_title.trim();
        let canonical = canonical.trim();
        if raw.is_empty() || canonical.is_empty() {
            return Ok(());
        }
        self.mappings.insert(raw.to_string(), canonical.to_string());
        self.save()?;
        tracing::info!("added title mapping: '{raw}' -> '{canonical}'");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.mappings)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write mappings to {}", self.path.display()))?;
        Ok(())
    }
}
