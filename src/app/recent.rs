use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{AppError, Result};

/// Entries kept on disk; the panel shows at most `recent_limit` of them.
const MAX_HISTORY: usize = 50;

/// On-disk shape of the recent-files history: file:// URIs, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecentStore {
    entries: Vec<String>,
}

/// Most-recently-used file history, persisted to the platform data directory.
///
/// Only absolute paths are recorded. Entries whose files have since vanished
/// stay in the store but are filtered out of every listing.
pub struct RecentFiles {
    store: RecentStore,
    store_path: Option<PathBuf>,
}

impl RecentFiles {
    /// Load history from the default location; missing or corrupt files start
    /// an empty history.
    pub fn load() -> Self {
        let store_path = match default_store_path() {
            Ok(p) => Some(p),
            Err(e) => {
                eprintln!("Recent files history unavailable: {}", e);
                None
            }
        };
        let store = store_path
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { store, store_path }
    }

    /// History bound to an explicit file, used by tests.
    pub fn with_store_path(path: PathBuf) -> Self {
        let store = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            store,
            store_path: Some(path),
        }
    }

    /// Record a file as most recent. Relative paths are ignored; duplicates
    /// move to the front instead of repeating.
    pub fn add(&mut self, path: &Path) {
        if !path.is_absolute() {
            return;
        }
        let uri = path_to_uri(path);
        self.store.entries.retain(|e| e != &uri);
        self.store.entries.insert(0, uri);
        self.store.entries.truncate(MAX_HISTORY);
        if let Err(e) = self.save() {
            eprintln!("Failed to save recent files: {}", e);
        }
    }

    /// Up to `limit` paths, most recent first, existing files only.
    pub fn list(&self, limit: usize) -> Vec<PathBuf> {
        self.store
            .entries
            .iter()
            .filter_map(|uri| uri_to_path(uri))
            .filter(|p| p.exists())
            .take(limit)
            .collect()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.store_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.store)?;
        fs::write(path, content)?;
        Ok(())
    }
}

fn default_store_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Settings("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("quillpad").join("recent.json"))
}

/// Build a canonical file:// URI. Bytes outside the unreserved set (and '/')
/// are percent-encoded, so names containing '#', '%' or spaces survive the
/// trip through the store.
fn path_to_uri(path: &Path) -> String {
    let mut uri = String::from("file://");
    for byte in path.to_string_lossy().bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                uri.push(byte as char)
            }
            _ => {
                uri.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    uri
}

fn uri_to_path(uri: &str) -> Option<PathBuf> {
    let escaped = uri.strip_prefix("file://")?;
    let mut bytes = Vec::with_capacity(escaped.len());
    let mut iter = escaped.bytes();
    while let Some(byte) = iter.next() {
        if byte == b'%' {
            let pair = [iter.next()?, iter.next()?];
            let hex = std::str::from_utf8(&pair).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok().map(PathBuf::from)
}
