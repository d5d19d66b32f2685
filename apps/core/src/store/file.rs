use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::KeyValueStore;

/// File-backed store adapter: one JSON object mapping keys to values.
///
/// Mirrors `localStorage` write semantics: every mutation rewrites the
/// whole file synchronously. A corrupt file at open degrades to an empty
/// store instead of failing startup; a failed write keeps the in-memory
/// copy and logs, matching the recoverable-everywhere error posture.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(map) => {
                    info!("Opened store at {} ({} keys)", path.display(), map.len());
                    map
                }
                Err(e) => {
                    warn!(
                        "Store file {} is corrupt ({e}); starting from empty",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read store at {}", path.display()))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let text = match serde_json::to_string(entries) {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to serialize store: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, text) {
            warn!("Failed to write store at {}: {e}", self.path.display());
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}
