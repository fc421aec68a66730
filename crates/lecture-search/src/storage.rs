//! Session storage and the one-shot search fallback.
//!
//! Other pages stash the user's search intent under [`SEARCH_WORD_KEY`] and
//! [`SELECTED_FACULTY_KEY`] before navigating to the listing. The listing
//! reads those keys once at mount and deletes them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::SearchError;

/// Session key holding a keyword typed on another page.
pub const SEARCH_WORD_KEY: &str = "searchWord";

/// Session key holding a faculty picked on another page.
pub const SELECTED_FACULTY_KEY: &str = "selectedFaculty";

/// String key-value storage scoped to one browsing session.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SearchError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SearchError>;

    fn remove_item(&mut self, key: &str) -> Result<(), SearchError>;

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>, SearchError>;
}

/// In-memory session storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    items: BTreeMap<String, String>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with `items`.
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SearchError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SearchError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), SearchError> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SearchError> {
        Ok(self.items.keys().cloned().collect())
    }
}

/// Session storage persisted as a JSON object on disk.
///
/// Every write is flushed immediately so separate processes observe it.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileSessionStorage {
    /// Open storage at `path`. A missing file is an empty session.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, items })
    }

    /// Open storage at `path`, reading an unreadable or corrupt file as an
    /// empty session. The file is rewritten on the next change.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
            Self {
                path: path.to_path_buf(),
                items: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove every key.
    pub fn clear(&mut self) -> Result<(), SearchError> {
        self.items.clear();
        self.flush()
    }

    fn flush(&self) -> Result<(), SearchError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(&self.items)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SearchError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SearchError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), SearchError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SearchError> {
        Ok(self.items.keys().cloned().collect())
    }
}

/// Search intent carried over from another page through session storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFallback {
    pub search_word: Option<String>,
    pub selected_faculty: Option<String>,
}

impl SessionFallback {
    /// Read the fallback keys and delete them.
    ///
    /// Keys are removed whether or not the caller ends up using them, so a
    /// stale value cannot come back after the user clears a filter. Storage
    /// failures are logged and read as "no fallback".
    pub fn take(storage: &mut dyn SessionStorage) -> Self {
        let fallback = Self {
            search_word: take_key(storage, SEARCH_WORD_KEY),
            selected_faculty: take_key(storage, SELECTED_FACULTY_KEY),
        };

        if !fallback.is_empty() {
            tracing::debug!(?fallback, "consumed session search fallback");
        }
        fallback
    }

    pub fn is_empty(&self) -> bool {
        self.search_word.is_none() && self.selected_faculty.is_none()
    }
}

fn take_key(storage: &mut dyn SessionStorage, key: &str) -> Option<String> {
    let value = match storage.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read session fallback");
            None
        }
    };

    if let Err(e) = storage.remove_item(key) {
        tracing::warn!(key, error = %e, "failed to clear session fallback");
    }

    value.filter(|v| !v.is_empty())
}
