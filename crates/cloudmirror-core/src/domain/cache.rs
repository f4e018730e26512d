//! Run-scoped remote path -> native id cache
//!
//! Most providers require a parent's native id to enumerate or create
//! children, so once a folder id is resolved or created it must be cached
//! before any child of that folder is addressed. The cache is created empty
//! at run start, owned by exactly one run, and discarded with it; it is
//! never persisted or shared.

use std::collections::HashMap;

/// Maps full remote paths (root-prefixed, `/`-separated) to provider ids
#[derive(Debug, Default)]
pub struct PathIdCache {
    map: HashMap<String, String>,
}

impl PathIdCache {
    /// Creates an empty cache for a new run
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the native id for a full remote path
    pub fn insert(&mut self, path: impl Into<String>, id: impl Into<String>) {
        self.map.insert(path.into(), id.into());
    }

    /// Looks up the native id for a full remote path
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.map.get(path).map(String::as_str)
    }

    /// Returns the number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
