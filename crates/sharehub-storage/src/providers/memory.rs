//! In-memory filesystem provider.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use sharehub_core::result::AppResult;
use sharehub_core::traits::FileSystem;
use sharehub_core::types::{UserId, path};

/// In-memory tree of namespace paths with a per-path readable flag.
///
/// Adding a path also adds its ancestors as readable directories.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    /// Known paths mapped to whether they are readable.
    entries: Arc<DashMap<String, bool>>,
}

impl MemoryFileSystem {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a readable path and all of its ancestors.
    pub fn add(&self, namespace_path: &str) {
        let mut current = path::normalize(namespace_path);
        self.entries.insert(current.clone(), true);
        loop {
            let parent = path::parent(&current).to_string();
            if parent == current || parent == "." {
                break;
            }
            self.entries.entry(parent.clone()).or_insert(true);
            current = parent;
        }
    }

    /// Mark an existing path as unreadable.
    pub fn deny_read(&self, namespace_path: &str) {
        if let Some(mut readable) = self.entries.get_mut(&path::normalize(namespace_path)) {
            *readable = false;
        }
    }

    /// Remove a path and everything beneath it.
    pub fn remove(&self, namespace_path: &str) {
        let prefix = path::normalize(namespace_path);
        self.entries.retain(|p, _| !path::is_within(p, &prefix));
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn exists(&self, namespace_path: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(&path::normalize(namespace_path)))
    }

    async fn is_readable(&self, namespace_path: &str, user: &UserId) -> AppResult<bool> {
        let normalized = path::normalize(namespace_path);
        if !path::is_within(&normalized, &format!("/{user}")) {
            return Ok(false);
        }
        Ok(self.entries.get(&normalized).map(|r| *r).unwrap_or(false))
    }
}
