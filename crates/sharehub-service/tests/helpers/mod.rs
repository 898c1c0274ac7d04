//! Shared test helpers for resolver integration tests.

use std::sync::Arc;

use sharehub_core::config::SharingConfig;
use sharehub_core::types::UserId;
use sharehub_database::MemoryShareStore;
use sharehub_service::{RequestContext, ShareResolver};
use sharehub_storage::MemoryFileSystem;

/// Test application context
pub struct TestApp {
    /// Resolver under test
    pub resolver: ShareResolver,
    /// Backing store for direct inspection
    pub store: MemoryShareStore,
    /// Filesystem the owners' sources live in
    pub fs: MemoryFileSystem,
}

impl TestApp {
    /// Create a new test application with empty store and filesystem
    pub fn new() -> Self {
        let store = MemoryShareStore::new();
        let fs = MemoryFileSystem::new();
        let resolver = ShareResolver::new(
            Arc::new(store.clone()),
            Arc::new(fs.clone()),
            SharingConfig::default(),
        );
        Self {
            resolver,
            store,
            fs,
        }
    }

    /// Share `source` from `owner` with `recipients`, creating the source first
    pub async fn share(&self, owner: &str, source: &str, recipients: &[&str], writeable: bool) {
        self.fs.add(source);
        let recipients: Vec<UserId> = recipients.iter().map(|r| user(r)).collect();
        self.resolver
            .create(&ctx(owner), source, &recipients, writeable, false)
            .await
            .expect("Failed to create share");
    }

    /// Resolve `target` for `user`, returning the effective source
    pub async fn source_of(&self, user: &str, target: &str) -> Option<String> {
        self.resolver
            .resolve_source(&ctx(user), target)
            .await
            .expect("Failed to resolve source")
            .map(|r| r.source)
    }
}

/// Build a user id
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Build a request context for a user
pub fn ctx(id: &str) -> RequestContext {
    RequestContext::new(user(id))
}
