//! Filesystem capability consumed by the share resolver.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Minimal view of the file layer needed to validate a share.
///
/// Paths are namespace paths such as `/alice/files/Docs`. Implementations
/// exist for the local disk and for an in-memory tree in
/// `sharehub-storage`.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Check whether `user` may read the file or directory at `path`.
    async fn is_readable(&self, path: &str, user: &UserId) -> AppResult<bool>;
}
