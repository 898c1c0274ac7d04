//! Local filesystem provider.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use sharehub_core::error::{AppError, ErrorKind};
use sharehub_core::result::AppResult;
use sharehub_core::traits::FileSystem;
use sharehub_core::types::{UserId, path};

/// Local filesystem provider.
///
/// Namespace paths map onto the root directory: `/alice/files/Docs` is
/// `<root>/alice/files/Docs`.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    /// Root directory holding every user's namespace.
    root: PathBuf,
}

impl LocalFileSystem {
    /// Create a new local provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a namespace path to a path within the root.
    ///
    /// Only normal components are accepted so a path cannot escape the root.
    fn resolve(&self, namespace_path: &str) -> AppResult<PathBuf> {
        let clean = path::normalize(namespace_path);
        let relative = Path::new(clean.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::validation(format!(
                "Path escapes the storage root: {namespace_path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check existence: {path}"),
                e,
            )
        })
    }

    async fn is_readable(&self, namespace_path: &str, user: &UserId) -> AppResult<bool> {
        let normalized = path::normalize(namespace_path);
        if !path::is_within(&normalized, &format!("/{user}")) {
            debug!(path = %normalized, user = %user, "Path outside user namespace");
            return Ok(false);
        }

        let full_path = self.resolve(&normalized)?;
        let meta = match fs::metadata(&full_path).await {
            Ok(meta) => meta,
            Err(e) if matches!(e.kind(), IoErrorKind::NotFound | IoErrorKind::PermissionDenied) => {
                return Ok(false);
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {namespace_path}"),
                    e,
                ));
            }
        };

        let opened = if meta.is_dir() {
            fs::read_dir(&full_path).await.map(|_| ())
        } else {
            fs::File::open(&full_path).await.map(|_| ())
        };

        match opened {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::PermissionDenied => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open: {namespace_path}"),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider() -> (tempfile::TempDir, LocalFileSystem) {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalFileSystem::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, provider)
    }

    #[tokio::test]
    async fn test_exists_and_readable() {
        let (dir, provider) = provider().await;
        std::fs::create_dir_all(dir.path().join("alice/files/Docs")).unwrap();
        std::fs::write(dir.path().join("alice/files/Docs/notes.txt"), "hi").unwrap();

        let alice = UserId::new("alice").unwrap();
        assert!(provider.exists("/alice/files/Docs").await.unwrap());
        assert!(provider.exists("/alice//files/Docs/notes.txt/").await.unwrap());
        assert!(!provider.exists("/alice/files/Missing").await.unwrap());

        assert!(provider.is_readable("/alice/files/Docs", &alice).await.unwrap());
        assert!(
            provider
                .is_readable("/alice/files/Docs/notes.txt", &alice)
                .await
                .unwrap()
        );
        assert!(!provider.is_readable("/alice/files/Missing", &alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_users_namespace_is_not_readable() {
        let (dir, provider) = provider().await;
        std::fs::create_dir_all(dir.path().join("alice/files/Docs")).unwrap();

        let bob = UserId::new("bob").unwrap();
        assert!(!provider.is_readable("/alice/files/Docs", &bob).await.unwrap());
    }

    #[tokio::test]
    async fn test_parent_components_rejected() {
        let (_dir, provider) = provider().await;
        let err = provider.exists("/alice/files/../../etc").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
