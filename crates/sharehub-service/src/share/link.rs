//! Public share link token derivation.

use sha2::{Digest, Sha256};

use sharehub_core::types::UserId;

/// Derives tokens for anonymous public links.
#[derive(Debug, Clone, Default)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// Derives a deterministic token from the owner and source path.
    ///
    /// The same pair always yields the same token; collisions are ignored.
    pub fn derive_token(&self, owner_id: &UserId, source: &str) -> String {
        let digest = Sha256::digest(format!("{owner_id}-{source}").as_bytes());
        hex::encode(digest)
    }
}
