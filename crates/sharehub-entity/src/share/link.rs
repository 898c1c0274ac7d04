//! Public share link value object.

use serde::{Deserialize, Serialize};

use sharehub_core::types::UserId;

/// An anonymous-access token derived for a shared source.
///
/// Public links are not persisted in the `shares` table and take no part
/// in path resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicLink {
    /// The owner who published the source.
    pub owner_id: UserId,
    /// The published source path.
    pub source: String,
    /// Hex-encoded token identifying the link.
    pub token: String,
}
