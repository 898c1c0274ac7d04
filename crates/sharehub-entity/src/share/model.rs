//! Share record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use sharehub_core::types::{UserId, path};

use super::link::PublicLink;

/// An explicit share edge between an owner's source and a recipient's target.
///
/// Paths beneath `target` that have no record of their own are covered
/// by this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShareRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// User who owns the real file.
    pub owner_id: UserId,
    /// Recipient of the share.
    pub shared_with: UserId,
    /// Real path in the owner's namespace, e.g. `/alice/files/Photos`.
    pub source: String,
    /// Path in the recipient's namespace, e.g. `/bob/files/Share/Photos`.
    pub target: String,
    /// Whether the recipient may modify the item.
    pub is_writeable: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl ShareRecord {
    /// Source path implied for `target` when this record covers it.
    ///
    /// Returns `None` if `target` does not lie within this record's target.
    pub fn source_for(&self, target: &str) -> Option<String> {
        path::replace_prefix(target, &self.target, &self.source)
    }
}

/// Data required to insert a new share record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShareRecord {
    /// User who owns the real file.
    pub owner_id: UserId,
    /// Recipient of the share.
    pub shared_with: UserId,
    /// Real path in the owner's namespace.
    pub source: String,
    /// Path in the recipient's namespace.
    pub target: String,
    /// Whether the recipient may modify the item.
    pub is_writeable: bool,
}

impl NewShareRecord {
    /// Materialize the record with a fresh identifier and timestamp.
    pub fn into_record(self) -> ShareRecord {
        ShareRecord {
            id: Uuid::new_v4(),
            owner_id: self.owner_id,
            shared_with: self.shared_with,
            source: self.source,
            target: self.target,
            is_writeable: self.is_writeable,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of resolving a target path for a requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedShare {
    /// Owner of the real file.
    pub owner_id: UserId,
    /// Effective source path of the requested target.
    pub source: String,
    /// Target of the record that produced this resolution.
    pub covering_target: String,
    /// Effective write permission.
    pub is_writeable: bool,
    /// `true` when the permission and source were inherited from an
    /// ancestor record rather than an exact match.
    pub inherited: bool,
}

/// An explicit record as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedShare {
    /// Recipient of the share.
    pub shared_with: UserId,
    /// Real path in the owner's namespace.
    pub source: String,
    /// Whether the recipient may modify the item.
    pub is_writeable: bool,
}

impl From<ShareRecord> for OwnedShare {
    fn from(record: ShareRecord) -> Self {
        Self {
            shared_with: record.shared_with,
            source: record.source,
            is_writeable: record.is_writeable,
        }
    }
}

/// An explicit record nested inside a recipient's folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedShare {
    /// Owner of the real file.
    pub owner_id: UserId,
    /// Real path in the owner's namespace.
    pub source: String,
    /// Path in the recipient's namespace.
    pub target: String,
}

impl From<ShareRecord> for NestedShare {
    fn from(record: ShareRecord) -> Self {
        Self {
            owner_id: record.owner_id,
            source: record.source,
            target: record.target,
        }
    }
}

/// Result of a share creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShareOutcome {
    /// Records were inserted, one per recipient.
    Shared {
        /// The inserted records.
        records: Vec<ShareRecord>,
    },
    /// A public link token was derived; nothing was persisted.
    PublicLink(PublicLink),
}
