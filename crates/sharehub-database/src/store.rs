//! Storage contract for the `shares` relation.

use async_trait::async_trait;

use sharehub_core::result::AppResult;
use sharehub_core::types::UserId;
use sharehub_entity::share::{NewShareRecord, ShareRecord};

/// Persistence operations over explicit share records.
///
/// Every "prefix" argument matches a path equal to the prefix or lying
/// beneath it (`prefix/...`), compared byte-wise. Each mutating method
/// must apply to all matching rows as one atomic statement; callers never
/// read-modify-write rows.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert all records atomically, returning them as stored.
    ///
    /// Fails with `Conflict` if any `(shared_with, target)` pair already
    /// exists or repeats within the batch; nothing is inserted in that case.
    async fn insert_many(&self, records: &[NewShareRecord]) -> AppResult<Vec<ShareRecord>>;

    /// Find the record at exactly `target` for `shared_with`.
    ///
    /// Fails with `AmbiguousMatch` if more than one row matches.
    async fn find_by_target(
        &self,
        target: &str,
        shared_with: &UserId,
    ) -> AppResult<Option<ShareRecord>>;

    /// List every record owned by `owner_id`, ordered by source then recipient.
    async fn find_by_owner(&self, owner_id: &UserId) -> AppResult<Vec<ShareRecord>>;

    /// List the recipient's records strictly beneath `folder`, ordered by target.
    async fn find_within_target(
        &self,
        folder: &str,
        shared_with: &UserId,
    ) -> AppResult<Vec<ShareRecord>>;

    /// Rewrite the `old` target prefix to `new` on the recipient's records.
    async fn replace_target_prefix(
        &self,
        old: &str,
        new: &str,
        shared_with: &UserId,
    ) -> AppResult<u64>;

    /// Rewrite the `old` source prefix to `new` on the owner's records.
    async fn replace_source_prefix(&self, old: &str, new: &str, owner_id: &UserId)
    -> AppResult<u64>;

    /// Set the write flag on records under the `source` prefix for one recipient.
    async fn set_writeable(
        &self,
        source: &str,
        shared_with: &UserId,
        owner_id: &UserId,
        is_writeable: bool,
    ) -> AppResult<u64>;

    /// Delete records under the `source` prefix for one recipient of the owner.
    async fn delete_by_source(
        &self,
        source: &str,
        shared_with: &UserId,
        owner_id: &UserId,
    ) -> AppResult<u64>;

    /// Delete the recipient's records under the `target` prefix.
    async fn delete_by_target(&self, target: &str, shared_with: &UserId) -> AppResult<u64>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
