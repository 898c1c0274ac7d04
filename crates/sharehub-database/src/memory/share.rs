//! In-memory share store using a Tokio lock for single-node deployments.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use sharehub_core::error::AppError;
use sharehub_core::result::AppResult;
use sharehub_core::types::{UserId, path};
use sharehub_entity::share::{NewShareRecord, ShareRecord};

use crate::store::ShareStore;

/// In-memory store with the same matching and uniqueness rules as the
/// `shares` table.
///
/// Each operation holds the lock for its whole duration, so every bulk
/// rewrite is applied atomically.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareStore {
    records: Arc<RwLock<Vec<ShareRecord>>>,
}

impl MemoryShareStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Load records as-is, e.g. from a snapshot of the `shares` table.
    ///
    /// Neither path placement nor uniqueness is checked.
    pub async fn import(&self, records: impl IntoIterator<Item = ShareRecord>) {
        let mut state = self.records.write().await;
        state.extend(records);
        debug!(total = state.len(), "Imported share records");
    }
}

/// Reject any duplicate `(shared_with, target)` pair.
fn check_unique<'a>(records: impl IntoIterator<Item = &'a ShareRecord>) -> AppResult<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert((&record.shared_with, &record.target)) {
            return Err(AppError::conflict(format!(
                "A share already exists at '{}' for user '{}'",
                record.target, record.shared_with
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn insert_many(&self, records: &[NewShareRecord]) -> AppResult<Vec<ShareRecord>> {
        let mut state = self.records.write().await;

        let inserted: Vec<ShareRecord> = records
            .iter()
            .cloned()
            .map(NewShareRecord::into_record)
            .collect();
        check_unique(state.iter().chain(inserted.iter()))?;

        state.extend(inserted.iter().cloned());
        debug!(count = inserted.len(), total = state.len(), "Inserted share records");
        Ok(inserted)
    }

    async fn find_by_target(
        &self,
        target: &str,
        shared_with: &UserId,
    ) -> AppResult<Option<ShareRecord>> {
        let state = self.records.read().await;
        let mut matches = state
            .iter()
            .filter(|r| r.target == target && &r.shared_with == shared_with);

        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(AppError::ambiguous(format!(
                "Multiple shares found for target '{target}' and user '{shared_with}'"
            )));
        }
        Ok(first)
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> AppResult<Vec<ShareRecord>> {
        let state = self.records.read().await;
        let mut owned: Vec<ShareRecord> = state
            .iter()
            .filter(|r| &r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            a.source
                .cmp(&b.source)
                .then_with(|| a.shared_with.cmp(&b.shared_with))
        });
        Ok(owned)
    }

    async fn find_within_target(
        &self,
        folder: &str,
        shared_with: &UserId,
    ) -> AppResult<Vec<ShareRecord>> {
        let state = self.records.read().await;
        let mut nested: Vec<ShareRecord> = state
            .iter()
            .filter(|r| &r.shared_with == shared_with)
            .filter(|r| path::suffix(&r.target, folder).is_some_and(|rest| !rest.is_empty()))
            .cloned()
            .collect();
        nested.sort_by(|a, b| a.target.cmp(&b.target));
        Ok(nested)
    }

    async fn replace_target_prefix(
        &self,
        old: &str,
        new: &str,
        shared_with: &UserId,
    ) -> AppResult<u64> {
        let mut state = self.records.write().await;

        let mut updated = state.clone();
        let mut affected = 0u64;
        for record in updated.iter_mut().filter(|r| &r.shared_with == shared_with) {
            if let Some(target) = path::replace_prefix(&record.target, old, new) {
                record.target = target;
                affected += 1;
            }
        }
        check_unique(updated.iter())?;

        *state = updated;
        Ok(affected)
    }

    async fn replace_source_prefix(
        &self,
        old: &str,
        new: &str,
        owner_id: &UserId,
    ) -> AppResult<u64> {
        let mut state = self.records.write().await;
        let mut affected = 0u64;
        for record in state.iter_mut().filter(|r| &r.owner_id == owner_id) {
            if let Some(source) = path::replace_prefix(&record.source, old, new) {
                record.source = source;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn set_writeable(
        &self,
        source: &str,
        shared_with: &UserId,
        owner_id: &UserId,
        is_writeable: bool,
    ) -> AppResult<u64> {
        let mut state = self.records.write().await;
        let mut affected = 0u64;
        for record in state.iter_mut().filter(|r| {
            &r.shared_with == shared_with
                && &r.owner_id == owner_id
                && path::is_within(&r.source, source)
        }) {
            record.is_writeable = is_writeable;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete_by_source(
        &self,
        source: &str,
        shared_with: &UserId,
        owner_id: &UserId,
    ) -> AppResult<u64> {
        let mut state = self.records.write().await;
        let before = state.len();
        state.retain(|r| {
            !(&r.shared_with == shared_with
                && &r.owner_id == owner_id
                && path::is_within(&r.source, source))
        });
        Ok((before - state.len()) as u64)
    }

    async fn delete_by_target(&self, target: &str, shared_with: &UserId) -> AppResult<u64> {
        let mut state = self.records.write().await;
        let before = state.len();
        state.retain(|r| !(&r.shared_with == shared_with && path::is_within(&r.target, target)));
        Ok((before - state.len()) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
