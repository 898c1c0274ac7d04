//! Share resolution and propagation.
//!
//! Only explicitly shared items, and items whose location or permission
//! diverges from their enclosing share, have a record. Every other path
//! beneath a shared folder is resolved by walking up its ancestors until a
//! record is found and appending the remaining suffix to that record's
//! source.
//!
//! Resolution order:
//! 1. Exact record for `(target, requester)`.
//! 2. Nearest ancestor record, walking parent by parent.
//! 3. Not shared.
//!
//! The walk never queries the requester's storage root (`/<user>/files`)
//! or anything above it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sharehub_core::config::SharingConfig;
use sharehub_core::error::AppError;
use sharehub_core::result::AppResult;
use sharehub_core::traits::FileSystem;
use sharehub_core::types::{UserId, path};
use sharehub_database::store::ShareStore;
use sharehub_entity::share::{
    NestedShare, NewShareRecord, OwnedShare, PublicLink, ResolvedShare, ShareOutcome, ShareRecord,
};

use super::link::LinkService;
use crate::context::RequestContext;

/// Resolves, creates, and maintains shares over an injected store.
#[derive(Debug, Clone)]
pub struct ShareResolver {
    /// Backing store for share records.
    store: Arc<dyn ShareStore>,
    /// Filesystem capability used to validate new shares.
    fs: Arc<dyn FileSystem>,
    /// Public link token derivation.
    links: LinkService,
    /// Share namespace settings.
    config: SharingConfig,
}

impl ShareResolver {
    /// Creates a new share resolver.
    pub fn new(store: Arc<dyn ShareStore>, fs: Arc<dyn FileSystem>, config: SharingConfig) -> Self {
        debug!(
            provider = fs.provider_type(),
            share_folder = %config.share_folder,
            "Share resolver initialized"
        );
        Self {
            store,
            fs,
            links: LinkService::new(),
            config,
        }
    }

    /// Shares `source` with each recipient, or derives a public link token.
    ///
    /// Each recipient receives the item at
    /// `/<recipient>/files/<share_folder>/<path relative to the owner's files root>`.
    /// All records are inserted together. No check is made for an item
    /// already present at a recipient's target; such an insert is rejected
    /// by the store with `Conflict`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        source: &str,
        recipients: &[UserId],
        is_writeable: bool,
        public: bool,
    ) -> AppResult<ShareOutcome> {
        let owner = &ctx.user_id;
        let source = absolute(source)?;

        if !self.fs.exists(&source).await? || !self.fs.is_readable(&source, owner).await? {
            warn!(user = %owner, source = %source, "Rejected share of missing or unreadable source");
            return Err(AppError::validation(format!(
                "Source '{source}' does not exist or is not readable by '{owner}'"
            )));
        }

        let relative = path::relative_under(&source, &owner.files_root())
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Source '{source}' is not inside the files of '{owner}'"
                ))
            })?
            .to_string();

        if public {
            let token = self.links.derive_token(owner, &source);
            info!(user = %owner, source = %source, "Public link derived");
            return Ok(ShareOutcome::PublicLink(PublicLink {
                owner_id: owner.clone(),
                source,
                token,
            }));
        }

        if recipients.is_empty() {
            return Err(AppError::validation("At least one recipient is required"));
        }

        let records: Vec<NewShareRecord> = recipients
            .iter()
            .map(|recipient| NewShareRecord {
                owner_id: owner.clone(),
                shared_with: recipient.clone(),
                source: source.clone(),
                target: self.target_for(recipient, &relative),
                is_writeable,
            })
            .collect();

        let records = self.store.insert_many(&records).await?;

        info!(
            user = %owner,
            source = %source,
            recipients = records.len(),
            is_writeable,
            requested_at = %ctx.request_time,
            "Share created"
        );

        Ok(ShareOutcome::Shared { records })
    }

    /// Resolves the real source behind `target` for the requester.
    ///
    /// Returns `None` when nothing covers the path.
    pub async fn resolve_source(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> AppResult<Option<ResolvedShare>> {
        let target = absolute(target)?;

        if let Some(record) = self.store.find_by_target(&target, &ctx.user_id).await? {
            return Ok(Some(ResolvedShare {
                owner_id: record.owner_id,
                source: record.source,
                covering_target: record.target,
                is_writeable: record.is_writeable,
                inherited: false,
            }));
        }

        let Some(ancestor) = self.resolve_ancestor(ctx, &target).await? else {
            debug!(user = %ctx.user_id, target = %target, "Target is not shared");
            return Ok(None);
        };

        let source = ancestor.source_for(&target).ok_or_else(|| {
            AppError::internal(format!(
                "Ancestor '{}' does not contain '{target}'",
                ancestor.target
            ))
        })?;

        Ok(Some(ResolvedShare {
            owner_id: ancestor.owner_id,
            source,
            covering_target: ancestor.target,
            is_writeable: ancestor.is_writeable,
            inherited: true,
        }))
    }

    /// Finds the nearest ancestor record covering `target`.
    ///
    /// The exact record at `target`, if any, is not considered.
    pub async fn resolve_ancestor(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> AppResult<Option<ShareRecord>> {
        let mut current = path::normalize(target);
        let user_root = path::user_root(&current).map(str::to_string);
        let is_boundary =
            |p: &str| matches!(p, "" | "/" | ".") || user_root.as_deref() == Some(p);

        if is_boundary(&current) {
            return Ok(None);
        }

        loop {
            let parent = path::parent(&current).to_string();
            if is_boundary(&parent) {
                return Ok(None);
            }

            debug!(user = %ctx.user_id, parent = %parent, "Checking ancestor for share");
            if let Some(record) = self.store.find_by_target(&parent, &ctx.user_id).await? {
                return Ok(Some(record));
            }
            current = parent;
        }
    }

    /// Whether the requester may write the item at `target`.
    ///
    /// Inherits from the covering ancestor; defaults to `false` when the
    /// path is not shared.
    pub async fn is_writeable(&self, ctx: &RequestContext, target: &str) -> AppResult<bool> {
        Ok(self
            .resolve_source(ctx, target)
            .await?
            .is_some_and(|resolved| resolved.is_writeable))
    }

    /// Lists every explicit record owned by the acting user.
    pub async fn list_owned_shares(&self, ctx: &RequestContext) -> AppResult<Vec<OwnedShare>> {
        let records = self.store.find_by_owner(&ctx.user_id).await?;
        Ok(records.into_iter().map(OwnedShare::from).collect())
    }

    /// Lists the requester's explicit records nested inside `target_folder`.
    ///
    /// The folder's own record is excluded. Passing `/<user>/files` lists
    /// everything shared with the user.
    pub async fn list_within_folder(
        &self,
        ctx: &RequestContext,
        target_folder: &str,
    ) -> AppResult<Vec<NestedShare>> {
        let folder = absolute(target_folder)?;
        let records = self.store.find_within_target(&folder, &ctx.user_id).await?;
        Ok(records.into_iter().map(NestedShare::from).collect())
    }

    /// Renames a target and every nested record of the requester.
    ///
    /// Both paths must lie strictly beneath the requester's
    /// `/<user>/files`; anything else is rejected with `Validation`.
    ///
    /// Paths only covered by inheritance follow automatically. Use
    /// [`pull_out_of_folder`](Self::pull_out_of_folder) to move an item that
    /// has no record of its own out of its shared folder.
    pub async fn move_target(
        &self,
        ctx: &RequestContext,
        old_target: &str,
        new_target: &str,
    ) -> AppResult<u64> {
        let old = absolute(old_target)?;
        let new = absolute(new_target)?;
        within_files_root(&ctx.user_id, &old)?;
        within_files_root(&ctx.user_id, &new)?;
        if old == new {
            return Ok(0);
        }

        let affected = self
            .store
            .replace_target_prefix(&old, &new, &ctx.user_id)
            .await?;

        info!(user = %ctx.user_id, old = %old, new = %new, affected, "Share target moved");
        Ok(affected)
    }

    /// Renames a source and every nested record of the owner, keeping
    /// every recipient's view pointed at the moved file.
    ///
    /// Both paths must lie strictly beneath the owner's `/<user>/files`.
    pub async fn move_source(
        &self,
        ctx: &RequestContext,
        old_source: &str,
        new_source: &str,
    ) -> AppResult<u64> {
        let old = absolute(old_source)?;
        let new = absolute(new_source)?;
        within_files_root(&ctx.user_id, &old)?;
        within_files_root(&ctx.user_id, &new)?;
        if old == new {
            return Ok(0);
        }

        let affected = self
            .store
            .replace_source_prefix(&old, &new, &ctx.user_id)
            .await?;

        info!(user = %ctx.user_id, old = %old, new = %new, affected, "Share source moved");
        Ok(affected)
    }

    /// Sets the write permission of `source` and its nested records for
    /// each recipient.
    ///
    /// An item inside a shared folder that needs a different permission
    /// than the folder must first receive its own record.
    pub async fn set_writeable(
        &self,
        ctx: &RequestContext,
        source: &str,
        recipients: &[UserId],
        is_writeable: bool,
    ) -> AppResult<u64> {
        let source = absolute(source)?;

        let mut affected = 0;
        for recipient in recipients {
            affected += self
                .store
                .set_writeable(&source, recipient, &ctx.user_id, is_writeable)
                .await?;
        }

        info!(
            user = %ctx.user_id,
            source = %source,
            recipients = recipients.len(),
            is_writeable,
            affected,
            "Share permission changed"
        );
        Ok(affected)
    }

    /// Gives an item inside a shared folder its own record at `new_target`.
    ///
    /// The new record carries the covering folder's owner and permission
    /// and the source implied for `old_target`. `old_target` and
    /// `new_target` may be equal; `new_target` must lie beneath the
    /// requester's `/<user>/files`.
    pub async fn pull_out_of_folder(
        &self,
        ctx: &RequestContext,
        old_target: &str,
        new_target: &str,
    ) -> AppResult<ShareRecord> {
        let old = absolute(old_target)?;
        let new = absolute(new_target)?;
        within_files_root(&ctx.user_id, &new)?;

        let ancestor = self.resolve_ancestor(ctx, &old).await?.ok_or_else(|| {
            AppError::not_shared(format!("'{old}' is not inside a folder shared with '{}'", ctx.user_id))
        })?;

        let source = ancestor.source_for(&old).ok_or_else(|| {
            AppError::internal(format!("Ancestor '{}' does not contain '{old}'", ancestor.target))
        })?;

        let record = NewShareRecord {
            owner_id: ancestor.owner_id,
            shared_with: ctx.user_id.clone(),
            source,
            target: new,
            is_writeable: ancestor.is_writeable,
        };

        let record = self
            .store
            .insert_many(std::slice::from_ref(&record))
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Share insert returned no record"))?;

        info!(
            user = %ctx.user_id,
            old = %old,
            new = %record.target,
            source = %record.source,
            "Share pulled out of folder"
        );
        Ok(record)
    }

    /// Removes the owner's records under `source` for each recipient.
    ///
    /// Only the mapping is removed; the real file is never touched.
    pub async fn unshare(
        &self,
        ctx: &RequestContext,
        source: &str,
        recipients: &[UserId],
    ) -> AppResult<u64> {
        let source = absolute(source)?;

        let mut removed = 0;
        for recipient in recipients {
            removed += self
                .store
                .delete_by_source(&source, recipient, &ctx.user_id)
                .await?;
        }

        info!(user = %ctx.user_id, source = %source, removed, "Share removed");
        Ok(removed)
    }

    /// Removes the requester's own records under `target`.
    ///
    /// The owner's and other recipients' records are unaffected.
    pub async fn unshare_from_self(&self, ctx: &RequestContext, target: &str) -> AppResult<u64> {
        let target = absolute(target)?;
        let removed = self.store.delete_by_target(&target, &ctx.user_id).await?;

        info!(user = %ctx.user_id, target = %target, removed, "Share removed from self");
        Ok(removed)
    }

    /// Target path of a new share for `recipient`.
    fn target_for(&self, recipient: &UserId, relative: &str) -> String {
        path::normalize(&format!(
            "{}/{}/{}",
            recipient.files_root(),
            self.config.share_folder,
            relative
        ))
    }
}

/// Normalize a path and require it to be absolute.
fn absolute(raw: &str) -> AppResult<String> {
    let normalized = path::normalize(raw);
    if !normalized.starts_with('/') {
        return Err(AppError::validation(format!(
            "Path '{raw}' must be absolute"
        )));
    }
    Ok(normalized)
}

/// Require `path` to lie strictly beneath the user's storage root.
fn within_files_root(user: &UserId, path: &str) -> AppResult<()> {
    if path::relative_under(path, &user.files_root()).is_none() {
        return Err(AppError::validation(format!(
            "Path '{path}' is not inside the files of '{user}'"
        )));
    }
    Ok(())
}
