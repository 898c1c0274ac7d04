//! Share repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sharehub_core::error::{AppError, ErrorKind};
use sharehub_core::result::AppResult;
use sharehub_core::types::UserId;
use sharehub_entity::share::{NewShareRecord, ShareRecord};

use crate::store::ShareStore;

/// SQLSTATE raised by PostgreSQL on a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store for the `shares` relation.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn insert_many(&self, records: &[NewShareRecord]) -> AppResult<Vec<ShareRecord>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin share transaction", e))?;

        let mut inserted = Vec::with_capacity(records.len());
        for data in records {
            let record = sqlx::query_as::<_, ShareRecord>(
                "INSERT INTO shares (id, owner_id, shared_with, source, target, is_writeable) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(&data.owner_id)
            .bind(&data.shared_with)
            .bind(&data.source)
            .bind(&data.target)
            .bind(data.is_writeable)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to create share", e))?;
            inserted.push(record);
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit share transaction", e))?;
        Ok(inserted)
    }

    async fn find_by_target(
        &self,
        target: &str,
        shared_with: &UserId,
    ) -> AppResult<Option<ShareRecord>> {
        let mut rows = sqlx::query_as::<_, ShareRecord>(
            "SELECT * FROM shares WHERE target = $1 AND shared_with = $2 LIMIT 2",
        )
        .bind(target)
        .bind(shared_with)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find share by target", e))?;

        if rows.len() > 1 {
            return Err(AppError::ambiguous(format!(
                "Multiple shares found for target '{target}' and user '{shared_with}'"
            )));
        }
        Ok(rows.pop())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> AppResult<Vec<ShareRecord>> {
        sqlx::query_as::<_, ShareRecord>(
            "SELECT * FROM shares WHERE owner_id = $1 ORDER BY source, shared_with",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list owned shares", e))
    }

    async fn find_within_target(
        &self,
        folder: &str,
        shared_with: &UserId,
    ) -> AppResult<Vec<ShareRecord>> {
        sqlx::query_as::<_, ShareRecord>(
            "SELECT * FROM shares WHERE target LIKE $1 AND shared_with = $2 ORDER BY target",
        )
        .bind(descendant_pattern(folder))
        .bind(shared_with)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list shares in folder", e))
    }

    async fn replace_target_prefix(
        &self,
        old: &str,
        new: &str,
        shared_with: &UserId,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE shares SET target = CASE WHEN target = $1 THEN $3 \
             ELSE rtrim($3, '/') || substr(target, char_length(rtrim($1, '/')) + 1) END \
             WHERE shared_with = $4 AND (target = $1 OR target LIKE $2)",
        )
        .bind(old)
        .bind(descendant_pattern(old))
        .bind(new)
        .bind(shared_with)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to move share target", e))?;
        Ok(result.rows_affected())
    }

    async fn replace_source_prefix(
        &self,
        old: &str,
        new: &str,
        owner_id: &UserId,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE shares SET source = CASE WHEN source = $1 THEN $3 \
             ELSE rtrim($3, '/') || substr(source, char_length(rtrim($1, '/')) + 1) END \
             WHERE owner_id = $4 AND (source = $1 OR source LIKE $2)",
        )
        .bind(old)
        .bind(descendant_pattern(old))
        .bind(new)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to move share source", e))?;
        Ok(result.rows_affected())
    }

    async fn set_writeable(
        &self,
        source: &str,
        shared_with: &UserId,
        owner_id: &UserId,
        is_writeable: bool,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE shares SET is_writeable = $3 \
             WHERE (source = $1 OR source LIKE $2) AND shared_with = $4 AND owner_id = $5",
        )
        .bind(source)
        .bind(descendant_pattern(source))
        .bind(is_writeable)
        .bind(shared_with)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update share permission", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_by_source(
        &self,
        source: &str,
        shared_with: &UserId,
        owner_id: &UserId,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM shares \
             WHERE (source = $1 OR source LIKE $2) AND shared_with = $3 AND owner_id = $4",
        )
        .bind(source)
        .bind(descendant_pattern(source))
        .bind(shared_with)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to unshare source", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_by_target(&self, target: &str, shared_with: &UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM shares WHERE (target = $1 OR target LIKE $2) AND shared_with = $3",
        )
        .bind(target)
        .bind(descendant_pattern(target))
        .bind(shared_with)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to unshare target", e))?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// Map a sqlx error, surfacing unique violations as `Conflict`.
fn db_error(context: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: a share already exists at this target"),
                err,
            );
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

/// Escape LIKE metacharacters using PostgreSQL's default `\` escape.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// LIKE pattern matching every path strictly beneath `prefix`.
fn descendant_pattern(prefix: &str) -> String {
    if prefix == "/" {
        "/%".to_string()
    } else {
        format!("{}/%", escape_like(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("/bob/files/100%_done"), "/bob/files/100\\%\\_done");
        assert_eq!(escape_like("C:\\x"), "C:\\\\x");
    }

    #[test]
    fn test_descendant_pattern() {
        assert_eq!(descendant_pattern("/bob/files/Share"), "/bob/files/Share/%");
        assert_eq!(descendant_pattern("/"), "/%");
    }
}
