//! Read-only access to the gloss tagging facility.
//!
//! The dictionary core never talks to the tag tables directly; it goes
//! through [`TagStore`] so the classification backend can be swapped out.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::SqlitePool;

/// Read-only view of the tags attached to glosses
#[async_trait]
pub trait TagStore: Send + Sync {
    /// All tags attached to the given gloss
    async fn tags_for(&self, gloss_id: i64) -> Result<HashSet<String>, sqlx::Error>;

    /// Whether the named tag is attached to any gloss at all
    async fn tag_exists(&self, tag: &str) -> Result<bool, sqlx::Error>;
}

/// Tag store backed by the gloss_tags table
#[derive(Debug, Clone)]
pub struct SqliteTagStore {
    pool: SqlitePool,
}

impl SqliteTagStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for SqliteTagStore {
    async fn tags_for(&self, gloss_id: i64) -> Result<HashSet<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT tag FROM gloss_tags WHERE gloss_id = ?")
            .bind(gloss_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(tag,)| tag).collect())
    }

    async fn tag_exists(&self, tag: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gloss_tags WHERE tag = ?")
            .bind(tag)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::dictionary::testutil::memory_pool;

    #[tokio::test]
    async fn test_tags_for_and_tag_exists() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        sqlx::query("INSERT INTO glosses (idgloss, sn, in_web) VALUES ('HOUSE', 1, 1)")
            .execute(&pool)
            .await
            .unwrap();
        let gloss_id: i64 = sqlx::query_scalar("SELECT id FROM glosses WHERE idgloss = 'HOUSE'")
            .fetch_one(&pool)
            .await
            .unwrap();

        for tag in ["semantic:health", "lexis:regional"] {
            sqlx::query("INSERT INTO gloss_tags (gloss_id, tag) VALUES (?, ?)")
                .bind(gloss_id)
                .bind(tag)
                .execute(&pool)
                .await
                .unwrap();
        }

        let store = SqliteTagStore::new(pool);
        let tags = store.tags_for(gloss_id).await.unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("semantic:health"));

        assert!(store.tag_exists("lexis:regional").await.unwrap());
        assert!(!store.tag_exists("lexis:crude").await.unwrap());

        // Unknown gloss has no tags rather than an error
        assert!(store.tags_for(9999).await.unwrap().is_empty());
    }
}
