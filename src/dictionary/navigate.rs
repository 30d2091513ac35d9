//! Gloss position and next/previous navigation over the sign-number order.
//!
//! Sign numbers are unique but gappy, so a gloss's position is its rank in
//! ascending `sn` order among the glosses the viewer may see, not the raw
//! `sn` value.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{Gloss, GLOSS_COLUMNS};

use super::DictionaryError;

/// Next/previous links for a gloss page
#[derive(Debug, Clone, Serialize)]
pub struct Navigation {
    pub next: Option<Gloss>,
    pub prev: Option<Gloss>,
}

/// Compute (ordinal, total) for a gloss among the considered glosses: all of
/// them for staff, only web-visible ones otherwise.
///
/// A gloss with no sign number has no position and yields (0, 0).
pub async fn position(
    pool: &SqlitePool,
    gloss: &Gloss,
    see_all: bool,
) -> Result<(i64, i64), DictionaryError> {
    let Some(sn) = gloss.sn else {
        return Ok((0, 0));
    };

    let (total_sql, before_sql) = if see_all {
        (
            "SELECT COUNT(*) FROM glosses",
            "SELECT COUNT(*) FROM glosses WHERE sn < ?",
        )
    } else {
        (
            "SELECT COUNT(*) FROM glosses WHERE in_web = 1",
            "SELECT COUNT(*) FROM glosses WHERE in_web = 1 AND sn < ?",
        )
    };

    let total: i64 = sqlx::query_scalar(total_sql).fetch_one(pool).await?;
    let before: i64 = sqlx::query_scalar(before_sql)
        .bind(sn)
        .fetch_one(pool)
        .await?;

    Ok((before + 1, total))
}

/// Find the next gloss in dictionary order, None at the end or when the
/// gloss has no sign number
pub async fn next_gloss(
    pool: &SqlitePool,
    gloss: &Gloss,
    see_all: bool,
) -> Result<Option<Gloss>, DictionaryError> {
    let Some(sn) = gloss.sn else {
        return Ok(None);
    };

    let sql = if see_all {
        format!("SELECT {GLOSS_COLUMNS} FROM glosses WHERE sn > ? ORDER BY sn ASC LIMIT 1")
    } else {
        format!(
            "SELECT {GLOSS_COLUMNS} FROM glosses WHERE sn > ? AND in_web = 1 ORDER BY sn ASC LIMIT 1"
        )
    };

    Ok(sqlx::query_as(&sql).bind(sn).fetch_optional(pool).await?)
}

/// Find the previous gloss in dictionary order
pub async fn prev_gloss(
    pool: &SqlitePool,
    gloss: &Gloss,
    see_all: bool,
) -> Result<Option<Gloss>, DictionaryError> {
    let Some(sn) = gloss.sn else {
        return Ok(None);
    };

    let sql = if see_all {
        format!("SELECT {GLOSS_COLUMNS} FROM glosses WHERE sn < ? ORDER BY sn DESC LIMIT 1")
    } else {
        format!(
            "SELECT {GLOSS_COLUMNS} FROM glosses WHERE sn < ? AND in_web = 1 ORDER BY sn DESC LIMIT 1"
        )
    };

    Ok(sqlx::query_as(&sql).bind(sn).fetch_optional(pool).await?)
}

/// Both neighbor links in one structure, for the gloss page
pub async fn navigation(
    pool: &SqlitePool,
    gloss: &Gloss,
    see_all: bool,
) -> Result<Navigation, DictionaryError> {
    Ok(Navigation {
        next: next_gloss(pool, gloss, see_all).await?,
        prev: prev_gloss(pool, gloss, see_all).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::dictionary::testutil::{insert_gloss, memory_pool};
    use crate::models::GLOSS_COLUMNS;

    async fn gloss_by_sn(pool: &SqlitePool, sn: i64) -> Gloss {
        sqlx::query_as(&format!("SELECT {GLOSS_COLUMNS} FROM glosses WHERE sn = ?"))
            .bind(sn)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_rank_ignores_sequence_gaps() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        insert_gloss(&pool, "ONE", Some(1), true).await;
        insert_gloss(&pool, "THREE", Some(3), true).await;
        insert_gloss(&pool, "SEVEN", Some(7), true).await;

        let three = gloss_by_sn(&pool, 3).await;
        assert_eq!(position(&pool, &three, true).await.unwrap(), (2, 3));

        let seven = gloss_by_sn(&pool, 7).await;
        assert_eq!(position(&pool, &seven, true).await.unwrap(), (3, 3));
    }

    #[tokio::test]
    async fn test_position_without_sn_is_zero() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        insert_gloss(&pool, "ONE", Some(1), true).await;
        let unplaced_id = insert_gloss(&pool, "UNPLACED", None, true).await;

        let unplaced: Gloss =
            sqlx::query_as(&format!("SELECT {GLOSS_COLUMNS} FROM glosses WHERE id = ?"))
                .bind(unplaced_id)
                .fetch_one(&pool)
                .await
                .unwrap();

        assert_eq!(position(&pool, &unplaced, true).await.unwrap(), (0, 0));
        assert!(next_gloss(&pool, &unplaced, true).await.unwrap().is_none());
        assert!(prev_gloss(&pool, &unplaced, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_public_position_counts_only_web_glosses() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        insert_gloss(&pool, "ONE", Some(1), true).await;
        insert_gloss(&pool, "HIDDEN", Some(2), false).await;
        insert_gloss(&pool, "FIVE", Some(5), true).await;

        let five = gloss_by_sn(&pool, 5).await;
        assert_eq!(position(&pool, &five, false).await.unwrap(), (2, 2));
        assert_eq!(position(&pool, &five, true).await.unwrap(), (3, 3));
    }

    #[tokio::test]
    async fn test_next_and_prev_skip_invisible_glosses() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        insert_gloss(&pool, "ONE", Some(1), true).await;
        insert_gloss(&pool, "HIDDEN", Some(2), false).await;
        insert_gloss(&pool, "FIVE", Some(5), true).await;

        let one = gloss_by_sn(&pool, 1).await;

        let staff_next = next_gloss(&pool, &one, true).await.unwrap().unwrap();
        assert_eq!(staff_next.idgloss, "HIDDEN");

        let public_next = next_gloss(&pool, &one, false).await.unwrap().unwrap();
        assert_eq!(public_next.idgloss, "FIVE");

        let five = gloss_by_sn(&pool, 5).await;
        let public_prev = prev_gloss(&pool, &five, false).await.unwrap().unwrap();
        assert_eq!(public_prev.idgloss, "ONE");

        // Boundaries
        assert!(prev_gloss(&pool, &one, true).await.unwrap().is_none());
        assert!(next_gloss(&pool, &five, true).await.unwrap().is_none());
    }
}
