//! The dictionary core: search, pagination, gloss navigation and keyword
//! match resolution.
//!
//! Every operation here is a pure function of its inputs and the current
//! database state. Policy flags come in via [`crate::config::DictionaryConfig`]
//! and the caller's identity via [`Viewer`]; nothing is read from ambient
//! mutable state.

pub mod glosses;
pub mod navigate;
pub mod paginate;
pub mod search;
pub mod words;

use std::collections::HashSet;

use thiserror::Error;

/// Errors surfaced by dictionary operations
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// A keyword has no eligible translations, or a gloss lookup did not
    /// resolve to exactly one entry
    #[error("no such dictionary resource")]
    NotFound,
    /// A store query failed; fatal to the request, never retried here
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Capabilities a viewer may hold, granted per user account.
///
/// General-public viewers hold none of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Can search and view full gloss details, including signs not in the
    /// web dictionary
    SearchGloss,
    /// Can view unpublished definitions
    ViewUnpublishedDefs,
    /// Include all properties in the sign detail view
    ViewAdvancedProperties,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::SearchGloss => "search_gloss",
            Capability::ViewUnpublishedDefs => "can_view_unpub_defs",
            Capability::ViewAdvancedProperties => "view_advanced_properties",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "search_gloss" => Some(Capability::SearchGloss),
            "can_view_unpub_defs" => Some(Capability::ViewUnpublishedDefs),
            "view_advanced_properties" => Some(Capability::ViewAdvancedProperties),
            _ => None,
        }
    }
}

/// The identity a dictionary operation runs under
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub authenticated: bool,
    pub capabilities: HashSet<Capability>,
}

impl Viewer {
    /// An unauthenticated general-public viewer
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated viewer holding the given capabilities
    pub fn authenticated(capabilities: HashSet<Capability>) -> Self {
        Self {
            authenticated: true,
            capabilities,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixture data for the dictionary tests.

    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use super::{Capability, Viewer};
    use crate::db;

    /// In-memory pool pinned to one connection so every query sees the
    /// same database
    pub async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    pub fn staff_viewer() -> Viewer {
        Viewer::authenticated(
            [Capability::SearchGloss, Capability::ViewUnpublishedDefs]
                .into_iter()
                .collect(),
        )
    }

    /// Authenticated but without any capability grants
    pub fn member_viewer() -> Viewer {
        Viewer::authenticated(Default::default())
    }

    pub async fn insert_gloss(pool: &SqlitePool, idgloss: &str, sn: Option<i64>, in_web: bool) -> i64 {
        sqlx::query("INSERT INTO glosses (idgloss, sn, in_web) VALUES (?, ?, ?)")
            .bind(idgloss)
            .bind(sn)
            .bind(in_web)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn insert_keyword(pool: &SqlitePool, text: &str) -> i64 {
        sqlx::query("INSERT INTO keywords (text) VALUES (?)")
            .bind(text)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn insert_translation(pool: &SqlitePool, gloss_id: i64, keyword_id: i64, idx: i64) {
        sqlx::query("INSERT INTO translations (gloss_id, keyword_id, idx) VALUES (?, ?, ?)")
            .bind(gloss_id)
            .bind(keyword_id)
            .bind(idx)
            .execute(pool)
            .await
            .unwrap();
    }

    pub async fn tag_gloss(pool: &SqlitePool, gloss_id: i64, tag: &str) {
        sqlx::query("INSERT INTO gloss_tags (gloss_id, tag) VALUES (?, ?)")
            .bind(gloss_id)
            .bind(tag)
            .execute(pool)
            .await
            .unwrap();
    }

    /// A small dictionary exercising every visibility corner:
    ///
    /// | gloss      | sn | in_web | tags            | keywords              |
    /// |------------|----|--------|-----------------|-----------------------|
    /// | HOUSE      | 1  | yes    | semantic:health | house (1)             |
    /// | ABORIGINE  | 3  | yes    |                 | Aborigine (1)         |
    /// | DRINK      | 7  | yes    |                 | hot (2)               |
    /// | SECRET     | 10 | no     |                 | house (2), hound (1)  |
    /// | RUDE-SIGN  | 12 | yes    | lexis:crude     | horrid (1), hot (1)   |
    /// | PROPOSED   | -  | yes    |                 |                       |
    ///
    /// "hopeless" is an orphan keyword with no translations.
    pub async fn seed_pool() -> SqlitePool {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        let house = insert_gloss(&pool, "HOUSE", Some(1), true).await;
        let aborigine = insert_gloss(&pool, "ABORIGINE", Some(3), true).await;
        let drink = insert_gloss(&pool, "DRINK", Some(7), true).await;
        let secret = insert_gloss(&pool, "SECRET", Some(10), false).await;
        let rude = insert_gloss(&pool, "RUDE-SIGN", Some(12), true).await;
        insert_gloss(&pool, "PROPOSED", None, true).await;

        tag_gloss(&pool, house, "semantic:health").await;
        tag_gloss(&pool, rude, "lexis:crude").await;

        let kw_house = insert_keyword(&pool, "house").await;
        insert_translation(&pool, house, kw_house, 1).await;
        insert_translation(&pool, secret, kw_house, 2).await;

        let kw_aborigine = insert_keyword(&pool, "Aborigine").await;
        insert_translation(&pool, aborigine, kw_aborigine, 1).await;

        let kw_hound = insert_keyword(&pool, "hound").await;
        insert_translation(&pool, secret, kw_hound, 1).await;

        let kw_horrid = insert_keyword(&pool, "horrid").await;
        insert_translation(&pool, rude, kw_horrid, 1).await;

        let kw_hot = insert_keyword(&pool, "hot").await;
        insert_translation(&pool, rude, kw_hot, 1).await;
        insert_translation(&pool, drink, kw_hot, 2).await;

        insert_keyword(&pool, "hopeless").await;

        pool
    }
}
