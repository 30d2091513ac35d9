//! Keyword match resolution: the word page maps "keyword-n" to the nth
//! translation of that keyword the viewer is allowed to see.

use sqlx::SqlitePool;

use crate::config::DictionaryConfig;
use crate::models::{Keyword, Translation};
use crate::tags::TagStore;

use super::search::safe_search_applies;
use super::{Capability, DictionaryError, Viewer};

/// Look up a keyword by its exact text
pub async fn keyword_by_text(pool: &SqlitePool, text: &str) -> Result<Keyword, DictionaryError> {
    sqlx::query_as("SELECT id, text FROM keywords WHERE text = ?")
        .bind(text)
        .fetch_optional(pool)
        .await?
        .ok_or(DictionaryError::NotFound)
}

/// Resolve the translation matching a keyword request given a 1-based index
/// `n`, together with the total number of matches for this viewer.
///
/// Translations are ordered by (gloss, index) and restricted to web-visible
/// glosses unless the viewer holds search_gloss; safe search then drops
/// crude glosses for anonymous viewers. An empty list is NotFound. An `n`
/// past the end is not an error: the last match is returned instead.
pub async fn match_keyword(
    pool: &SqlitePool,
    tags: &dyn TagStore,
    cfg: &DictionaryConfig,
    keyword: &Keyword,
    n: usize,
    viewer: &Viewer,
) -> Result<(Translation, usize), DictionaryError> {
    let sql = if viewer.can(Capability::SearchGloss) {
        "SELECT t.id, t.gloss_id, t.keyword_id, t.idx FROM translations t \
         JOIN glosses g ON g.id = t.gloss_id \
         WHERE t.keyword_id = ? \
         ORDER BY g.idgloss, t.idx"
    } else {
        "SELECT t.id, t.gloss_id, t.keyword_id, t.idx FROM translations t \
         JOIN glosses g ON g.id = t.gloss_id \
         WHERE t.keyword_id = ? AND g.in_web = 1 \
         ORDER BY g.idgloss, t.idx"
    };

    let mut translations: Vec<Translation> = sqlx::query_as(sql)
        .bind(keyword.id)
        .fetch_all(pool)
        .await?;

    if safe_search_applies(cfg, viewer) && tags.tag_exists(&cfg.crude_tag).await? {
        let mut kept = Vec::with_capacity(translations.len());
        for translation in translations {
            if !tags
                .tags_for(translation.gloss_id)
                .await?
                .contains(&cfg.crude_tag)
            {
                kept.push(translation);
            }
        }
        translations = kept;
    }

    if translations.is_empty() {
        return Err(DictionaryError::NotFound);
    }

    let total = translations.len();
    // Take the nth translation if n is in range, otherwise the last
    let idx = n.checked_sub(1).map_or(total - 1, |i| i.min(total - 1));

    Ok((translations[idx].clone(), total))
}
