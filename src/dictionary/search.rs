//! The search query builder: resolves a raw query/category pair to the set
//! of matching keywords under the viewer's visibility rules.

use sqlx::SqlitePool;

use crate::config::DictionaryConfig;
use crate::models::Keyword;
use crate::tags::TagStore;

use super::{Capability, DictionaryError, Viewer};

/// Escape LIKE wildcards so user input only ever matches literally
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Whether safe-search filtering applies to this viewer
pub(crate) fn safe_search_applies(cfg: &DictionaryConfig, viewer: &Viewer) -> bool {
    !viewer.authenticated && cfg.anon_safe_search
}

/// All glosses reachable through a keyword's translations, visible or not.
/// The tag filters below look at the whole set, not the web-visible subset.
pub(crate) async fn reachable_gloss_ids(
    pool: &SqlitePool,
    keyword_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT DISTINCT gloss_id FROM translations WHERE keyword_id = ?")
            .bind(keyword_id)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Find the keywords starting with `query`, restricted to those the viewer
/// may see.
///
/// Keywords match on a case-insensitive prefix and must have at least one
/// translation; without the search_gloss capability only translations to
/// web-visible glosses count. Anonymous viewers additionally lose keywords
/// whose every reachable gloss carries the crude tag when safe search is on,
/// and a category other than "all" keeps only keywords with at least one
/// gloss carrying that tag. An empty result is an empty vec, not an error.
pub async fn search_keywords(
    pool: &SqlitePool,
    tags: &dyn TagStore,
    cfg: &DictionaryConfig,
    query: &str,
    category: &str,
    viewer: &Viewer,
) -> Result<Vec<Keyword>, DictionaryError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let category = cfg.normalize_category(category);

    let pattern = format!("{}%", escape_like(query));
    let sql = if viewer.can(Capability::SearchGloss) {
        "SELECT DISTINCT k.id, k.text FROM keywords k \
         JOIN translations t ON t.keyword_id = k.id \
         WHERE k.text LIKE ? ESCAPE '\\' \
         ORDER BY k.text"
    } else {
        "SELECT DISTINCT k.id, k.text FROM keywords k \
         JOIN translations t ON t.keyword_id = k.id \
         JOIN glosses g ON g.id = t.gloss_id \
         WHERE g.in_web = 1 AND k.text LIKE ? ESCAPE '\\' \
         ORDER BY k.text"
    };

    let mut keywords: Vec<Keyword> = sqlx::query_as(sql).bind(&pattern).fetch_all(pool).await?;

    // Remove crude signs for anonymous users. A keyword survives if at
    // least one of its glosses is not crude. Skipped entirely when the
    // crude tag has never been used.
    if safe_search_applies(cfg, viewer) && tags.tag_exists(&cfg.crude_tag).await? {
        let mut kept = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let mut all_crude = true;
            for gloss_id in reachable_gloss_ids(pool, keyword.id).await? {
                if !tags.tags_for(gloss_id).await?.contains(&cfg.crude_tag) {
                    all_crude = false;
                    break;
                }
            }
            if !all_crude {
                kept.push(keyword);
            }
        }
        keywords = kept;
    }

    // Category restriction: at least one gloss must carry the category tag.
    // Deliberately asymmetric with safe search above.
    if category != "all" {
        let mut kept = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            for gloss_id in reachable_gloss_ids(pool, keyword.id).await? {
                if tags.tags_for(gloss_id).await?.contains(category) {
                    kept.push(keyword);
                    break;
                }
            }
        }
        keywords = kept;
    }

    tracing::debug!(
        query,
        category,
        matches = keywords.len(),
        "keyword search completed"
    );

    Ok(keywords)
}
