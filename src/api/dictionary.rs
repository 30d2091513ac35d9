use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::Cookies;

use signbank_backend::config::{self, DictionaryConfig};
use signbank_backend::dictionary::glosses::{
    definitions_for, gloss_by_idgloss, relations_for, DefinitionGroup, RelationView,
};
use signbank_backend::dictionary::navigate::{navigation, position};
use signbank_backend::dictionary::paginate::{paginate, PageInfo};
use signbank_backend::dictionary::search::search_keywords;
use signbank_backend::dictionary::words::{keyword_by_text, match_keyword};
use signbank_backend::dictionary::{Capability, DictionaryError, Viewer};
use signbank_backend::models::{Gloss, GLOSS_COLUMNS};

use crate::auth::current_viewer;
use crate::state::AppState;

use super::ApiResponse;

/// Map core errors onto HTTP outcomes: NotFound is terminal 404, store
/// failures are fatal to the request
fn map_error(err: DictionaryError) -> (StatusCode, String) {
    match err {
        DictionaryError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
        DictionaryError::Database(e) => {
            tracing::error!("Dictionary query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    }
}

/// Gate shared by all dictionary endpoints when logins are mandatory
fn require_login(cfg: &DictionaryConfig, viewer: &Viewer) -> Result<(), (StatusCode, String)> {
    if cfg.always_require_login && !viewer.authenticated {
        Err((StatusCode::UNAUTHORIZED, "login required".to_string()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: String,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub category: String,
    pub results: Vec<String>,
    pub page: PageInfo,
    /// Set when the whole result is one keyword equal to the query; the
    /// frontend skips the results list and goes straight to its word page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_exact_match: Option<String>,
}

/// GET /api/dictionary/search?query=&category=&page=
pub async fn search(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResponse>>, (StatusCode, String)> {
    let cfg = config::config().dictionary;
    let viewer = current_viewer(&cookies, &state.db).await;
    require_login(&cfg, &viewer)?;

    let query = params.query.trim().to_string();
    if query.is_empty() {
        return Ok(Json(ApiResponse::error("query must not be empty")));
    }

    let keywords = search_keywords(&state.db, &state.tags, &cfg, &query, &params.category, &viewer)
        .await
        .map_err(map_error)?;

    let single_exact_match = (keywords.len() == 1
        && keywords[0].text.eq_ignore_ascii_case(&query))
    .then(|| keywords[0].text.clone());

    let page = paginate(&keywords, cfg.page_size, params.page.as_deref());

    Ok(Json(ApiResponse::success(SearchResponse {
        query,
        category: cfg.normalize_category(&params.category).to_string(),
        results: page.items.into_iter().map(|k| k.text).collect(),
        page: page.info,
        single_exact_match,
    })))
}

/// GET /api/dictionary/categories - choices for the search form
pub async fn categories(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<ApiResponse<Vec<String>>>, (StatusCode, String)> {
    let cfg = config::config().dictionary;
    let viewer = current_viewer(&cookies, &state.db).await;
    require_login(&cfg, &viewer)?;

    let mut choices = vec!["all".to_string()];
    choices.extend(cfg.categories.iter().cloned());
    Ok(Json(ApiResponse::success(choices)))
}

#[derive(Debug, Serialize)]
pub struct GlossSummary {
    pub idgloss: String,
    pub annotation_idgloss: Option<String>,
    pub sn: Option<i64>,
    pub in_web: bool,
}

impl From<&Gloss> for GlossSummary {
    fn from(gloss: &Gloss) -> Self {
        Self {
            idgloss: gloss.idgloss.clone(),
            annotation_idgloss: gloss.annotation_idgloss.clone(),
            sn: gloss.sn,
            in_web: gloss.in_web.unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub keyword: String,
    /// Index actually served; out-of-range requests clamp to the last match
    pub index: usize,
    pub total_matches: usize,
    pub gloss: GlossSummary,
}

/// GET /api/dictionary/words/:keyword/:n
pub async fn word(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path((keyword_text, n)): Path<(String, usize)>,
) -> Result<Json<ApiResponse<WordResponse>>, (StatusCode, String)> {
    let cfg = config::config().dictionary;
    let viewer = current_viewer(&cookies, &state.db).await;
    require_login(&cfg, &viewer)?;

    let keyword = keyword_by_text(&state.db, &keyword_text)
        .await
        .map_err(map_error)?;
    let (translation, total) = match_keyword(&state.db, &state.tags, &cfg, &keyword, n, &viewer)
        .await
        .map_err(map_error)?;

    let gloss: Gloss =
        sqlx::query_as(&format!("SELECT {GLOSS_COLUMNS} FROM glosses WHERE id = ?"))
            .bind(translation.gloss_id)
            .fetch_one(&state.db)
            .await
            .map_err(|e| map_error(DictionaryError::Database(e)))?;

    // Mirror the resolver's fallback: anything out of range served the last
    let index = if (1..=total).contains(&n) { n } else { total };

    Ok(Json(ApiResponse::success(WordResponse {
        keyword: keyword.text,
        index,
        total_matches: total,
        gloss: GlossSummary::from(&gloss),
    })))
}

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub idgloss: String,
    pub sn: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct GlossNavigation {
    pub next: Option<NavLink>,
    pub prev: Option<NavLink>,
    /// 1-based rank among the glosses this viewer can see, 0 when the
    /// gloss has no sign number
    pub position: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct GlossResponse {
    pub gloss: Gloss,
    pub definitions: Vec<DefinitionGroup>,
    pub relations: Vec<RelationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<GlossNavigation>,
}

/// GET /api/dictionary/gloss/:idgloss - the gloss preview page
pub async fn gloss_detail(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(idgloss): Path<String>,
) -> Result<Json<ApiResponse<GlossResponse>>, (StatusCode, String)> {
    let cfg = config::config().dictionary;
    let viewer = current_viewer(&cookies, &state.db).await;
    require_login(&cfg, &viewer)?;

    let gloss = gloss_by_idgloss(&state.db, &idgloss)
        .await
        .map_err(map_error)?;

    // Signs outside the web dictionary exist only for full-detail viewers
    let see_all = viewer.can(Capability::SearchGloss);
    if !see_all && !gloss.in_web.unwrap_or(false) {
        return Err(map_error(DictionaryError::NotFound));
    }

    let definitions = definitions_for(&state.db, gloss.id, &viewer)
        .await
        .map_err(map_error)?;
    let relations = relations_for(&state.db, gloss.id).await.map_err(map_error)?;

    let nav = if cfg.sign_navigation {
        let links = navigation(&state.db, &gloss, see_all)
            .await
            .map_err(map_error)?;
        let (ordinal, total) = position(&state.db, &gloss, see_all)
            .await
            .map_err(map_error)?;
        Some(GlossNavigation {
            next: links.next.map(|g| NavLink {
                idgloss: g.idgloss,
                sn: g.sn,
            }),
            prev: links.prev.map(|g| NavLink {
                idgloss: g.idgloss,
                sn: g.sn,
            }),
            position: ordinal,
            total,
        })
    } else {
        None
    };

    Ok(Json(ApiResponse::success(GlossResponse {
        gloss,
        definitions,
        relations,
        navigation: nav,
    })))
}
