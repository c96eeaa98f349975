//! Search API route
//!
//! Evaluates fuzzy/boolean word queries against the stored OCR corpus
//! and returns matching images with the bounding boxes to highlight.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::ImageRepository;
use crate::error::{AppError, Result};
use crate::search::{self, SearchMatch, SearchQuery};
use crate::state::AppState;

/// Create the search router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_images))
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Raw query string, e.g. "invoice AND total"
    pub q: Option<String>,
}

/// Search response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchMatch>,
}

/// Search images endpoint
///
/// GET /api/v1/search?q=invoice AND total
async fn search_images(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let raw = params.q.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest("No query provided".to_string()));
    }

    let query = SearchQuery::parse(&raw);

    // A query that parses to zero terms (e.g. only operators) matches
    // nothing; the corpus read is skipped.
    if query.is_empty() {
        return Ok(Json(SearchResponse {
            query: raw,
            count: 0,
            results: Vec::new(),
        }));
    }

    let corpus = ImageRepository::new(state.db()).all().await?;
    let results = search::search(&query, &corpus);

    Ok(Json(SearchResponse {
        query: raw,
        count: results.len(),
        results,
    }))
}
