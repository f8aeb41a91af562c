//! Article search handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;
use validator::Validate;

use crate::AppState;
use newsdesk_common::{
    api::{ArticleView, SearchRequest, SearchResponse, SearchType},
    errors::{AppError, Result},
    metrics,
};

/// `POST /api/articles/search`
///
/// Semantic search has no vector index behind it yet and is answered by the
/// text path, so both modes return the same rows for the same query.
pub async fn search_articles(
    State(state): State<AppState>,
    body: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>> {
    let Json(request) = body.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;

    let text = request.query.trim().to_string();
    if text.is_empty() {
        return Err(AppError::validation("query", "Search query is required"));
    }
    request.validate()?;

    let start = Instant::now();

    if request.search_type == SearchType::Semantic {
        tracing::warn!(query = %text, "Semantic search unavailable, using text search");
    }

    let rows = state.repo.search_articles(&text, request.limit).await?;

    metrics::record_search(start.elapsed().as_secs_f64(), request.search_type.as_str());
    tracing::info!(
        query = %text,
        mode = request.search_type.as_str(),
        results = rows.len(),
        "Search completed"
    );

    let data: Vec<ArticleView> = rows
        .into_iter()
        .map(|(article, source)| ArticleView::from_parts(article, source))
        .collect();

    Ok(Json(SearchResponse {
        count: data.len(),
        data,
        search_type: request.search_type,
        query: text,
    }))
}
