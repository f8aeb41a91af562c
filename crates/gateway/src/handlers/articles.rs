//! Article listing and detail handlers

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use uuid::Uuid;

use crate::AppState;
use newsdesk_common::{
    api::{ArticleListResponse, ArticleView},
    errors::{AppError, Result},
    metrics,
    query::{clamp_limit, page_in_range, ArticleQuery, Pagination},
};

/// `GET /api/articles`
pub async fn list_articles(
    State(state): State<AppState>,
    query: std::result::Result<Query<ArticleQuery>, QueryRejection>,
) -> Result<Json<ArticleListResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;
    validate_query(&query)?;

    let dashboard = &state.config.dashboard;
    let page = query.page.unwrap_or(0);
    let limit = clamp_limit(query.limit, dashboard.default_page_size, dashboard.max_page_size);
    if !page_in_range(page, limit) {
        return Err(AppError::validation("page", "page is out of range"));
    }

    metrics::record_article_query(query.has_filters());

    let (rows, total) = state.repo.list_articles(&query, page, limit).await?;
    let pagination = Pagination::new(page, limit, total, rows.len());

    tracing::debug!(
        page,
        limit,
        total,
        returned = rows.len(),
        "Listed articles"
    );

    let articles = rows
        .into_iter()
        .map(|(article, source)| ArticleView::from_parts(article, source))
        .collect();

    Ok(Json(ArticleListResponse {
        articles,
        pagination,
    }))
}

/// `GET /api/articles/{id}`
pub async fn get_article(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ArticleView>> {
    let Path(id) = id.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;
    let (article, source) = state
        .repo
        .find_article(id)
        .await?
        .ok_or_else(|| AppError::ArticleNotFound { id: id.to_string() })?;

    Ok(Json(ArticleView::from_parts(article, source)))
}

fn validate_query(query: &ArticleQuery) -> Result<()> {
    if let Some(min) = query.min_relevance {
        if !(0.0..=1.0).contains(&min) {
            return Err(AppError::validation(
                "minRelevance",
                "minRelevance must be between 0 and 1",
            ));
        }
    }

    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::validation(
                "startDate",
                "startDate must not be after endDate",
            ));
        }
    }

    Ok(())
}
