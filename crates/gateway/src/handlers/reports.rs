//! Report handlers

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use newsdesk_common::{
    api::{ArticleView, ReportArticleView, ReportDetailResponse, ReportListResponse},
    errors::{AppError, Result},
    metrics,
    query::{clamp_limit, page_in_range, Pagination},
};

#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

/// `GET /api/reports`
///
/// The listing never fails: malformed parameters fall back to defaults and
/// backend errors yield an empty page.
pub async fn list_reports(
    State(state): State<AppState>,
    query: std::result::Result<Query<ReportListQuery>, QueryRejection>,
) -> Json<ReportListResponse> {
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let dashboard = &state.config.dashboard;
    let page = query.page.unwrap_or(0);
    let limit = clamp_limit(query.limit, dashboard.default_page_size, dashboard.max_page_size);
    let report_type = query
        .report_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if !page_in_range(page, limit) {
        tracing::warn!(page, limit, "Report page out of range, returning empty page");
        return Json(ReportListResponse {
            reports: Vec::new(),
            has_more: false,
            pagination: Pagination::empty(page, limit),
        });
    }

    match state.repo.list_reports(report_type, page, limit).await {
        Ok((reports, total)) => {
            let pagination = Pagination::new(page, limit, total, reports.len());
            Json(ReportListResponse {
                reports,
                has_more: pagination.has_more,
                pagination,
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, "Report listing failed, returning empty page");
            metrics::record_reports_degraded();
            Json(ReportListResponse {
                reports: Vec::new(),
                has_more: false,
                pagination: Pagination::empty(page, limit),
            })
        }
    }
}

/// `GET /api/reports/{id}`
pub async fn get_report(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ReportDetailResponse>> {
    let Path(id) = id.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;
    let found = state
        .repo
        .find_report_with_articles(id)
        .await?
        .ok_or_else(|| AppError::ReportNotFound { id: id.to_string() })?;

    let articles = found
        .entries
        .into_iter()
        .map(|(placement, (article, source))| ReportArticleView {
            article: ArticleView::from_parts(article, source),
            section: placement.section,
            importance_score: placement.importance_score,
        })
        .collect();

    Ok(Json(ReportDetailResponse {
        report: found.report,
        articles,
    }))
}
