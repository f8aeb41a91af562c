//! Source health and alert handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::AppState;
use newsdesk_common::{
    api::{AlertListResponse, SourceListResponse, SourceView},
    errors::{AppError, Result},
    format::tier_label,
    health::SourceHealth,
};

#[derive(Debug, Default, Deserialize)]
pub struct SourceListQuery {
    pub active: Option<bool>,
    pub tier: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertListQuery {
    pub acknowledged: Option<bool>,
    pub limit: Option<u64>,
}

/// `GET /api/sources`
pub async fn list_sources(
    State(state): State<AppState>,
    query: std::result::Result<Query<SourceListQuery>, QueryRejection>,
) -> Result<Json<SourceListResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;

    let now = Utc::now();
    let sources: Vec<SourceView> = state
        .repo
        .list_sources(query.active, query.tier)
        .await?
        .into_iter()
        .map(|source| SourceView {
            health: SourceHealth::assess(&source, now),
            tier_label: tier_label(source.tier).to_string(),
            source,
        })
        .collect();

    Ok(Json(SourceListResponse {
        count: sources.len(),
        sources,
    }))
}

/// `GET /api/alerts`
pub async fn list_alerts(
    State(state): State<AppState>,
    query: std::result::Result<Query<AlertListQuery>, QueryRejection>,
) -> Result<Json<AlertListResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;

    let max = state.config.dashboard.max_page_size;
    let limit = newsdesk_common::query::clamp_limit(query.limit, 50.min(max), max);

    let alerts = state.repo.list_alerts(query.acknowledged, limit).await?;

    Ok(Json(AlertListResponse {
        count: alerts.len(),
        alerts,
    }))
}
