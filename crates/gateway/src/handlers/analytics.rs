//! Analytics handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::time::Instant;

use crate::AppState;
use newsdesk_common::{
    analytics::{self, AnalyticsResponse, Period, TotalMetrics},
    db::Repository,
    errors::{AppError, Result},
    metrics,
};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
}

/// `GET /api/analytics?days=N`
pub async fn get_analytics(
    State(state): State<AppState>,
    query: std::result::Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<AnalyticsResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;

    let dashboard = &state.config.dashboard;
    let days = query.days.unwrap_or(dashboard.analytics_default_days);
    if !(1..=dashboard.analytics_max_days).contains(&days) {
        return Err(AppError::validation(
            "days",
            format!("days must be between 1 and {}", dashboard.analytics_max_days),
        ));
    }

    let start = Instant::now();
    let period = Period::trailing(days, Utc::now());
    let repo = &state.repo;

    let (samples, costs, source_rows, (daily_counts, total_reports)) = futures::try_join!(
        repo.system_metrics(period.start, period.end),
        repo.cost_records(period.start, period.end),
        repo.source_statistics(period.start_date(), period.end_date()),
        window_counts(repo, &period),
    )?;

    let total_metrics = TotalMetrics {
        total_articles: daily_counts.iter().map(|(_, n)| n).sum(),
        total_reports,
        total_cost: analytics::total_cost(&costs),
        avg_processing_time_ms: analytics::avg_processing_time(&samples),
        uptime: analytics::uptime(&samples),
    };

    let response = AnalyticsResponse {
        period,
        total_metrics,
        daily_costs: analytics::daily_costs(&costs),
        cost_breakdown: analytics::cost_breakdown(&costs),
        daily_articles: analytics::daily_article_volume(&daily_counts),
        source_performance: analytics::source_performance(&source_rows),
        latest_snapshot: analytics::latest_snapshot(&samples),
    };

    let elapsed = start.elapsed().as_secs_f64();
    metrics::record_analytics(elapsed, days);
    tracing::info!(
        days,
        cost_records = costs.len(),
        sources = response.source_performance.len(),
        elapsed_ms = (elapsed * 1000.0) as u64,
        "Analytics aggregated"
    );

    Ok(Json(response))
}

/// Processed-article counts per day and report count for the window.
///
/// These only feed headline counters, so failures read as zero.
async fn window_counts(
    repo: &Repository,
    period: &Period,
) -> Result<(Vec<(NaiveDate, u64)>, u64)> {
    let (daily, reports) = futures::join!(
        repo.daily_processed_counts(period.start, period.end),
        repo.count_reports(period.start, period.end),
    );

    let daily = daily.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Article count failed, reporting zero");
        Vec::new()
    });
    let reports = reports.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Report count failed, reporting zero");
        0
    });

    Ok((daily, reports))
}
