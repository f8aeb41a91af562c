//! Dashboard analytics aggregation
//!
//! Pure functions over rows already fetched for the reporting window.
//! Output ordering is deterministic: dates ascending, groups by key.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::db::models::{CostRecord, NewsSource, SourceStatistics, SystemMetric};

/// Reporting window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub days: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    /// Trailing `days` ending at `now`
    pub fn trailing(days: i64, now: DateTime<Utc>) -> Self {
        Self {
            days,
            start: now - chrono::Duration::days(days),
            end: now,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCost {
    pub date: NaiveDate,
    pub cost: f64,
    pub operations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub operation_type: String,
    pub cost: f64,
    pub operations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub articles: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePerformance {
    pub source_id: Uuid,
    pub name: String,
    pub tier: Option<i32>,
    pub articles_fetched: i64,
    pub articles_processed: i64,
    pub fetch_errors: i64,
    pub total_cost: f64,
    /// Mean of the daily averages that were recorded
    pub avg_relevance: Option<f64>,
    /// processed / fetched, in percent
    pub success_rate: Option<f64>,
    pub days_reported: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalMetrics {
    pub total_articles: u64,
    pub total_reports: u64,
    pub total_cost: f64,
    pub avg_processing_time_ms: Option<f64>,
    /// Mean sampled success rate, in percent
    pub uptime: Option<f64>,
}

/// `GET /api/analytics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub period: Period,
    pub total_metrics: TotalMetrics,
    pub daily_costs: Vec<DailyCost>,
    pub cost_breakdown: Vec<CostBreakdown>,
    pub daily_articles: Vec<DailyVolume>,
    pub source_performance: Vec<SourcePerformance>,
    pub latest_snapshot: Option<SystemMetric>,
}

/// Sum of all cost rows
pub fn total_cost(records: &[CostRecord]) -> f64 {
    records.iter().map(|r| r.cost).sum()
}

/// Costs grouped by the UTC calendar date of `created_at`
pub fn daily_costs(records: &[CostRecord]) -> Vec<DailyCost> {
    let mut by_day: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();
    for record in records {
        let day = record.created_at.with_timezone(&Utc).date_naive();
        let entry = by_day.entry(day).or_default();
        entry.0 += record.cost;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (cost, operations))| DailyCost { date, cost, operations })
        .collect()
}

/// Costs grouped by operation type, most expensive first
pub fn cost_breakdown(records: &[CostRecord]) -> Vec<CostBreakdown> {
    let mut by_type: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for record in records {
        let entry = by_type.entry(record.operation_type.as_str()).or_default();
        entry.0 += record.cost;
        entry.1 += 1;
    }

    let mut breakdown: Vec<CostBreakdown> = by_type
        .into_iter()
        .map(|(operation_type, (cost, operations))| CostBreakdown {
            operation_type: operation_type.to_string(),
            cost,
            operations,
        })
        .collect();
    breakdown.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    breakdown
}

/// Article counts per UTC day, ascending, with duplicate days merged
pub fn daily_article_volume(counts: &[(NaiveDate, u64)]) -> Vec<DailyVolume> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for (date, n) in counts {
        *by_day.entry(*date).or_default() += n;
    }

    by_day
        .into_iter()
        .map(|(date, articles)| DailyVolume { date, articles })
        .collect()
}

/// Per-source rollup keyed by source id.
///
/// Rows whose source was not found are reported under the name "Unknown source".
pub fn source_performance(rows: &[(SourceStatistics, Option<NewsSource>)]) -> Vec<SourcePerformance> {
    struct Acc {
        name: String,
        tier: Option<i32>,
        fetched: i64,
        processed: i64,
        errors: i64,
        cost: f64,
        relevance_sum: f64,
        relevance_n: u32,
        days: u32,
    }

    let mut by_source: BTreeMap<Uuid, Acc> = BTreeMap::new();
    for (stats, source) in rows {
        let acc = by_source.entry(stats.source_id).or_insert_with(|| Acc {
            name: source
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown source".to_string()),
            tier: source.as_ref().map(|s| s.tier),
            fetched: 0,
            processed: 0,
            errors: 0,
            cost: 0.0,
            relevance_sum: 0.0,
            relevance_n: 0,
            days: 0,
        });

        acc.fetched += i64::from(stats.articles_fetched);
        acc.processed += i64::from(stats.articles_processed);
        acc.errors += i64::from(stats.fetch_errors);
        acc.cost += stats.processing_cost;
        acc.days += 1;
        if let Some(score) = stats.avg_relevance_score {
            acc.relevance_sum += score;
            acc.relevance_n += 1;
        }
    }

    let mut performance: Vec<SourcePerformance> = by_source
        .into_iter()
        .map(|(source_id, acc)| SourcePerformance {
            source_id,
            name: acc.name,
            tier: acc.tier,
            articles_fetched: acc.fetched,
            articles_processed: acc.processed,
            fetch_errors: acc.errors,
            total_cost: acc.cost,
            avg_relevance: (acc.relevance_n > 0)
                .then(|| acc.relevance_sum / f64::from(acc.relevance_n)),
            success_rate: (acc.fetched > 0)
                .then(|| acc.processed as f64 / acc.fetched as f64 * 100.0),
            days_reported: acc.days,
        })
        .collect();

    // Busiest sources first; ties keep id order
    performance.sort_by(|a, b| b.articles_processed.cmp(&a.articles_processed));
    performance
}

/// Mean sampled success ratio, as a percentage
pub fn uptime(samples: &[SystemMetric]) -> Option<f64> {
    mean(samples.iter().filter_map(|s| s.success_rate)).map(|ratio| ratio * 100.0)
}

pub fn avg_processing_time(samples: &[SystemMetric]) -> Option<f64> {
    mean(samples.iter().filter_map(|s| s.avg_processing_time_ms))
}

/// Most recent snapshot in the window
pub fn latest_snapshot(samples: &[SystemMetric]) -> Option<SystemMetric> {
    samples.iter().max_by_key(|s| s.recorded_at).cloned()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}
