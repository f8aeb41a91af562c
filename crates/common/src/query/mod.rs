//! Article filter shapes and pagination
//!
//! `ArticleFilter` is what a dashboard filter panel edits. `ArticleQuery` is
//! the query-string form both the gateway parses and the client sends.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Query-string parameters for `GET /api/articles`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    /// Zero-based page index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Comma-joined category names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Source display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tier: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_relevance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl ArticleQuery {
    /// Categories from the comma-joined parameter, trimmed, empties dropped
    pub fn categories(&self) -> Vec<String> {
        self.category
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any narrowing filter is present (pagination alone doesn't count)
    pub fn has_filters(&self) -> bool {
        !self.categories().is_empty()
            || self.source.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.source_tier.is_some()
            || self.min_relevance.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }
}

/// Tier selector with an explicit "all" sentinel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierFilter {
    #[default]
    All,
    Tier(i32),
}

/// Date range as chosen in the filter panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    All,
    /// Since midnight UTC of the current day
    Today,
    /// Trailing window ending now
    LastDays(u32),
    Custom {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl DateRange {
    /// Resolve to absolute bounds relative to `now`
    pub fn resolve(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            DateRange::All => (None, None),
            DateRange::Today => {
                let midnight = now
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .map(|naive| naive.and_utc());
                (midnight, Some(now))
            }
            DateRange::LastDays(days) => (Some(now - Duration::days(i64::from(days))), Some(now)),
            DateRange::Custom { start, end } => (start, end),
        }
    }
}

/// Filter state held by the dashboard's filter panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFilter {
    pub categories: Vec<String>,
    pub source: Option<String>,
    pub tier: TierFilter,
    pub min_relevance: Option<f64>,
    pub date_range: DateRange,
}

impl ArticleFilter {
    /// Convert to query parameters.
    ///
    /// Relative date ranges are resolved against `now`, so callers should pass
    /// the time at which the filter change was received.
    pub fn to_query(&self, now: DateTime<Utc>, page: u64, limit: u64) -> ArticleQuery {
        let categories: Vec<&str> = self
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        let (start_date, end_date) = self.date_range.resolve(now);

        ArticleQuery {
            page: Some(page),
            limit: Some(limit),
            category: (!categories.is_empty()).then(|| categories.join(",")),
            source: self
                .source
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            source_tier: match self.tier {
                TierFilter::All => None,
                TierFilter::Tier(tier) => Some(tier),
            },
            min_relevance: self.min_relevance,
            start_date,
            end_date,
        }
    }
}

/// Page metadata returned with every listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub has_more: bool,
}

impl Pagination {
    /// Build page metadata from the exact total.
    ///
    /// `has_more` holds iff rows exist past this page: `page*limit + returned < total`.
    pub fn new(page: u64, limit: u64, total: u64, returned: usize) -> Self {
        let seen = page.saturating_mul(limit).saturating_add(returned as u64);
        Self {
            page,
            limit,
            total,
            has_more: seen < total,
        }
    }

    pub fn empty(page: u64, limit: u64) -> Self {
        Self::new(page, limit, 0, 0)
    }

    /// Page index to request next, if any
    pub fn next_page(&self) -> Option<u64> {
        self.has_more.then_some(self.page + 1)
    }
}

/// Whether the row window of `page` fits a signed 64-bit offset
pub fn page_in_range(page: u64, limit: u64) -> bool {
    page.checked_add(1)
        .and_then(|pages| pages.checked_mul(limit))
        .is_some_and(|end| end <= i64::MAX as u64)
}

/// Clamp a requested page size into `1..=max`, using `default` when absent
pub fn clamp_limit(requested: Option<u64>, default: u64, max: u64) -> u64 {
    requested.unwrap_or(default).clamp(1, max.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_filter_to_query_joins_categories_and_omits_all_tier() {
        let filter = ArticleFilter {
            categories: vec!["ai".into(), " research ".into(), "".into()],
            tier: TierFilter::All,
            ..Default::default()
        };

        let query = filter.to_query(now(), 0, 20);
        assert_eq!(query.category.as_deref(), Some("ai,research"));
        assert_eq!(query.source_tier, None);
        assert_eq!(query.page, Some(0));
        assert_eq!(query.limit, Some(20));
        assert!(query.start_date.is_none());
        assert!(query.end_date.is_none());
    }

    #[test]
    fn test_filter_to_query_resolves_relative_range_at_receipt() {
        let filter = ArticleFilter {
            tier: TierFilter::Tier(1),
            date_range: DateRange::LastDays(7),
            ..Default::default()
        };

        let query = filter.to_query(now(), 2, 10);
        assert_eq!(query.source_tier, Some(1));
        assert_eq!(query.start_date, Some(now() - Duration::days(7)));
        assert_eq!(query.end_date, Some(now()));

        let later = now() + Duration::hours(1);
        let requery = filter.to_query(later, 0, 10);
        assert_eq!(requery.start_date, Some(later - Duration::days(7)));
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let (start, end) = DateRange::Today.resolve(now());
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap()));
        assert_eq!(end, Some(now()));
    }

    #[test]
    fn test_empty_category_list_is_omitted() {
        let query = ArticleFilter::default().to_query(now(), 0, 20);
        assert_eq!(query.category, None);
        assert!(!query.has_filters());
    }

    #[test]
    fn test_query_categories_split() {
        let query = ArticleQuery {
            category: Some("ai, policy,,research".into()),
            ..Default::default()
        };
        assert_eq!(query.categories(), vec!["ai", "policy", "research"]);
        assert!(query.has_filters());
    }

    #[test]
    fn test_has_more_uses_exact_total() {
        // 3 rows total, one page of 20
        assert!(!Pagination::new(0, 20, 3, 3).has_more);
        // full page with more behind it
        assert!(Pagination::new(0, 10, 25, 10).has_more);
        // short last page
        assert!(!Pagination::new(2, 10, 25, 5).has_more);
    }

    #[test]
    fn test_has_more_false_on_last_page_when_total_divides_limit() {
        // A full last page must not advertise another page
        let last = Pagination::new(1, 10, 20, 10);
        assert!(!last.has_more);
        assert_eq!(last.next_page(), None);

        let first = Pagination::new(0, 10, 20, 10);
        assert_eq!(first.next_page(), Some(1));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
    }

    #[test]
    fn test_page_in_range() {
        assert!(page_in_range(0, 20));
        assert!(page_in_range(1_000_000, 100));
        assert!(!page_in_range(u64::MAX, 20));
        assert!(page_in_range(i64::MAX as u64 / 20, 20));
        assert!(!page_in_range(i64::MAX as u64 / 20 + 1, 20));
    }
}
