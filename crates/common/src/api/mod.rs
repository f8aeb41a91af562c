//! Request and response bodies of the dashboard HTTP API
//!
//! Shared by the gateway (serializing) and the client (deserializing).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{Alert, Article, NewsSource, Report};
use crate::health::SourceHealth;
use crate::query::Pagination;

/// Source fields embedded in article payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub tier: i32,
    pub category: Option<String>,
}

impl From<NewsSource> for SourceSummary {
    fn from(source: NewsSource) -> Self {
        Self {
            id: source.id,
            name: source.name,
            url: source.url,
            tier: source.tier,
            category: source.category,
        }
    }
}

/// Article as served to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleView {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub relevance_score: Option<f64>,
    pub sentiment_score: Option<f64>,
    pub quality_score: Option<f64>,
    pub urgency_score: Option<f64>,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub topics: Vec<String>,
    pub view_count: i32,
    pub share_count: i32,
    pub analysis_model: Option<String>,
    pub analysis_cost: Option<f64>,
    pub analyzed_at: Option<DateTime<FixedOffset>>,
    pub source: Option<SourceSummary>,
}

impl ArticleView {
    pub fn from_parts(article: Article, source: Option<NewsSource>) -> Self {
        let categories = article.category_list();
        let keywords = article.keyword_list();
        let topics = article.topic_list();

        Self {
            id: article.id,
            title: article.title,
            url: article.url,
            content: article.content,
            summary: article.summary,
            published_at: article.published_at,
            created_at: article.created_at,
            relevance_score: article.relevance_score,
            sentiment_score: article.sentiment_score,
            quality_score: article.quality_score,
            urgency_score: article.urgency_score,
            categories,
            keywords,
            topics,
            view_count: article.view_count,
            share_count: article.share_count,
            analysis_model: article.analysis_model,
            analysis_cost: article.analysis_cost,
            analyzed_at: article.analyzed_at,
            source: source.map(SourceSummary::from),
        }
    }

    /// Publication time, falling back to ingestion time
    pub fn display_time(&self) -> DateTime<FixedOffset> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// `GET /api/articles`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleView>,
    pub pagination: Pagination,
}

/// Search mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Text,
    /// Embedding similarity. Not backed by an index yet; served by the text path.
    Semantic,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Text => "text",
            SearchType::Semantic => "semantic",
        }
    }
}

fn default_search_limit() -> u64 { 20 }

/// `POST /api/articles/search`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 500))]
    pub query: String,

    #[serde(default)]
    pub search_type: SearchType,

    #[serde(default = "default_search_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub data: Vec<ArticleView>,
    pub search_type: SearchType,
    pub query: String,
    pub count: usize,
}

/// `GET /api/reports`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
    pub has_more: bool,
    pub pagination: Pagination,
}

/// Article placement inside a report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArticleView {
    pub article: ArticleView,
    pub section: Option<String>,
    pub importance_score: Option<f64>,
}

/// `GET /api/reports/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetailResponse {
    pub report: Report,
    pub articles: Vec<ReportArticleView>,
}

/// Source with its derived health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceView {
    pub source: NewsSource,
    pub health: SourceHealth,
    pub tier_label: String,
}

/// `GET /api/sources`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceListResponse {
    pub sources: Vec<SourceView>,
    pub count: usize,
}

/// `GET /api/alerts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
}
