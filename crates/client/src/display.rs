//! Row models for rendering article lists

use chrono::{DateTime, Utc};
use newsdesk_common::{
    api::ArticleView,
    format::{format_percent, format_relative_time, score_color, sentiment_label, tier_label, truncate, ScoreColor, Sentiment},
};
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 120;
pub const SUMMARY_MAX_CHARS: usize = 240;

/// Display-ready article fields
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub url: String,
    pub source_name: String,
    pub tier_label: &'static str,
    pub published: String,
    pub relevance: Option<String>,
    pub relevance_color: ScoreColor,
    pub sentiment: Sentiment,
    pub categories: Vec<String>,
}

impl ArticleRow {
    pub fn new(article: &ArticleView, now: DateTime<Utc>) -> Self {
        let (source_name, tier) = match &article.source {
            Some(source) => (source.name.clone(), tier_label(source.tier)),
            None => ("Unknown source".to_string(), tier_label(0)),
        };

        Self {
            id: article.id,
            title: truncate(&article.title, TITLE_MAX_CHARS),
            summary: article
                .summary
                .as_deref()
                .map(|s| truncate(s, SUMMARY_MAX_CHARS)),
            url: article.url.clone(),
            source_name,
            tier_label: tier,
            published: format_relative_time(&article.display_time(), now),
            relevance: article.relevance_score.map(|s| format_percent(s * 100.0)),
            relevance_color: score_color(article.relevance_score),
            sentiment: sentiment_label(article.sentiment_score),
            categories: article.categories.clone(),
        }
    }
}

/// Rows for a whole list, all relative to the same instant
pub fn rows(articles: &[ArticleView], now: DateTime<Utc>) -> Vec<ArticleRow> {
    articles.iter().map(|a| ArticleRow::new(a, now)).collect()
}
