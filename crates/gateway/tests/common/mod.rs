// Shared fixtures for the HTTP tests.
//
// Each test gets its own in-memory SQLite database with the full schema,
// wrapped in the same router the binary serves.

#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use newsdesk_common::{
    config::AppConfig,
    db::{models::*, schema, DbPool, Repository},
};
use newsdesk_gateway::{create_router, AppState};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, IntoActiveModel,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_test::assert_ok;
use tower::ServiceExt as _;
use uuid::Uuid;

const BODY_LIMIT: usize = 1024 * 1024;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    /// Router over a fresh database with all tables created
    pub async fn new() -> Self {
        let app = Self::without_schema().await;
        schema::create_tables(&app.db).await.expect("create tables");
        app
    }

    /// Router over an empty database, for backend-failure paths
    pub async fn without_schema() -> Self {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.expect("connect sqlite");

        let state = AppState {
            config: Arc::new(AppConfig::default()),
            repo: Repository::new(DbPool::from_connection(db.clone())),
            metrics: None,
        };

        Self {
            router: create_router(state),
            db,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("build GET");
        self.send(req).await
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        self.with_body("POST", uri, payload).await
    }

    pub async fn put_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        self.with_body("PUT", uri, payload).await
    }

    async fn with_body(&self, method: &str, uri: &str, payload: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = assert_ok!(self.router.clone().oneshot(req).await);
        let status = resp.status();
        let bytes = assert_ok!(body::to_bytes(resp.into_body(), BODY_LIMIT).await);
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    pub async fn source(&self, name: &str, tier: i32) -> NewsSource {
        let now = Utc::now().fixed_offset();
        NewsSource {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: format!("https://{}.example.com/feed", name.to_lowercase()),
            tier,
            category: Some("tech".into()),
            is_active: true,
            fetch_interval_minutes: 30,
            consecutive_failures: 0,
            total_failures: 0,
            last_fetched_at: Some(now),
            last_success_at: Some(now),
            created_at: now,
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert source")
    }

    pub async fn article(&self, seed: ArticleSeed<'_>) -> Article {
        let now = Utc::now();
        let published = seed.published_at.unwrap_or(now);
        Article {
            id: Uuid::new_v4(),
            title: seed.title.to_string(),
            url: format!("https://news.example.com/{}", Uuid::new_v4()),
            content: seed.content.map(str::to_string),
            summary: Some(format!("Summary of {}", seed.title)),
            source_id: seed.source.map(|s| s.id),
            published_at: Some(published.fixed_offset()),
            created_at: published.fixed_offset(),
            relevance_score: seed.relevance,
            sentiment_score: Some(0.2),
            quality_score: Some(0.8),
            urgency_score: None,
            categories: json!(seed.categories),
            keywords: json!([]),
            topics: json!([]),
            view_count: 0,
            share_count: 0,
            processed: seed.processed,
            analysis_model: Some("claude-haiku".into()),
            analysis_cost: Some(0.002),
            analyzed_at: Some(now.fixed_offset()),
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert article")
    }

    pub async fn report(&self, title: &str, generated_at: DateTime<Utc>) -> Report {
        Report {
            id: Uuid::new_v4(),
            report_type: "daily".into(),
            title: title.to_string(),
            summary: Some("Top stories".into()),
            generated_at: generated_at.fixed_offset(),
            model_used: Some("claude-sonnet".into()),
            generation_cost: Some(0.12),
            generation_time_ms: Some(4200),
            delivery_status: "sent".into(),
            article_count: 0,
            avg_relevance_score: None,
            created_at: generated_at.fixed_offset(),
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert report")
    }

    pub async fn place(&self, report: &Report, article: &Article, importance: f64) {
        ReportArticle {
            report_id: report.id,
            article_id: article.id,
            section: Some("headlines".into()),
            importance_score: Some(importance),
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert report article");
    }

    pub async fn cost(&self, operation: &str, amount: f64, at: DateTime<Utc>) {
        CostRecord {
            id: Uuid::new_v4(),
            operation_type: operation.to_string(),
            provider: "anthropic".into(),
            model: Some("claude-haiku".into()),
            tokens_used: Some(1200),
            cost: amount,
            article_id: None,
            created_at: at.fixed_offset(),
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert cost record");
    }

    pub async fn system_metric(&self, success_rate: f64, at: DateTime<Utc>) {
        SystemMetric {
            id: Uuid::new_v4(),
            recorded_at: at.fixed_offset(),
            articles_processed: 10,
            avg_processing_time_ms: Some(250.0),
            success_rate: Some(success_rate),
            active_sources: 4,
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert system metric");
    }

    pub async fn source_stats(&self, source: &NewsSource, days_ago: i64, fetched: i32, processed: i32) {
        SourceStatistics {
            id: Uuid::new_v4(),
            source_id: source.id,
            date: (Utc::now() - Duration::days(days_ago)).date_naive(),
            articles_fetched: fetched,
            articles_processed: processed,
            avg_relevance_score: Some(0.6),
            processing_cost: 0.05,
            fetch_errors: 0,
        }
        .into_active_model()
        .reset_all()
        .insert(&self.db)
        .await
        .expect("insert source statistics");
    }
}

/// Article fixture parameters
pub struct ArticleSeed<'a> {
    pub title: &'a str,
    pub content: Option<&'a str>,
    pub source: Option<&'a NewsSource>,
    pub categories: Vec<&'a str>,
    pub relevance: Option<f64>,
    pub published_at: Option<DateTime<Utc>>,
    pub processed: bool,
}

impl<'a> ArticleSeed<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            content: None,
            source: None,
            categories: Vec::new(),
            relevance: Some(0.5),
            published_at: None,
            processed: true,
        }
    }

    pub fn by(mut self, source: &'a NewsSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn categories(mut self, categories: &[&'a str]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    pub fn relevance(mut self, score: f64) -> Self {
        self.relevance = Some(score);
        self
    }

    pub fn content(mut self, content: &'a str) -> Self {
        self.content = Some(content);
        self
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn unprocessed(mut self) -> Self {
        self.processed = false;
        self
    }
}
