//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling. Every article read is gated on
//! `processed = true`.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::Result;
use crate::query::ArticleQuery;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Article joined with its (optional) source
pub type ArticleWithSource = (Article, Option<NewsSource>);

/// A report with the articles placed in it, most important first
#[derive(Debug, Clone)]
pub struct ReportWithArticles {
    pub report: Report,
    pub entries: Vec<(ReportArticle, ArticleWithSource)>,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    fn backend(&self) -> DbBackend {
        self.read_conn().get_database_backend()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// List processed articles matching `query`, newest first.
    ///
    /// Returns the requested page together with the total match count.
    pub async fn list_articles(
        &self,
        query: &ArticleQuery,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ArticleWithSource>, u64)> {
        let mut select = ArticleEntity::find()
            .find_also_related(NewsSourceEntity)
            .filter(ArticleColumn::Processed.eq(true));

        let categories = query.categories();
        if !categories.is_empty() {
            let backend = self.backend();
            let any_category = categories
                .iter()
                .fold(Condition::any(), |cond, category| {
                    cond.add(category_contains(backend, category))
                });
            select = select.filter(any_category);
        }

        if let Some(source) = query.source.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(NewsSourceColumn::Name.eq(source));
        }

        if let Some(tier) = query.source_tier {
            select = select.filter(NewsSourceColumn::Tier.eq(tier));
        }

        if let Some(min) = query.min_relevance {
            select = select.filter(ArticleColumn::RelevanceScore.gte(min));
        }

        if let Some(start) = query.start_date {
            select = select.filter(ArticleColumn::PublishedAt.gte(start.fixed_offset()));
        }

        if let Some(end) = query.end_date {
            select = select.filter(ArticleColumn::PublishedAt.lte(end.fixed_offset()));
        }

        let paginator = select
            .order_by_desc(ArticleColumn::PublishedAt)
            .order_by_desc(ArticleColumn::CreatedAt)
            .order_by_asc(ArticleColumn::Id)
            .paginate(self.read_conn(), limit);

        let total = paginator.num_items().await?;
        let articles = paginator.fetch_page(page).await?;

        Ok((articles, total))
    }

    /// Find a processed article by ID, with its source
    pub async fn find_article(&self, id: Uuid) -> Result<Option<ArticleWithSource>> {
        ArticleEntity::find_by_id(id)
            .find_also_related(NewsSourceEntity)
            .filter(ArticleColumn::Processed.eq(true))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Case-insensitive substring search over title, content and summary
    pub async fn search_articles(&self, text: &str, limit: u64) -> Result<Vec<ArticleWithSource>> {
        let pattern = format!("%{}%", escape_like(&text.to_lowercase()));

        let matches = Condition::any()
            .add(lower_like(ArticleColumn::Title, &pattern))
            .add(lower_like(ArticleColumn::Content, &pattern))
            .add(lower_like(ArticleColumn::Summary, &pattern));

        ArticleEntity::find()
            .find_also_related(NewsSourceEntity)
            .filter(ArticleColumn::Processed.eq(true))
            .filter(matches)
            .order_by_desc(ArticleColumn::RelevanceScore)
            .order_by_desc(ArticleColumn::PublishedAt)
            .order_by_asc(ArticleColumn::Id)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Processed articles ingested in the window, counted per UTC day
    pub async fn daily_processed_counts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(NaiveDate, u64)>> {
        let day = utc_day(self.backend());

        let rows: Vec<(String, i64)> = ArticleEntity::find()
            .select_only()
            .column_as(day.clone(), "day")
            .column_as(ArticleColumn::Id.count(), "articles")
            .filter(ArticleColumn::Processed.eq(true))
            .filter(ArticleColumn::CreatedAt.between(start.fixed_offset(), end.fixed_offset()))
            .group_by(day)
            .into_tuple()
            .all(self.read_conn())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(day, n)| match day.parse::<NaiveDate>() {
                Ok(date) => Some((date, n.max(0) as u64)),
                Err(e) => {
                    tracing::warn!(day = %day, error = %e, "Skipping unparseable day bucket");
                    None
                }
            })
            .collect())
    }

    // ========================================================================
    // Report Operations
    // ========================================================================

    /// List reports, newest first
    pub async fn list_reports(
        &self,
        report_type: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Report>, u64)> {
        let mut select = ReportEntity::find();
        if let Some(report_type) = report_type {
            select = select.filter(ReportColumn::ReportType.eq(report_type));
        }

        let paginator = select
            .order_by_desc(ReportColumn::GeneratedAt)
            .order_by_asc(ReportColumn::Id)
            .paginate(self.read_conn(), limit);

        let total = paginator.num_items().await?;
        let reports = paginator.fetch_page(page).await?;

        Ok((reports, total))
    }

    /// Find a report together with the articles placed in it
    pub async fn find_report_with_articles(&self, id: Uuid) -> Result<Option<ReportWithArticles>> {
        let Some(report) = ReportEntity::find_by_id(id).one(self.read_conn()).await? else {
            return Ok(None);
        };

        let placements = ReportArticleEntity::find()
            .find_also_related(ArticleEntity)
            .filter(ReportArticleColumn::ReportId.eq(id))
            .order_by_desc(ReportArticleColumn::ImportanceScore)
            .order_by_asc(ReportArticleColumn::ArticleId)
            .all(self.read_conn())
            .await?;

        let source_ids: Vec<Uuid> = placements
            .iter()
            .filter_map(|(_, article)| article.as_ref().and_then(|a| a.source_id))
            .collect();

        let sources: HashMap<Uuid, NewsSource> = if source_ids.is_empty() {
            HashMap::new()
        } else {
            NewsSourceEntity::find()
                .filter(NewsSourceColumn::Id.is_in(source_ids))
                .all(self.read_conn())
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        // Placements whose article was deleted or is not yet processed are skipped
        let entries = placements
            .into_iter()
            .filter_map(|(placement, article)| {
                let article = article.filter(|a| a.processed)?;
                let source = article.source_id.and_then(|sid| sources.get(&sid).cloned());
                Some((placement, (article, source)))
            })
            .collect();

        Ok(Some(ReportWithArticles { report, entries }))
    }

    /// Number of reports generated in the window
    pub async fn count_reports(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u64> {
        ReportEntity::find()
            .filter(ReportColumn::GeneratedAt.between(start.fixed_offset(), end.fixed_offset()))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Analytics Source Queries
    // ========================================================================

    pub async fn system_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SystemMetric>> {
        SystemMetricEntity::find()
            .filter(SystemMetricColumn::RecordedAt.between(start.fixed_offset(), end.fixed_offset()))
            .order_by_asc(SystemMetricColumn::RecordedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn cost_records(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CostRecord>> {
        CostRecordEntity::find()
            .filter(CostRecordColumn::CreatedAt.between(start.fixed_offset(), end.fixed_offset()))
            .order_by_asc(CostRecordColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Daily source rollups between two dates (inclusive), with source rows
    pub async fn source_statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(SourceStatistics, Option<NewsSource>)>> {
        SourceStatisticsEntity::find()
            .find_also_related(NewsSourceEntity)
            .filter(SourceStatisticsColumn::Date.between(start, end))
            .order_by_asc(SourceStatisticsColumn::Date)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Source & Alert Operations
    // ========================================================================

    pub async fn list_sources(&self, active: Option<bool>, tier: Option<i32>) -> Result<Vec<NewsSource>> {
        let mut select = NewsSourceEntity::find();
        if let Some(active) = active {
            select = select.filter(NewsSourceColumn::IsActive.eq(active));
        }
        if let Some(tier) = tier {
            select = select.filter(NewsSourceColumn::Tier.eq(tier));
        }

        select
            .order_by_asc(NewsSourceColumn::Tier)
            .order_by_asc(NewsSourceColumn::Name)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn list_alerts(&self, acknowledged: Option<bool>, limit: u64) -> Result<Vec<Alert>> {
        let mut select = AlertEntity::find();
        if let Some(acknowledged) = acknowledged {
            select = select.filter(AlertColumn::Acknowledged.eq(acknowledged));
        }

        select
            .order_by_desc(AlertColumn::CreatedAt)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Settings Operations
    // ========================================================================

    pub async fn load_settings(&self) -> Result<Vec<Setting>> {
        SettingEntity::find()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Insert or replace one settings section
    pub async fn upsert_setting(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let row = SettingActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(Utc::now().fixed_offset()),
        };

        SettingEntity::insert(row)
            .on_conflict(
                OnConflict::column(SettingColumn::Key)
                    .update_columns([SettingColumn::Value, SettingColumn::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.write_conn())
            .await?;

        Ok(())
    }
}

/// `YYYY-MM-DD` of `created_at` in UTC, as text on every backend
fn utc_day(backend: DbBackend) -> SimpleExpr {
    match backend {
        DbBackend::Postgres => {
            Expr::cust("to_char(\"created_at\" AT TIME ZONE 'UTC', 'YYYY-MM-DD')")
        }
        DbBackend::MySql => Expr::cust("DATE_FORMAT(`created_at`, '%Y-%m-%d')"),
        // date() normalizes the stored offset to UTC
        DbBackend::Sqlite => Expr::cust("date(\"created_at\")"),
    }
}

/// JSON-array containment of one category, per backend
fn category_contains(backend: DbBackend, category: &str) -> SimpleExpr {
    match backend {
        DbBackend::Postgres => Expr::cust_with_values(
            "articles.categories @> CAST(? AS jsonb)",
            [serde_json::json!([category]).to_string()],
        ),
        DbBackend::Sqlite => Expr::cust_with_values(
            "EXISTS (SELECT 1 FROM json_each(articles.categories) WHERE json_each.value = ?)",
            [category.to_string()],
        ),
        DbBackend::MySql => Expr::cust_with_values(
            "JSON_CONTAINS(articles.categories, ?)",
            [serde_json::json!(category).to_string()],
        ),
    }
}

fn lower_like(column: ArticleColumn, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((ArticleEntity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Escape LIKE wildcards so user text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
