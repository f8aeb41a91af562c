//! Article entity
//!
//! Rows are written by the ingestion and analysis pipeline. This service only
//! reads them, and only rows with `processed = true` are ever surfaced.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,

    pub source_id: Option<Uuid>,

    pub published_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub relevance_score: Option<f64>,

    /// Roughly in [-1, 1]
    pub sentiment_score: Option<f64>,

    pub quality_score: Option<f64>,

    pub urgency_score: Option<f64>,

    /// JSON array of category names
    #[sea_orm(column_type = "JsonBinary")]
    pub categories: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub keywords: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub topics: Json,

    pub view_count: i32,

    pub share_count: i32,

    pub processed: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub analysis_model: Option<String>,

    pub analysis_cost: Option<f64>,

    pub analyzed_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Category names, ignoring any non-string entries
    pub fn category_list(&self) -> Vec<String> {
        string_list(&self.categories)
    }

    pub fn keyword_list(&self) -> Vec<String> {
        string_list(&self.keywords)
    }

    pub fn topic_list(&self) -> Vec<String> {
        string_list(&self.topics)
    }
}

fn string_list(value: &Json) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::news_source::Entity",
        from = "Column::SourceId",
        to = "super::news_source::Column::Id"
    )]
    Source,

    #[sea_orm(has_many = "super::report_article::Entity")]
    ReportArticles,
}

impl Related<super::news_source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl Related<super::report_article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportArticles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
