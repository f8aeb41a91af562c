//! Generated report entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// daily, weekly or monthly
    #[sea_orm(column_type = "Text")]
    pub report_type: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,

    pub generated_at: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text", nullable)]
    pub model_used: Option<String>,

    pub generation_cost: Option<f64>,

    pub generation_time_ms: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub delivery_status: String,

    pub article_count: i32,

    pub avg_relevance_score: Option<f64>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report_article::Entity", on_delete = "Cascade")]
    ReportArticles,
}

impl Related<super::report_article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportArticles.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        super::report_article::Relation::Article.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::report_article::Relation::Report.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
