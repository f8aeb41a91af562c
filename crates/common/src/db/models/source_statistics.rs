//! Daily per-source rollup

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "source_statistics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub source_id: Uuid,

    pub date: Date,

    pub articles_fetched: i32,

    pub articles_processed: i32,

    pub avg_relevance_score: Option<f64>,

    pub processing_cost: f64,

    pub fetch_errors: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::news_source::Entity",
        from = "Column::SourceId",
        to = "super::news_source::Column::Id"
    )]
    Source,
}

impl Related<super::news_source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
