//! News source entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news_sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    /// Editorial trust ranking, 1 (premium) to 3 (broad coverage)
    pub tier: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub category: Option<String>,

    pub is_active: bool,

    pub fetch_interval_minutes: i32,

    pub consecutive_failures: i32,

    pub total_failures: i32,

    pub last_fetched_at: Option<DateTimeWithTimeZone>,

    pub last_success_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article::Entity")]
    Articles,

    #[sea_orm(has_many = "super::source_statistics::Entity")]
    Statistics,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl Related<super::source_statistics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statistics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
