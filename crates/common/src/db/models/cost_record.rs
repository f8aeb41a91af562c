//! Billed operation entity (one row per API call)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_tracking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub operation_type: String,

    #[sea_orm(column_type = "Text")]
    pub provider: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub model: Option<String>,

    pub tokens_used: Option<i32>,

    pub cost: f64,

    pub article_id: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
