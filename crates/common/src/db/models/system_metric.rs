//! System health snapshot, sampled by the pipeline on its own cadence

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub recorded_at: DateTimeWithTimeZone,

    pub articles_processed: i32,

    pub avg_processing_time_ms: Option<f64>,

    /// Fraction of successful operations in the sample, 0..1
    pub success_rate: Option<f64>,

    pub active_sources: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
