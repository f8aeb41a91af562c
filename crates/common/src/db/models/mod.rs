//! SeaORM entity models
//!
//! Tables written by the ingestion, analysis and report pipelines.
//! `dashboard_settings` is the only table this service writes.

mod alert;
mod article;
mod cost_record;
mod news_source;
mod report;
mod report_article;
mod setting;
mod source_statistics;
mod system_metric;

pub use article::{
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
};

pub use news_source::{
    Entity as NewsSourceEntity,
    Model as NewsSource,
    ActiveModel as NewsSourceActiveModel,
    Column as NewsSourceColumn,
};

pub use report::{
    Entity as ReportEntity,
    Model as Report,
    ActiveModel as ReportActiveModel,
    Column as ReportColumn,
};

pub use report_article::{
    Entity as ReportArticleEntity,
    Model as ReportArticle,
    ActiveModel as ReportArticleActiveModel,
    Column as ReportArticleColumn,
};

pub use source_statistics::{
    Entity as SourceStatisticsEntity,
    Model as SourceStatistics,
    ActiveModel as SourceStatisticsActiveModel,
    Column as SourceStatisticsColumn,
};

pub use cost_record::{
    Entity as CostRecordEntity,
    Model as CostRecord,
    ActiveModel as CostRecordActiveModel,
    Column as CostRecordColumn,
};

pub use system_metric::{
    Entity as SystemMetricEntity,
    Model as SystemMetric,
    ActiveModel as SystemMetricActiveModel,
    Column as SystemMetricColumn,
};

pub use alert::{
    Entity as AlertEntity,
    Model as Alert,
    ActiveModel as AlertActiveModel,
    Column as AlertColumn,
};

pub use setting::{
    Entity as SettingEntity,
    Model as Setting,
    ActiveModel as SettingActiveModel,
    Column as SettingColumn,
};
