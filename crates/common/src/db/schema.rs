//! Table creation from the entity definitions
//!
//! Production tables are owned by the pipeline's migrations. This is for
//! local development and for tests running against SQLite.

use crate::db::models::*;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, EntityTrait, Schema};
use tracing::debug;

/// Create every table the dashboard reads, skipping ones that already exist
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table(db, NewsSourceEntity).await?;
    create_table(db, ArticleEntity).await?;
    create_table(db, ReportEntity).await?;
    create_table(db, ReportArticleEntity).await?;
    create_table(db, SourceStatisticsEntity).await?;
    create_table(db, CostRecordEntity).await?;
    create_table(db, SystemMetricEntity).await?;
    create_table(db, AlertEntity).await?;
    create_table(db, SettingEntity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let table = entity.table_name().to_string();

    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    debug!(table = %table, "Ensured table exists");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database, PaginatorTrait};

    #[tokio::test]
    async fn test_create_tables_is_idempotent() {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1);
        let db = Database::connect(opts).await.unwrap();

        create_tables(&db).await.unwrap();
        create_tables(&db).await.unwrap();

        assert_eq!(ArticleEntity::find().count(&db).await.unwrap(), 0);
        assert_eq!(SettingEntity::find().count(&db).await.unwrap(), 0);
    }
}
