//! Schema migrations and the ledger of applied steps.
//!
//! `run` is called once at startup, before any repository exists. Any failure is
//! fatal: the caller must abort instead of serving on a half-migrated schema.

use chrono::{DateTime, Utc};
use migration::{seaql_migrations, Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::{error, info};

use crate::errors::PersistenceError;

/// One applied step as recorded in the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub step_id: String,
    pub applied_at: DateTime<Utc>,
}

/// Apply every pending step in registration order. Already recorded steps are skipped.
pub async fn run(db: &DatabaseConnection) -> Result<(), PersistenceError> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    if pending.is_empty() {
        info!("schema up to date");
        return Ok(());
    }
    let steps: Vec<String> = pending.iter().map(|m| m.name().to_string()).collect();
    info!(count = steps.len(), steps = ?steps, "applying pending migrations");

    Migrator::up(db, None).await.map_err(|e| {
        error!(error = %e, "migration failed");
        PersistenceError::Migration(e.to_string())
    })?;
    info!(count = steps.len(), "migrations applied");
    Ok(())
}

/// Applied steps, oldest first.
pub async fn ledger(db: &DatabaseConnection) -> Result<Vec<LedgerEntry>, PersistenceError> {
    let rows = seaql_migrations::Entity::find()
        .order_by_asc(seaql_migrations::Column::Version)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| LedgerEntry {
            step_id: r.version,
            applied_at: DateTime::<Utc>::from_timestamp(r.applied_at, 0).unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configs::DatabaseConfig;
    use sea_orm::{ConnectionTrait, Statement};

    async fn table_names(db: &DatabaseConnection) -> Result<Vec<String>, anyhow::Error> {
        let rows = db
            .query_all(Statement::from_string(
                db.get_database_backend(),
                "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') ORDER BY name",
            ))
            .await?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row.try_get::<String>("", "name")?);
        }
        Ok(names)
    }

    #[tokio::test]
    async fn applying_twice_is_a_no_op() -> Result<(), anyhow::Error> {
        let db = crate::db::connect(&DatabaseConfig::in_memory()).await?;

        run(&db).await?;
        let first_ledger = ledger(&db).await?;
        let first_schema = table_names(&db).await?;

        run(&db).await?;
        let second_ledger = ledger(&db).await?;
        let second_schema = table_names(&db).await?;

        assert_eq!(first_ledger, second_ledger);
        assert_eq!(first_schema, second_schema);
        assert!(first_schema.iter().any(|n| n == "customer"));
        assert!(first_schema.iter().any(|n| n == "uniq_customer_mail"));
        Ok(())
    }

    #[tokio::test]
    async fn ledger_lists_steps_in_order() -> Result<(), anyhow::Error> {
        let db = crate::db::connect(&DatabaseConfig::in_memory()).await?;
        run(&db).await?;
        let steps: Vec<String> = ledger(&db).await?.into_iter().map(|e| e.step_id).collect();
        assert_eq!(
            steps,
            vec![
                "m20240601_000001_create_customer".to_string(),
                "m20240601_000002_add_customer_indexes".to_string(),
            ]
        );
        assert!(Migrator::get_pending_migrations(&db).await?.is_empty());
        Ok(())
    }
}
