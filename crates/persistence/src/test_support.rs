#![cfg(test)]
use configs::DatabaseConfig;

use crate::customer::SeaOrmCustomerRepository;
use crate::storage::Storage;

/// Fresh, migrated in-memory database per test.
pub async fn get_repo() -> Result<SeaOrmCustomerRepository, anyhow::Error> {
    let storage = Storage::open(&DatabaseConfig::in_memory()).await?;
    Ok(storage.customers())
}
