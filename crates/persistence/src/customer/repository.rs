use async_trait::async_trait;
use uuid::Uuid;

use model::{Customer, CustomerInput, CustomerPatch};

use crate::errors::PersistenceError;
use crate::pagination::{Page, Pagination};

/// Listing filter. Empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Case-insensitive substring match on `mail`. Wildcard characters match literally.
    pub mail_contains: Option<String>,
}

/// Repository abstraction for customer persistence.
///
/// Every operation is atomic: concurrent callers never observe a partial write.
/// Inputs are expected to be validated and normalized already.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert with a generated id and version 1. A taken mail yields `DuplicateKey`.
    async fn create(&self, input: CustomerInput) -> Result<Customer, PersistenceError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Customer, PersistenceError>;

    /// Apply `patch` and bump the version. When `patch.version` is set and no longer
    /// matches the stored version the write is rejected with `Conflict`.
    async fn update(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, PersistenceError>;

    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError>;

    /// Ordered by `(created_at, id)` so consecutive pages never overlap.
    async fn list(&self, filter: CustomerFilter, pagination: Pagination) -> Result<Page<Customer>, PersistenceError>;
}
