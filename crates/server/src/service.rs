use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use model::{Customer, CustomerInput, CustomerPatch, ValidationErrors};
use persistence::{CustomerFilter, CustomerRepository, Page, Pagination, PersistenceError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Application service for customers.
/// Applies model validation before anything reaches the repository; knows nothing about DTOs or rows.
pub struct CustomerService<R: CustomerRepository> {
    repo: Arc<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, input), fields(mail = %input.mail))]
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        input.validate()?;
        let created = self.repo.create(input.normalize()).await?;
        info!(id = %created.id, "customer created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Customer, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    #[instrument(skip(self, patch), fields(version = ?patch.version))]
    pub async fn update(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, ServiceError> {
        patch.validate()?;
        let updated = self.repo.update(id, patch.normalize()).await?;
        info!(id = %updated.id, version = updated.version, "customer updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        info!(id = %id, "customer deleted");
        Ok(())
    }

    pub async fn list(&self, filter: CustomerFilter, pagination: Pagination) -> Result<Page<Customer>, ServiceError> {
        let page = self.repo.list(filter, pagination).await?;
        info!(count = page.items.len(), page = page.page, total = page.total_items, "list customers");
        Ok(page)
    }
}
