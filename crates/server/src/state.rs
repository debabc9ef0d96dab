use std::sync::Arc;

use persistence::{SeaOrmCustomerRepository, Storage};

use crate::service::CustomerService;

/// Everything handlers need, wired explicitly at startup.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService<SeaOrmCustomerRepository>>,
    pub storage: Storage,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        let repo = Arc::new(storage.customers());
        Self { customers: Arc::new(CustomerService::new(repo)), storage }
    }
}
