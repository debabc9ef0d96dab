//! Persistence layer for customers.
//! - Owns the connection pool and the only mapping between domain values and table rows.
//! - Applies pending migrations before handing out a usable `Storage`.
//! - Surfaces typed `PersistenceError`s; callers never see `DbErr`.

pub mod customer;
pub mod db;
pub mod entity;
pub mod errors;
pub mod migrate;
pub mod pagination;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use customer::{CustomerFilter, CustomerRepository, SeaOrmCustomerRepository};
pub use errors::PersistenceError;
pub use migrate::LedgerEntry;
pub use pagination::{Page, Pagination};
pub use storage::Storage;
