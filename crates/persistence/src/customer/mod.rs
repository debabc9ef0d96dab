//! Customer repository: the abstraction the API talks to and its SeaORM implementation.

pub mod repository;
pub mod seaorm;

pub use repository::{CustomerFilter, CustomerRepository};
pub use seaorm::SeaOrmCustomerRepository;
