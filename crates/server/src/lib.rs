pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod startup;
pub mod state;

pub use startup::{app, run};
pub use state::AppState;
