//! Domain shapes for the customer service.
//!
//! Plain values and their validation rules. Nothing in this crate performs I/O;
//! storage and wire representations live in `persistence` and `server`.

pub mod customer;
pub mod validation;

pub use customer::{Customer, CustomerInput, CustomerPatch};
pub use validation::{FieldViolation, ValidationErrors};
