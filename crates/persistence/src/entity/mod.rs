//! SeaORM table definitions. Private to the persistence layer; the rest of the
//! workspace only sees `model` types.

pub mod customer;
