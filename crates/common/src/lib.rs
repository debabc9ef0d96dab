//! Pieces shared by every binary and crate in the workspace: logging setup
//! and small wire types that do not belong to any single layer.

pub mod types;
pub mod utils;
