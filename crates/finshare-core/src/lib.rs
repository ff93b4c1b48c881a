//! FINSHARE Core — domain models, repository traits, and error types
//! shared across all crates.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{FinshareError, FinshareResult};
