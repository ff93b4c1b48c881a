//! Domain models for FINSHARE.
//!
//! These are the core types shared across all crates. Wire-format
//! strings (statuses, permissions) follow the Open Finance sandbox
//! convention of SCREAMING_SNAKE_CASE.

pub mod account;
pub mod consent;
pub mod customer;
pub mod transaction;
