//! SurrealDB repository implementations.

mod account;
mod consent;
mod customer;
mod transaction;

pub use account::SurrealAccountRepository;
pub use consent::SurrealConsentRepository;
pub use customer::SurrealCustomerRepository;
pub use transaction::SurrealTransactionRepository;
