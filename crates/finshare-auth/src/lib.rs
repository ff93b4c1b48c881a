//! FINSHARE Auth — API-key codec, consent lifecycle, access decision
//! engine, and the request-time resource guard.

pub mod apikey;
pub mod config;
pub mod consent;
pub mod engine;
pub mod error;
pub mod guard;
pub mod notify;
pub mod token;

pub use config::AuthConfig;
pub use consent::{ConsentService, IssueConsentInput, IssueConsentOutput};
pub use engine::{AccessContext, AccessEngine};
pub use error::AuthError;
pub use guard::{Principal, RequestGuard};
