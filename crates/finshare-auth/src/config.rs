//! Authorization configuration.
//!
//! Explicitly constructed at startup and passed to the services that
//! need it — there is no process-global secret or TTL.

/// Configuration for session tokens, consent issuance, and the
/// issuance callback.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for session JWT signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for session JWT verification.
    pub jwt_public_key_pem: String,
    /// Session token lifetime in seconds (default: 900 = 15 minutes).
    pub session_token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Consent lifetime applied when issuance does not specify one
    /// (default: 31_536_000 = 1 year).
    pub default_consent_ttl_secs: u64,
    /// Hard deadline for the issuance callback to respond
    /// (default: 5 seconds).
    pub callback_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            session_token_lifetime_secs: 900,
            jwt_issuer: "finshare".into(),
            default_consent_ttl_secs: 31_536_000,
            callback_timeout_secs: 5,
        }
    }
}
