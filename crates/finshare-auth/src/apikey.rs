//! API-key generation and one-way hash derivation.
//!
//! An API key is the bearer credential for a consent. The raw key is
//! shown to the caller exactly once at issuance; only its SHA-256
//! digest is ever stored, so a storage compromise does not expose
//! usable secrets. A single digest scheme is sufficient — keys are
//! high-entropy random values, not human-chosen passwords.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Generate a cryptographically random opaque API key
/// (32 bytes → base64url-encoded, no padding).
pub fn generate_api_key() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hash of a raw API key, hex-encoded.
///
/// This is the value stored in the database as
/// `consent.credential_hash`, and the value looked up at verification
/// time. There is no reverse function.
pub fn hash_api_key(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
