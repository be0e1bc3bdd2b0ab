use serde::{Deserialize, Serialize};

/// JWT claims carried by a bearer token.
///
/// The `role` claim is informational only. Authorization decisions are always
/// re-derived from the persisted user record, since a token may outlive a role
/// change or the account itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username
    pub sub: String,
    /// Role at issuance time (convenience claim, never authoritative)
    pub role: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}
