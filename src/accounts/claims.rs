use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload minted for a freshly registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,    // account ID
    pub role: String, // role tag as stored
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}
