use serde::Serialize;

use crate::accounts::repo_types::PublicAccount;

pub const REGISTERED_MESSAGE: &str = "Successfully registered";

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub data: PublicAccount,
    pub token: String,
}
