//! Declarative checks for the registration payload.
//!
//! Rules run in a fixed key order and the first failure is reported, so a
//! client always sees one actionable message at a time.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::accounts::repo_types::{Cookstyle, Role, USER_ROLE};

const KNOWN_KEYS: [&str; 4] = ["username", "password", "role", "cookstyle"];

/// Human readable reason a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// A payload that passed every rule.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

// Keep the plaintext password out of logs and panic messages.
impl std::fmt::Debug for ValidRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

pub fn validate_registration(payload: &Value) -> Result<ValidRegistration, ValidationError> {
    let body = payload
        .as_object()
        .ok_or_else(|| ValidationError(r#""value" must be of type object"#.into()))?;

    let username = required_string(body, "username")?;
    let password = required_string(body, "password")?;
    let role = required_string(body, "role")?;

    let role = if role == USER_ROLE {
        let cookstyle = required_string(body, "cookstyle")
            .and_then(|raw| raw.parse::<Cookstyle>().map_err(|_| cookstyle_not_allowed()))?;
        Role::User { cookstyle }
    } else {
        // Not checked for other roles, and never stored for them either.
        Role::Other(role.to_owned())
    };

    if let Some(unknown) = body.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        return Err(ValidationError(format!(r#""{unknown}" is not allowed"#)));
    }

    Ok(ValidRegistration {
        username: username.to_owned(),
        password: password.to_owned(),
        role,
    })
}

fn required_string<'a>(body: &'a Map<String, Value>, key: &str) -> Result<&'a str, ValidationError> {
    match body.get(key) {
        None => Err(ValidationError(format!(r#""{key}" is required"#))),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError(format!(
            r#""{key}" is not allowed to be empty"#
        ))),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ValidationError(format!(r#""{key}" must be a string"#))),
    }
}

fn cookstyle_not_allowed() -> ValidationError {
    let allowed = Cookstyle::ALL.map(Cookstyle::as_str).join(", ");
    ValidationError(format!(r#""cookstyle" must be one of [{allowed}]"#))
}
