use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// The only role that carries a cooking style.
pub const USER_ROLE: &str = "user";

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: Uuid,                     // assigned before insert, never changes
    pub username: String,             // unique, stored as submitted
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 PHC string, not exposed in JSON
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookstyle: Option<String>,    // set iff role == "user"
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Everything the store needs to persist a fresh account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Cooking styles a `user` account can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cookstyle {
    Indian,
    Chinese,
    Italian,
}

impl Cookstyle {
    pub const ALL: [Cookstyle; 3] = [Cookstyle::Indian, Cookstyle::Chinese, Cookstyle::Italian];

    pub fn as_str(self) -> &'static str {
        match self {
            Cookstyle::Indian => "Indian",
            Cookstyle::Chinese => "Chinese",
            Cookstyle::Italian => "Italian",
        }
    }
}

impl fmt::Display for Cookstyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCookstyle;

impl FromStr for Cookstyle {
    type Err = UnknownCookstyle;

    // Exact match only: "indian" is not a cooking style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cookstyle::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(UnknownCookstyle)
    }
}

/// Role of an account. Only `user` accounts carry a cooking style; every
/// other role is a free-form tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    User { cookstyle: Cookstyle },
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User { .. } => USER_ROLE,
            Role::Other(tag) => tag,
        }
    }

    pub fn cookstyle(&self) -> Option<Cookstyle> {
        match self {
            Role::User { cookstyle } => Some(*cookstyle),
            Role::Other(_) => None,
        }
    }
}

/// Account as returned to clients. There is no password field to leak.
#[derive(Debug, Clone, Serialize)]
pub struct PublicAccount {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookstyle: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            role: a.role,
            cookstyle: a.cookstyle,
            created_at: a.created_at,
        }
    }
}
