use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::accounts::repo_types::{Account, NewAccount};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an account already exists with username {0:?}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for accounts. Usernames are unique at the storage level, so
/// `insert` is the authority on conflicts, not a prior lookup.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, password_hash, role, cookstyle, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let cookstyle = account.role.cookstyle().map(|c| c.as_str());
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, username, password_hash, role, cookstyle)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, role, cookstyle, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(cookstyle)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(account.username.clone())
            }
            other => StoreError::Database(other),
        })
    }
}

/// Process-local store keyed by username. Lookup and insert happen under
/// one lock, so concurrent inserts of the same username cannot both win.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().await.get(username).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&account.username) {
            return Err(StoreError::UniqueViolation(account.username));
        }
        let stored = Account {
            id: account.id,
            username: account.username.clone(),
            password_hash: account.password_hash,
            role: account.role.as_str().to_owned(),
            cookstyle: account.role.cookstyle().map(|c| c.as_str().to_owned()),
            created_at: OffsetDateTime::now_utc(),
        };
        accounts.insert(account.username, stored.clone());
        Ok(stored)
    }
}
