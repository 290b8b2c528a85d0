use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    accounts::{
        jwt::TokenIssuer,
        password::CredentialHasher,
        repo::{AccountStore, StoreError},
        repo_types::{NewAccount, PublicAccount},
        validation::{validate_registration, ValidRegistration},
    },
    error::RegisterError,
};

/// Outcome of a successful registration.
#[derive(Debug)]
pub struct Registered {
    pub account: PublicAccount,
    pub token: String,
}

/// An account that is ready to be written, with its token already minted.
struct Prepared {
    account: NewAccount,
    token: String,
}

/// Runs the registration workflow against injected collaborators.
///
/// Steps run strictly in order: validate, look up the username, hash the
/// password, mint the token, insert. The insert is the last step that can
/// fail, so a failed request never leaves an account behind, and a storage
/// uniqueness conflict is reported exactly like a lookup hit.
#[derive(Clone)]
pub struct Registrar {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    deadline: Option<Duration>,
}

impl Registrar {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            deadline: None,
        }
    }

    /// Bounds everything before the insert. Expiry fails the request without
    /// writing anything.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    #[instrument(skip_all)]
    pub async fn register(&self, payload: Value) -> Result<Registered, RegisterError> {
        let prepared = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.prepare(&payload))
                .await
                .map_err(|_| {
                    error!(deadline_ms = limit.as_millis() as u64, "registration deadline exceeded");
                    RegisterError::Internal(anyhow::anyhow!("registration deadline exceeded"))
                })??,
            None => self.prepare(&payload).await?,
        };
        self.persist(prepared).await
    }

    async fn prepare(&self, payload: &Value) -> Result<Prepared, RegisterError> {
        let ValidRegistration {
            username,
            password,
            role,
        } = validate_registration(payload).map_err(|e| {
            warn!(reason = %e, "registration payload rejected");
            e
        })?;

        match self.accounts.find_by_username(&username).await {
            Ok(Some(_)) => {
                warn!(username = %username, "username already registered");
                return Err(RegisterError::DuplicateUsername(username));
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "find_by_username failed");
                return Err(RegisterError::Internal(e.into()));
            }
        }

        let hasher = Arc::clone(&self.hasher);
        let password_hash = match tokio::task::spawn_blocking(move || hasher.hash(&password)).await {
            Ok(Ok(h)) => h,
            Ok(Err(e)) => {
                error!(error = %e, "hash_password failed");
                return Err(RegisterError::Internal(e));
            }
            Err(e) => {
                error!(error = %e, "hashing task aborted");
                return Err(RegisterError::Internal(e.into()));
            }
        };

        let account = NewAccount {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
        };

        let token = self
            .tokens
            .issue(account.id, account.role.as_str())
            .map_err(|e| {
                error!(error = %e, "jwt sign failed");
                RegisterError::Internal(e)
            })?;

        Ok(Prepared { account, token })
    }

    async fn persist(&self, prepared: Prepared) -> Result<Registered, RegisterError> {
        let Prepared { account, token } = prepared;

        let saved = match self.accounts.insert(account).await {
            Ok(a) => a,
            Err(StoreError::UniqueViolation(username)) => {
                warn!(username = %username, "username taken at insert");
                return Err(RegisterError::DuplicateUsername(username));
            }
            Err(e) => {
                error!(error = %e, "insert account failed");
                return Err(RegisterError::Internal(e.into()));
            }
        };

        info!(account_id = %saved.id, username = %saved.username, role = %saved.role, "account registered");
        Ok(Registered {
            account: saved.into(),
            token,
        })
    }
}
