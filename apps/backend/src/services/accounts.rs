//! Registration, login and bearer-token sessions.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{LoginRequest, NewUser, RegisterRequest, User};
use crate::storage::{Storage, StorageError};

/// Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

fn sha256_hex(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Check `password` against a stored value. Besides Argon2 hashes, accounts
/// from older data files may hold an unsalted SHA-256 digest or the password
/// in clear text.
fn password_matches(stored: &str, password: &str) -> bool {
    if let Ok(hash) = PasswordHash::new(stored) {
        return Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok();
    }

    if is_sha256_hex(stored) {
        stored == sha256_hex(password)
    } else {
        stored == password
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

pub struct AccountService {
    storage: Arc<dyn Storage>,
    /// token -> user id
    sessions: RwLock<HashMap<String, i64>>,
}

impl AccountService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create an account and log it in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(String, User)> {
        let username = required("username", &request.username)?;
        let email = required("email", &request.email)?;
        let password = required("password", &request.password)?;

        let user = self
            .storage
            .create_user(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password)?,
            })
            .map_err(|e| match e {
                StorageError::DuplicateUsername(name) => {
                    ApiError::Conflict(format!("username {name} is already taken"))
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        let token = self.issue_token(user.id).await;
        Ok((token, user))
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<(String, User)> {
        let username = required("username", &request.username)?;
        let password = required("password", &request.password)?;

        let user = self
            .storage
            .find_user_by_username(username)?
            .filter(|user| password_matches(&user.password, password))
            .ok_or_else(|| ApiError::Unauthorized("invalid username or password".to_string()))?;

        tracing::info!(user_id = user.id, "user logged in");
        let token = self.issue_token(user.id).await;
        Ok((token, user))
    }

    /// Drop a session token. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        if let Some(user_id) = self.sessions.write().await.remove(token) {
            tracing::info!(user_id, "user logged out");
        }
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self
            .sessions
            .read()
            .await
            .get(token)
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("invalid session token".to_string()))?;

        self.storage
            .get_user(user_id)?
            .ok_or_else(|| ApiError::Unauthorized("account no longer exists".to_string()))
    }

    async fn issue_token(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user_id);
        token
    }
}
