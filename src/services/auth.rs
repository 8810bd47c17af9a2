use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::admin;
use crate::errors::ServiceError;

const SESSION_TOKEN_LEN: usize = 48;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub username: String,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Session {
    username: String,
    last_login: Option<DateTime<Utc>>,
    expires_at: DateTime<Utc>,
}

/// Back-office login with in-process sessions.
///
/// Sessions live in a `DashMap` keyed by an opaque random token; they do
/// not survive a restart, which is acceptable for a single-operator
/// back office. Expired entries are dropped lazily on lookup.
pub struct AuthService {
    db_pool: Arc<DbPool>,
    sessions: DashMap<String, Session>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(db_pool: Arc<DbPool>, session_ttl: Duration) -> Self {
        Self {
            db_pool,
            sessions: DashMap::new(),
            session_ttl,
        }
    }

    /// Verifies credentials, stamps `last_login`, and opens a session.
    /// Returns the session token together with the session info.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<(String, SessionInfo), ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let admin = admin::Entity::find()
            .filter(admin::Column::Username.eq(request.username.clone()))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("Invalid username or password".to_string())
            })?;

        if !verify_password(&request.password, &admin.password_hash) {
            warn!(username = %request.username, "Failed login attempt");
            return Err(ServiceError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let previous_login = admin.last_login;
        let username = admin.username.clone();

        let mut active: admin::ActiveModel = admin.into();
        active.last_login = Set(Some(Utc::now()));
        active.update(db).await?;

        let token = generate_session_token();
        let ttl = ChronoDuration::from_std(self.session_ttl)
            .map_err(|e| ServiceError::InternalError(format!("Invalid session TTL: {}", e)))?;
        self.sessions.insert(
            token.clone(),
            Session {
                username: username.clone(),
                last_login: previous_login,
                expires_at: Utc::now() + ttl,
            },
        );

        info!(username = %username, "Admin logged in");
        Ok((
            token,
            SessionInfo {
                username,
                last_login: previous_login,
            },
        ))
    }

    /// Resolves a session token; expired sessions are removed on the spot.
    pub fn session(&self, token: &str) -> Option<SessionInfo> {
        let expired = match self.sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => {
                return Some(SessionInfo {
                    username: session.username.clone(),
                    last_login: session.last_login,
                });
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(token);
        }
        None
    }

    /// Idempotent; logging out an unknown token is not an error.
    pub fn logout(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Seeds the back-office account on first boot.
    #[instrument(skip(self, password))]
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(hash_password(password)?),
            last_login: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(username = %username, "Seeded default admin account");
        Ok(())
    }
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("tehimas123").unwrap();
        assert!(verify_password("tehimas123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), SESSION_TOKEN_LEN);
        assert_ne!(a, b);
    }
}
