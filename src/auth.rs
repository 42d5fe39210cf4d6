//! Staff accounts and login sessions guarding the admin and refresh routes.

use crate::core::{FlexError, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Staff account allowed into the admin.
#[derive(Debug, Clone)]
pub struct User {
    username: String,
    password_hash: String,
}

impl User {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// An authenticated login.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
}

/// Authentication manager
///
/// Holds user accounts (bcrypt password hashes) and the session tokens
/// issued on login.
pub struct AuthManager {
    users: RwLock<HashMap<String, User>>,
    sessions: RwLock<HashMap<String, Session>>,
    hash_cost: u32,
}

impl AuthManager {
    const MIN_PASSWORD_LEN: usize = 8;

    /// Creates a manager with one administrator account.
    pub fn with_admin(username: &str, password: &str) -> Result<Self> {
        Self::with_admin_cost(username, password, bcrypt::DEFAULT_COST)
    }

    /// Same as `with_admin` with an explicit bcrypt cost.
    pub fn with_admin_cost(username: &str, password: &str, hash_cost: u32) -> Result<Self> {
        let mut manager = Self {
            users: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            hash_cost,
        };
        let admin = manager.new_user(username, password)?;
        manager.users.get_mut().insert(username.to_string(), admin);
        Ok(manager)
    }

    fn new_user(&self, username: &str, password: &str) -> Result<User> {
        Self::validate_username(username)?;
        Self::validate_password(password)?;
        Ok(User {
            username: username.to_string(),
            password_hash: self.hash_password(password)?,
        })
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.hash_cost).map_err(|e| FlexError::Auth(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    fn validate_username(username: &str) -> Result<()> {
        if username.is_empty() || !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(FlexError::InvalidInput(
                "Username must be non-empty and contain only letters, digits or '_'".into(),
            ));
        }
        Ok(())
    }

    fn validate_password(password: &str) -> Result<()> {
        if password.len() < Self::MIN_PASSWORD_LEN {
            return Err(FlexError::InvalidInput(format!(
                "Password must be at least {} characters",
                Self::MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<()> {
        let user = self.new_user(username, password)?;
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(FlexError::InvalidInput(format!(
                "User '{}' already exists",
                username
            )));
        }
        users.insert(username.to_string(), user);
        Ok(())
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let users = self.users.read().await;
        let user = users
            .get(username)
            .ok_or_else(|| FlexError::Auth("Invalid username or password".into()))?;
        if !Self::verify_password(password, &user.password_hash) {
            return Err(FlexError::Auth("Invalid username or password".into()));
        }
        Ok(user.clone())
    }

    /// Verifies credentials and opens a session; returns its token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let user = self.authenticate(username, password).await?;
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(
            token.clone(),
            Session {
                username: user.username.clone(),
            },
        );
        info!(username = %user.username, "user logged in");
        Ok(token)
    }

    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn session(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }
}
