//! Identity gate.
//!
//! Every browser session must pass through an `IdentityProvider` before its
//! note list is loaded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{NotebookError, Result};

pub mod cognito;
pub mod sessions;

pub use cognito::CognitoIdentityProvider;
pub use sessions::{SessionRegistry, Workspace};

/// A signed-in user and the token the note service expects.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub username: String,
    pub id_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthSession>;
}

/// Reject blank credentials before anything goes over the wire.
pub fn check_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(NotebookError::Auth("Username cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(NotebookError::Auth("Password cannot be empty".to_string()));
    }
    Ok(())
}
