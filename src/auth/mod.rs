//! Registration, login and session identity.
//!
//! `Auth` ties the user and session stores together; the extractors in
//! [`extractor`] turn the session cookie into an explicit [`Identity`] for
//! each handler call.

pub mod extractor;
pub mod password;

pub use extractor::{CurrentUser, Identity};

use crate::error::{AppError, AppResult, ValidationErrors};
use crate::model::user::User;
use crate::store::{Session, SessionStore, UserStore};

/// Cookie carrying the server-side session id
pub const SESSION_COOKIE: &str = "hr_session";

#[derive(Clone)]
pub struct Auth {
    users: UserStore,
    sessions: SessionStore,
}

impl Auth {
    pub fn new(users: UserStore, sessions: SessionStore) -> Self {
        Self { users, sessions }
    }

    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        let username = username.trim();

        let mut errors = ValidationErrors::new();
        if username.is_empty() {
            errors.push("Username is required");
        }
        if password.is_empty() {
            errors.push("Password is required");
        }
        errors.into_result()?;

        let password_hash = password::hash_password(password)?;
        self.users.insert(username, &password_hash).await
    }

    /// Check credentials and open a session bound to the user's id.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, Session)> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        let purged = self.sessions.purge_expired().await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }

        let session = self.sessions.create(user.id).await?;
        Ok((user, session))
    }

    /// Drop the session if there is one; a missing or unknown id is not an
    /// error.
    pub async fn logout(&self, session_id: Option<&str>) -> AppResult<()> {
        if let Some(session_id) = session_id {
            self.sessions.delete(session_id).await?;
        }
        Ok(())
    }

    pub async fn current_user(&self, session_id: Option<&str>) -> AppResult<Identity> {
        let Some(session_id) = session_id else {
            return Ok(Identity::Anonymous);
        };
        let Some(session) = self.sessions.find(session_id).await? else {
            return Ok(Identity::Anonymous);
        };

        let identity = match self.users.get(session.user_id).await? {
            Some(user) => Identity::User(CurrentUser {
                id: user.id,
                username: user.username,
                session_id: session.session_id,
            }),
            None => Identity::Anonymous,
        };
        Ok(identity)
    }
}
