//! Session extractors
//!
//! `Identity` resolves the session cookie for any route; `CurrentUser`
//! additionally rejects anonymous requests with a redirect to the login page.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use super::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user attached to the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    User(CurrentUser),
}

impl Identity {
    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Identity::User(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(identity.clone());
        }

        let state = parts
            .extensions
            .get::<AppState>()
            .cloned()
            .ok_or(AppError::MissingState)?;

        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

        let identity = state.auth.current_user(session_id.as_deref()).await?;
        parts.extensions.insert(identity.clone());
        Ok(identity)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity::User(user) => Ok(user),
            Identity::Anonymous => {
                tracing::debug!(uri = %parts.uri, "Anonymous request to protected page");
                Err(AppError::Unauthenticated)
            }
        }
    }
}
