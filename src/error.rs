//! Application error type shared by stores, auth and route handlers.

use std::fmt;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::views::NotFoundTemplate;

/// Field-level messages collected while validating a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("application state missing from request")]
    MissingState,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn employee_not_found(id: impl ToString) -> Self {
        AppError::NotFound {
            entity: "employee",
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthenticated => StatusCode::SEE_OTHER,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::PasswordHash(_)
            | AppError::Template(_)
            | AppError::MissingState => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::Unauthenticated => Redirect::to("/login").into_response(),
            AppError::NotFound { entity, id } => {
                let page = NotFoundTemplate::missing(None, entity, &id);
                match page.render() {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to render not-found page");
                        (status, "Not found").into_response()
                    }
                }
            }
            AppError::DuplicateUsername
            | AppError::InvalidCredentials
            | AppError::Validation(_) => (status, self.to_string()).into_response(),
            other => {
                tracing::error!(error = %other, "Request failed");
                (status, "Internal server error").into_response()
            }
        }
    }
}
