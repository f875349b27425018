use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

use crate::auth::{CurrentUser, Identity, SESSION_COOKIE};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::flash::{self, Flash};
use crate::model::user::CredentialsForm;
use crate::state::AppState;
use crate::views::{self, LoginTemplate, RegisterTemplate};

pub fn auth_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
        .route("/logout", get(logout))
}

fn session_cookie(config: &Config, session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

// Landing page: dashboard for signed-in users, login for everyone else
async fn index(identity: Identity) -> Redirect {
    if identity.is_authenticated() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

async fn login_form(identity: Identity, jar: CookieJar) -> AppResult<Response> {
    if identity.is_authenticated() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let (jar, flash) = flash::take(jar);
    let page = LoginTemplate {
        current_user: None,
        flash,
        error: None,
        username: String::new(),
    };
    Ok((jar, views::render(&page)?).into_response())
}

async fn login(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    match state.auth.login(&form.username, &form.password).await {
        Ok((user, session)) => {
            info!(
                user_id = user.id,
                username = %user.username,
                opened_at = %session.created_at,
                expires_at = %session.expires_at,
                "User logged in"
            );
            let jar = jar.add(session_cookie(&state.config, session.session_id));
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            warn!(username = %form.username, "Failed login attempt");
            let page = LoginTemplate {
                current_user: None,
                flash: None,
                error: Some("Invalid username or password".to_string()),
                username: form.username,
            };
            Ok((StatusCode::UNAUTHORIZED, views::render(&page)?).into_response())
        }
        Err(e) => Err(e),
    }
}

async fn register_form(identity: Identity, jar: CookieJar) -> AppResult<Response> {
    let (jar, flash) = flash::take(jar);
    let page = RegisterTemplate {
        current_user: identity.user().map(|u| u.username.clone()),
        flash,
        errors: Vec::new(),
        username: String::new(),
    };
    Ok((jar, views::render(&page)?).into_response())
}

async fn register(
    Extension(state): Extension<AppState>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let (status, errors) = match state.auth.register(&form.username, &form.password).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "User registered");
            let jar = flash::set(jar, &state.config, Flash::Registered);
            return Ok((jar, Redirect::to("/login")).into_response());
        }
        Err(AppError::DuplicateUsername) => {
            warn!(username = %form.username, "Registration with taken username");
            (
                StatusCode::CONFLICT,
                vec!["That username is already registered".to_string()],
            )
        }
        Err(AppError::Validation(errors)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, errors.messages().to_vec())
        }
        Err(e) => return Err(e),
    };

    let page = RegisterTemplate {
        current_user: identity.user().map(|u| u.username.clone()),
        flash: None,
        errors,
        username: form.username,
    };
    Ok((status, views::render(&page)?).into_response())
}

async fn logout(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> AppResult<Response> {
    state.auth.logout(Some(&user.session_id)).await?;
    info!(user_id = user.id, username = %user.username, "User logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let jar = flash::set(jar, &state.config, Flash::LoggedOut);
    Ok((jar, Redirect::to("/login")).into_response())
}
