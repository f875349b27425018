use axum::{
    async_trait,
    extract::{Extension, Form, FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::CookieJar;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::flash::{self, Flash};
use crate::model::employee::EmployeeForm;
use crate::state::AppState;
use crate::views::{self, EmployeeFormTemplate, EmployeesTemplate, NotFoundTemplate};

pub fn employee_router() -> Router {
    Router::new()
        .route("/employees", get(list_employees))
        .route("/employees/add", get(add_form).post(create_employee))
        .route("/employees/edit/:id", get(edit_form).post(update_employee))
        .route("/employees/delete/:id", get(delete_employee))
}

/// Numeric `:id` path segment. Anything else names no employee.
pub struct EmployeeId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EmployeeId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::employee_not_found(""))?;
        raw.parse()
            .map(EmployeeId)
            .map_err(|_| AppError::employee_not_found(raw))
    }
}

// Missing records get the 404 page with the signed-in nav bar
fn for_user(user: &CurrentUser, result: AppResult<Response>) -> AppResult<Response> {
    match result {
        Err(AppError::NotFound { entity, id }) => {
            let page = NotFoundTemplate::missing(Some(user.username.clone()), entity, &id);
            Ok((StatusCode::NOT_FOUND, views::render(&page)?).into_response())
        }
        other => other,
    }
}

// List all employees
async fn list_employees(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> AppResult<Response> {
    let employees = state.employees.list_all().await?;
    let (jar, flash) = flash::take(jar);
    let page = EmployeesTemplate {
        current_user: Some(user.username),
        flash,
        employees,
    };
    Ok((jar, views::render(&page)?).into_response())
}

async fn add_form(user: CurrentUser) -> AppResult<Response> {
    let page = EmployeeFormTemplate::add(user.username, EmployeeForm::default(), Vec::new());
    Ok(views::render(&page)?.into_response())
}

// Create new employee
async fn create_employee(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Form(form): Form<EmployeeForm>,
) -> AppResult<Response> {
    match state.employees.create(&form).await {
        Ok(employee) => {
            info!(employee_id = employee.id, by = %user.username, "Employee created");
            let jar = flash::set(jar, &state.config, Flash::EmployeeAdded);
            Ok((jar, Redirect::to("/employees")).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let page = EmployeeFormTemplate::add(user.username, form, errors.messages().to_vec());
            Ok((StatusCode::UNPROCESSABLE_ENTITY, views::render(&page)?).into_response())
        }
        Err(e) => Err(e),
    }
}

// Prefilled edit form; unknown ids are a 404
async fn edit_form(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    id: Result<EmployeeId, AppError>,
) -> AppResult<Response> {
    let result = edit_page(&state, &user, id).await;
    for_user(&user, result)
}

async fn edit_page(
    state: &AppState,
    user: &CurrentUser,
    id: Result<EmployeeId, AppError>,
) -> AppResult<Response> {
    let EmployeeId(id) = id?;
    let employee = state.employees.get(id).await?;
    let page = EmployeeFormTemplate::edit(
        user.username.clone(),
        employee.id,
        EmployeeForm::from(&employee),
        Vec::new(),
    );
    Ok(views::render(&page)?.into_response())
}

// Update employee
async fn update_employee(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    id: Result<EmployeeId, AppError>,
    Form(form): Form<EmployeeForm>,
) -> AppResult<Response> {
    let result = save_edit(&state, &user, jar, id, form).await;
    for_user(&user, result)
}

async fn save_edit(
    state: &AppState,
    user: &CurrentUser,
    jar: CookieJar,
    id: Result<EmployeeId, AppError>,
    form: EmployeeForm,
) -> AppResult<Response> {
    let EmployeeId(id) = id?;
    // 404 before validation, so a bad id never shows a form
    state.employees.get(id).await?;

    match state.employees.update(id, &form).await {
        Ok(employee) => {
            info!(employee_id = employee.id, by = %user.username, "Employee updated");
            let jar = flash::set(jar, &state.config, Flash::EmployeeUpdated);
            Ok((jar, Redirect::to("/employees")).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let page = EmployeeFormTemplate::edit(
                user.username.clone(),
                id,
                form,
                errors.messages().to_vec(),
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, views::render(&page)?).into_response())
        }
        Err(e) => Err(e),
    }
}

// Delete employee
async fn delete_employee(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    id: Result<EmployeeId, AppError>,
) -> AppResult<Response> {
    let result = remove(&state, &user, jar, id).await;
    for_user(&user, result)
}

async fn remove(
    state: &AppState,
    user: &CurrentUser,
    jar: CookieJar,
    id: Result<EmployeeId, AppError>,
) -> AppResult<Response> {
    let EmployeeId(id) = id?;
    state.employees.delete(id).await?;
    info!(employee_id = id, by = %user.username, "Employee deleted");

    let jar = flash::set(jar, &state.config, Flash::EmployeeDeleted);
    Ok((jar, Redirect::to("/employees")).into_response())
}
