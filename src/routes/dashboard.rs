use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::CookieJar;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::flash;
use crate::model::employee::EmployeeStatus;
use crate::state::AppState;
use crate::views::{self, DashboardTemplate};

pub fn dashboard_router() -> Router {
    Router::new().route("/dashboard", get(dashboard))
}

// Headcount summary
async fn dashboard(
    Extension(state): Extension<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> AppResult<Response> {
    let employees = &state.employees;
    let (jar, flash) = flash::take(jar);
    let page = DashboardTemplate {
        current_user: Some(user.username),
        flash,
        total: employees.count().await?,
        active: employees.count_by_status(EmployeeStatus::Active).await?,
        on_leave: employees.count_by_status(EmployeeStatus::OnLeave).await?,
        terminated: employees.count_by_status(EmployeeStatus::Terminated).await?,
    };

    Ok((jar, views::render(&page)?).into_response())
}
