//! Askama page templates.
//!
//! Every page extends `base.html`, which reads `current_user` for the
//! navigation bar and `flash` for the status message.

use askama::Template;
use axum::response::Html;

use crate::error::AppResult;
use crate::flash::Flash;
use crate::model::employee::{Employee, EmployeeForm, EmployeeStatus};

/// Render a template into an HTML response body.
pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<String>,
    pub flash: Option<Flash>,
    pub error: Option<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<String>,
    pub flash: Option<Flash>,
    pub errors: Vec<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_user: Option<String>,
    pub flash: Option<Flash>,
    pub total: i64,
    pub active: i64,
    pub on_leave: i64,
    pub terminated: i64,
}

#[derive(Template)]
#[template(path = "employees.html")]
pub struct EmployeesTemplate {
    pub current_user: Option<String>,
    pub flash: Option<Flash>,
    pub employees: Vec<Employee>,
}

/// Shared add/edit form
#[derive(Template)]
#[template(path = "employee_form.html")]
pub struct EmployeeFormTemplate {
    pub current_user: Option<String>,
    pub flash: Option<Flash>,
    pub title: &'static str,
    pub action: String,
    pub form: EmployeeForm,
    pub errors: Vec<String>,
    pub statuses: [EmployeeStatus; 3],
}

impl EmployeeFormTemplate {
    pub fn add(current_user: String, form: EmployeeForm, errors: Vec<String>) -> Self {
        Self {
            current_user: Some(current_user),
            flash: None,
            title: "Add employee",
            action: "/employees/add".to_string(),
            form,
            errors,
            statuses: EmployeeStatus::ALL,
        }
    }

    pub fn edit(current_user: String, id: i64, form: EmployeeForm, errors: Vec<String>) -> Self {
        Self {
            current_user: Some(current_user),
            flash: None,
            title: "Edit employee",
            action: format!("/employees/edit/{id}"),
            form,
            errors,
            statuses: EmployeeStatus::ALL,
        }
    }

    pub fn is_selected(&self, status: &EmployeeStatus) -> bool {
        match self.form.status.trim() {
            "" => *status == EmployeeStatus::default(),
            raw => raw == status.as_str(),
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub current_user: Option<String>,
    pub flash: Option<Flash>,
    pub message: String,
}

impl NotFoundTemplate {
    pub fn missing(current_user: Option<String>, entity: &str, id: &str) -> Self {
        Self {
            current_user,
            flash: None,
            message: format!("No {entity} with id {id} exists."),
        }
    }
}
