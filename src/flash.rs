//! One-shot status messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::Config;

pub const FLASH_COOKIE: &str = "hr_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Registered,
    LoggedOut,
    EmployeeAdded,
    EmployeeUpdated,
    EmployeeDeleted,
}

impl Flash {
    const ALL: [Flash; 5] = [
        Flash::Registered,
        Flash::LoggedOut,
        Flash::EmployeeAdded,
        Flash::EmployeeUpdated,
        Flash::EmployeeDeleted,
    ];

    fn code(self) -> &'static str {
        match self {
            Flash::Registered => "registered",
            Flash::LoggedOut => "logged_out",
            Flash::EmployeeAdded => "employee_added",
            Flash::EmployeeUpdated => "employee_updated",
            Flash::EmployeeDeleted => "employee_deleted",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Flash::Registered => "Account created, please log in.",
            Flash::LoggedOut => "You have been logged out.",
            Flash::EmployeeAdded => "Employee added.",
            Flash::EmployeeUpdated => "Employee updated.",
            Flash::EmployeeDeleted => "Employee deleted.",
        }
    }

    /// CSS class suffix for the message box
    pub fn level(&self) -> &'static str {
        match self {
            Flash::LoggedOut => "info",
            _ => "success",
        }
    }
}

/// Queue `flash` for the next rendered page.
pub fn set(jar: CookieJar, config: &Config, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.cookie_secure),
    )
}

/// Read and clear the pending flash, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(flash) = jar.get(FLASH_COOKIE).map(|c| Flash::from_code(c.value())) else {
        return (jar, None);
    };
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}
