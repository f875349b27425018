use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::error::{AppError, AppResult, ValidationErrors};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Terminated,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 3] = [
        EmployeeStatus::Active,
        EmployeeStatus::OnLeave,
        EmployeeStatus::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::OnLeave => "On Leave",
            EmployeeStatus::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown employee status {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for EmployeeStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub department: String,
    pub job_title: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn phone_or_dash(&self) -> &str {
        self.phone.as_deref().unwrap_or("-")
    }

    pub fn salary_display(&self) -> String {
        format!("{:.2}", self.salary)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Employee {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".into(),
            source: Box::new(e),
        })?;

        // SQLite reports whole REAL values as INTEGER in RETURNING rows
        let salary = match row.try_get::<f64, _>("salary") {
            Ok(salary) => salary,
            Err(_) => row.try_get::<i64, _>("salary")? as f64,
        };

        Ok(Employee {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            department: row.try_get("department")?,
            job_title: row.try_get("job_title")?,
            salary,
            hire_date: row.try_get("hire_date")?,
            status,
        })
    }
}

/// Raw add/edit form as posted by the browser. Every field is kept as text
/// so that a bad value can be shown back to the user unchanged.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EmployeeForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub hire_date: String,
    #[serde(default)]
    pub status: String,
}

/// Employee fields that passed validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeFields {
    pub full_name: String,
    pub phone: Option<String>,
    pub department: String,
    pub job_title: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
}

impl EmployeeForm {
    pub fn validate(&self) -> AppResult<EmployeeFields> {
        let mut errors = ValidationErrors::new();

        let required = |value: &str, label: &str, errors: &mut ValidationErrors| {
            let value = value.trim();
            if value.is_empty() {
                errors.push(format!("{label} is required"));
            }
            value.to_string()
        };

        let full_name = required(&self.full_name, "Full name", &mut errors);
        let department = required(&self.department, "Department", &mut errors);
        let job_title = required(&self.job_title, "Job title", &mut errors);

        let phone = Some(self.phone.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let salary = match self.salary.trim() {
            "" => {
                errors.push("Salary is required");
                0.0
            }
            raw => match raw.parse::<f64>() {
                Ok(v) if !v.is_finite() => {
                    errors.push("Salary must be a number");
                    0.0
                }
                // "-0" is stored as plain zero
                Ok(v) if v == 0.0 => 0.0,
                Ok(v) if v < 0.0 => {
                    errors.push("Salary must not be negative");
                    0.0
                }
                Ok(v) => v,
                Err(_) => {
                    errors.push("Salary must be a number");
                    0.0
                }
            },
        };

        let hire_date = match self.hire_date.trim() {
            "" => {
                errors.push("Hire date is required");
                None
            }
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("Hire date must be a valid date (YYYY-MM-DD)");
                    None
                }
            },
        };

        let status = match self.status.trim() {
            "" => EmployeeStatus::default(),
            raw => raw.parse().unwrap_or_else(|e: UnknownStatus| {
                errors.push(format!(
                    "Status must be one of Active, On Leave, Terminated (got {:?})",
                    e.0
                ));
                EmployeeStatus::default()
            }),
        };

        let (Some(hire_date), true) = (hire_date, errors.is_empty()) else {
            return Err(AppError::Validation(errors));
        };

        Ok(EmployeeFields {
            full_name,
            phone,
            department,
            job_title,
            salary,
            hire_date,
            status,
        })
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        EmployeeForm {
            full_name: employee.full_name.clone(),
            phone: employee.phone.clone().unwrap_or_default(),
            department: employee.department.clone(),
            job_title: employee.job_title.clone(),
            salary: employee.salary.to_string(),
            hire_date: employee.hire_date.format(DATE_FORMAT).to_string(),
            status: employee.status.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> EmployeeForm {
        EmployeeForm {
            full_name: "A".into(),
            phone: "".into(),
            department: "Eng".into(),
            job_title: "Dev".into(),
            salary: "1000".into(),
            hire_date: "2024-01-01".into(),
            status: "Active".into(),
        }
    }

    fn messages(form: &EmployeeForm) -> Vec<String> {
        match form.validate() {
            Err(AppError::Validation(e)) => e.messages().to_vec(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_form() {
        let fields = sample_form().validate().unwrap();
        assert_eq!(fields.full_name, "A");
        assert_eq!(fields.phone, None);
        assert_eq!(fields.salary, 1000.0);
        assert_eq!(fields.hire_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(fields.status, EmployeeStatus::Active);
    }

    #[test]
    fn test_trims_and_defaults_status() {
        let form = EmployeeForm {
            full_name: "  Grace Hopper ".into(),
            phone: " 555-0100 ".into(),
            status: "".into(),
            ..sample_form()
        };
        let fields = form.validate().unwrap();
        assert_eq!(fields.full_name, "Grace Hopper");
        assert_eq!(fields.phone.as_deref(), Some("555-0100"));
        assert_eq!(fields.status, EmployeeStatus::Active);
    }

    #[test]
    fn test_negative_salary_rejected() {
        let form = EmployeeForm {
            salary: "-1".into(),
            ..sample_form()
        };
        assert_eq!(messages(&form), vec!["Salary must not be negative"]);
    }

    #[test]
    fn test_zero_salary_allowed() {
        for raw in ["0", "-0", "0.00", "-0.0"] {
            let form = EmployeeForm {
                salary: raw.into(),
                ..sample_form()
            };
            let salary = form.validate().unwrap().salary;
            assert_eq!(salary, 0.0, "{raw}");
            assert!(salary.is_sign_positive(), "{raw}");
        }
    }

    #[test]
    fn test_non_numeric_salary_rejected() {
        for raw in ["abc", "NaN", "inf"] {
            let form = EmployeeForm {
                salary: raw.into(),
                ..sample_form()
            };
            assert_eq!(messages(&form), vec!["Salary must be a number"], "{raw}");
        }
    }

    #[test]
    fn test_bad_dates_rejected() {
        for raw in ["2024-02-30", "01/01/2024", "2024-13-01"] {
            let form = EmployeeForm {
                hire_date: raw.into(),
                ..sample_form()
            };
            assert_eq!(
                messages(&form),
                vec!["Hire date must be a valid date (YYYY-MM-DD)"],
                "{raw}"
            );
        }
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = messages(&EmployeeForm::default());
        assert_eq!(
            errors,
            vec![
                "Full name is required",
                "Department is required",
                "Job title is required",
                "Salary is required",
                "Hire date is required",
            ]
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        let form = EmployeeForm {
            status: "Retired".into(),
            ..sample_form()
        };
        assert_eq!(messages(&form).len(), 1);
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in EmployeeStatus::ALL {
            assert_eq!(status.as_str().parse::<EmployeeStatus>(), Ok(status));
        }
        assert_eq!("On Leave".parse::<EmployeeStatus>(), Ok(EmployeeStatus::OnLeave));
    }

    #[test]
    fn test_form_prefill_from_employee() {
        let employee = Employee {
            id: 3,
            full_name: "A".into(),
            phone: Some("123".into()),
            department: "Eng".into(),
            job_title: "Dev".into(),
            salary: 1500.5,
            hire_date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            status: EmployeeStatus::OnLeave,
        };
        let form = EmployeeForm::from(&employee);
        assert_eq!(form.phone, "123");
        assert_eq!(form.salary, "1500.5");
        assert_eq!(form.hire_date, "2023-06-15");
        assert_eq!(form.status, "On Leave");
        assert_eq!(form.validate().unwrap().salary, 1500.5);
    }
}
