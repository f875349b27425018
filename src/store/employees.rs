use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, EmployeeForm, EmployeeStatus};

const EMPLOYEE_COLUMNS: &str =
    "id, full_name, phone, department, job_title, salary, hire_date, status";

#[derive(Clone)]
pub struct EmployeeStore {
    pool: SqlitePool,
}

impl EmployeeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // All employees, oldest record first
    pub async fn list_all(&self) -> AppResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn count_by_status(&self, status: EmployeeStatus) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn get(&self, id: i64) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::employee_not_found(id))
    }

    pub async fn create(&self, form: &EmployeeForm) -> AppResult<Employee> {
        let fields = form.validate()?;

        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees (full_name, phone, department, job_title, salary, hire_date, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&fields.full_name)
        .bind(&fields.phone)
        .bind(&fields.department)
        .bind(&fields.job_title)
        .bind(fields.salary)
        .bind(fields.hire_date)
        .bind(fields.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn update(&self, id: i64, form: &EmployeeForm) -> AppResult<Employee> {
        let fields = form.validate()?;

        sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees
             SET full_name = ?, phone = ?, department = ?, job_title = ?,
                 salary = ?, hire_date = ?, status = ?
             WHERE id = ?
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&fields.full_name)
        .bind(&fields.phone)
        .bind(&fields.department)
        .bind(&fields.job_title)
        .bind(fields.salary)
        .bind(fields.hire_date)
        .bind(fields.status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::employee_not_found(id))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::employee_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::NaiveDate;

    async fn store() -> EmployeeStore {
        EmployeeStore::new(Database::in_memory().await.unwrap().pool())
    }

    fn form(name: &str, status: &str) -> EmployeeForm {
        EmployeeForm {
            full_name: name.into(),
            phone: String::new(),
            department: "Eng".into(),
            job_title: "Dev".into(),
            salary: "1000".into(),
            hire_date: "2024-01-01".into(),
            status: status.into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let employees = store().await;
        let created = employees.create(&form("A", "Active")).await.unwrap();

        let all = employees.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let listed = &all[0];
        assert_eq!(listed, &created);
        assert_eq!(listed.full_name, "A");
        assert_eq!(listed.department, "Eng");
        assert_eq!(listed.job_title, "Dev");
        assert_eq!(listed.salary, 1000.0);
        assert_eq!(listed.hire_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(listed.status, EmployeeStatus::Active);
        assert_eq!(listed.phone, None);
    }

    #[tokio::test]
    async fn test_whole_number_salaries_round_trip() {
        let employees = store().await;
        let with_salary = |salary: &str| EmployeeForm {
            salary: salary.into(),
            ..form("A", "Active")
        };

        let created = employees.create(&with_salary("0")).await.unwrap();
        assert_eq!(created.salary, 0.0);
        assert_eq!(employees.get(created.id).await.unwrap(), created);

        let updated = employees
            .update(created.id, &with_salary("1000"))
            .await
            .unwrap();
        assert_eq!(updated.salary, 1000.0);
        assert_eq!(employees.get(created.id).await.unwrap(), updated);

        let zeroed = employees
            .update(created.id, &with_salary("-0"))
            .await
            .unwrap();
        assert_eq!(zeroed.salary_display(), "0.00");
        assert_eq!(employees.list_all().await.unwrap(), vec![zeroed]);
    }

    #[tokio::test]
    async fn test_negative_salary_not_persisted() {
        let employees = store().await;
        let bad = EmployeeForm {
            salary: "-1".into(),
            ..form("A", "Active")
        };

        let err = employees.create(&bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(employees.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let employees = store().await;
        let err = employees.get(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref id, .. } if id == "42"));
    }

    #[tokio::test]
    async fn test_update_status_changes_counts() {
        let employees = store().await;
        let a = employees.create(&form("A", "Active")).await.unwrap();
        employees.create(&form("B", "Active")).await.unwrap();
        employees.create(&form("C", "On Leave")).await.unwrap();
        assert_eq!(
            employees.count_by_status(EmployeeStatus::Active).await.unwrap(),
            2
        );

        let updated = employees
            .update(a.id, &form("A", "Terminated"))
            .await
            .unwrap();
        assert_eq!(updated.status, EmployeeStatus::Terminated);
        assert_eq!(
            employees.count_by_status(EmployeeStatus::Active).await.unwrap(),
            1
        );
        assert_eq!(
            employees
                .count_by_status(EmployeeStatus::Terminated)
                .await
                .unwrap(),
            1
        );
        assert_eq!(employees.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_validates_and_checks_existence() {
        let employees = store().await;
        let a = employees.create(&form("A", "Active")).await.unwrap();

        let bad = EmployeeForm {
            hire_date: "2024-02-31".into(),
            ..form("A", "Active")
        };
        assert!(matches!(
            employees.update(a.id, &bad).await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert_eq!(employees.get(a.id).await.unwrap(), a);

        assert!(matches!(
            employees.update(a.id + 100, &form("Z", "Active")).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent() {
        let employees = store().await;
        let a = employees.create(&form("A", "Active")).await.unwrap();

        employees.delete(a.id).await.unwrap();
        assert_eq!(employees.count().await.unwrap(), 0);

        let err = employees.delete(a.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_store_unchanged() {
        let employees = store().await;
        employees.create(&form("A", "Active")).await.unwrap();

        assert!(employees.delete(999).await.is_err());
        assert_eq!(employees.count().await.unwrap(), 1);
    }
}
