use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::model::user::User;

// SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
const UNIQUE_VIOLATION_CODES: [&str; 2] = ["2067", "1555"];

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user whose password has already been hashed. A taken
    /// username maps to [`AppError::DuplicateUsername`], including when two
    /// registrations race past the existence check.
    pub async fn insert(&self, username: &str, password_hash: &str) -> AppResult<User> {
        if self.find_by_username(username).await?.is_some() {
            return Err(AppError::DuplicateUsername);
        }

        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err
                    .code()
                    .is_some_and(|code| UNIQUE_VIOLATION_CODES.contains(&code.as_ref())) =>
            {
                AppError::DuplicateUsername
            }
            other => AppError::Database(other),
        })
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn store() -> UserStore {
        UserStore::new(Database::in_memory().await.unwrap().pool())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let users = store().await;
        let user = users.insert("alice", "hash").await.unwrap();
        assert_eq!(user.username, "alice");

        let found = users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(users.get(user.id).await.unwrap().unwrap().username, "alice");
        assert!(users.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let users = store().await;
        users.insert("alice", "hash").await.unwrap();

        let err = users.insert("alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));
        assert_eq!(users.count().await.unwrap(), 1);
    }
}
