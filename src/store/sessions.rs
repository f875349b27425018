use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::AppResult;

// Ten years; keeps `now + timeout` well inside chrono's range.
const MAX_TIMEOUT_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Login session row
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, timeout_secs: u64) -> Self {
        let timeout = Duration::seconds(timeout_secs.min(MAX_TIMEOUT_SECS) as i64);
        Self { pool, timeout }
    }

    pub async fn create(&self, user_id: i64) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            session_id: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + self.timeout,
        };

        sqlx::query(
            "INSERT INTO sessions (session_id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.session_id)
        .bind(session.user_id)
        .bind(format_timestamp(session.created_at))
        .bind(format_timestamp(session.expires_at))
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    /// Look up a live session. An expired session is deleted and reported
    /// as absent.
    pub async fn find(&self, session_id: &str) -> AppResult<Option<Session>> {
        let row = sqlx::query(
            "SELECT session_id, user_id, created_at, expires_at FROM sessions WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let (Some(created_at), Some(expires_at)) = (
            parse_timestamp(row.try_get("created_at")?),
            parse_timestamp(row.try_get("expires_at")?),
        ) else {
            tracing::warn!(session_id, "Dropping session with unreadable timestamps");
            self.delete(session_id).await?;
            return Ok(None);
        };

        if expires_at <= Utc::now() {
            self.delete(session_id).await?;
            return Ok(None);
        }

        Ok(Some(Session {
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            created_at,
            expires_at,
        }))
    }

    pub async fn delete(&self, session_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(format_timestamp(Utc::now()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[cfg(test)]
    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

// Fixed-width UTC form, so SQL string comparison matches time order
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
