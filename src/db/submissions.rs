use async_trait::async_trait;
use sqlx::PgPool;

use crate::form::service::{Datastore, DatastoreError};
use crate::models::{NewSubmission, SubmissionRecord};

/// PostgreSQL-backed datastore. Primary keys are assigned by the database;
/// concurrent inserts are safe without explicit locking here.
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn insert(&self, row: NewSubmission) -> Result<SubmissionRecord, DatastoreError> {
        sqlx::query_as::<_, SubmissionRecord>(
            "INSERT INTO submissions (title, color, username, email, uid, ip, \"timestamp\")
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&row.title)
        .bind(row.color)
        .bind(&row.username)
        .bind(&row.email)
        .bind(row.uid)
        .bind(&row.ip)
        .bind(row.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(DatastoreError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SubmissionRecord>, DatastoreError> {
        sqlx::query_as::<_, SubmissionRecord>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatastoreError::Database)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<SubmissionRecord>, DatastoreError> {
        sqlx::query_as::<_, SubmissionRecord>(
            "SELECT * FROM submissions ORDER BY id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DatastoreError::Database)
    }

    async fn count(&self) -> Result<i64, DatastoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await
            .map_err(DatastoreError::Database)?;
        Ok(row.0)
    }
}
