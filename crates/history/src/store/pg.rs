//! Postgres-backed history store over the `entity_history` table.

use async_trait::async_trait;

use aula_core::types::DbId;
use aula_db::DbPool;

use crate::record::{NewVersionRecord, VersionRecord};
use crate::store::{HistoryStore, StoreError};
use crate::subject::SubjectKind;

/// Column list for entity_history queries.
const COLUMNS: &str = "id, subject_type, subject_id, group_key, version, action, \
     changes, previous_data, current_data, \
     edited_by_id, edited_by_name, edited_by_role, edited_at";

/// Unique constraint guarding the per-subject version sequence.
const VERSION_CONSTRAINT: &str = "uq_entity_history_subject_version";

/// Durable [`HistoryStore`] implementation backed by Postgres.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: DbPool,
}

impl PgHistoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, record: NewVersionRecord) -> Result<VersionRecord, StoreError> {
        let query = format!(
            "INSERT INTO entity_history
                 (subject_type, subject_id, group_key, version, action,
                  changes, previous_data, current_data,
                  edited_by_id, edited_by_name, edited_by_role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, VersionRecord>(&query)
            .bind(record.kind.as_str())
            .bind(record.subject_id)
            .bind(record.group_key)
            .bind(record.version)
            .bind(record.action.as_str())
            .bind(record.changes.map(serde_json::Value::Object))
            .bind(serde_json::Value::Object(record.previous_data))
            .bind(serde_json::Value::Object(record.current_data))
            .bind(record.edited_by.id)
            .bind(&record.edited_by.display_name)
            .bind(record.edited_by.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify_insert_error(e, record.kind, record.subject_id, record.version))
    }

    async fn list_for_subject(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
    ) -> Result<Vec<VersionRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM entity_history
             WHERE subject_type = $1 AND subject_id = $2
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, VersionRecord>(&query)
            .bind(kind.as_str())
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<VersionRecord>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM entity_history WHERE id = $1");
        sqlx::query_as::<_, VersionRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn find_by_version(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
        version: i32,
    ) -> Result<Option<VersionRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM entity_history
             WHERE subject_type = $1 AND subject_id = $2 AND version = $3"
        );
        sqlx::query_as::<_, VersionRecord>(&query)
            .bind(kind.as_str())
            .bind(subject_id)
            .bind(version)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn latest_version(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
    ) -> Result<i32, StoreError> {
        let result: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version), 0) FROM entity_history
             WHERE subject_type = $1 AND subject_id = $2",
        )
        .bind(kind.as_str())
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.0)
    }
}

/// Wrap a sqlx error as an infrastructure fault.
fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(anyhow::Error::new(err))
}

/// Map a failed insert to [`StoreError::DuplicateVersion`] when it violates
/// the version uniqueness constraint (Postgres error code 23505).
fn classify_insert_error(
    err: sqlx::Error,
    kind: SubjectKind,
    subject_id: DbId,
    version: i32,
) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(VERSION_CONSTRAINT)
        {
            return StoreError::DuplicateVersion {
                kind,
                subject_id,
                version,
            };
        }
    }
    backend(err)
}
