//! In-memory history store for unit tests and local tooling.
//!
//! Mirrors the Postgres store's observable behavior, including the atomic
//! rejection of duplicate `(kind, subject_id, version)` appends, so ledger
//! properties can be tested without a database.

use std::sync::Mutex;

use async_trait::async_trait;

use aula_core::types::DbId;

use crate::record::{NewVersionRecord, VersionRecord};
use crate::store::{HistoryStore, StoreError};
use crate::subject::SubjectKind;

#[derive(Default)]
struct Inner {
    next_id: DbId,
    records: Vec<VersionRecord>,
}

/// Mutex-guarded vector of records; ids are assigned sequentially from 1.
#[derive(Default)]
pub struct MemoryHistoryStore {
    inner: Mutex<Inner>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: NewVersionRecord) -> Result<VersionRecord, StoreError> {
        let mut inner = self.inner.lock().expect("history store lock poisoned");

        // Uniqueness check and insert happen under one lock acquisition,
        // matching the database's constraint semantics.
        let taken = inner.records.iter().any(|r| {
            r.subject_type == record.kind.as_str()
                && r.subject_id == record.subject_id
                && r.version == record.version
        });
        if taken {
            return Err(StoreError::DuplicateVersion {
                kind: record.kind,
                subject_id: record.subject_id,
                version: record.version,
            });
        }

        inner.next_id += 1;
        let persisted = VersionRecord {
            id: inner.next_id,
            subject_type: record.kind.as_str().to_string(),
            subject_id: record.subject_id,
            group_key: record.group_key,
            version: record.version,
            action: record.action.as_str().to_string(),
            changes: record.changes.map(serde_json::Value::Object),
            previous_data: serde_json::Value::Object(record.previous_data),
            current_data: serde_json::Value::Object(record.current_data),
            edited_by_id: record.edited_by.id,
            edited_by_name: record.edited_by.display_name,
            edited_by_role: record.edited_by.role.as_str().to_string(),
            edited_at: chrono::Utc::now(),
        };
        inner.records.push(persisted.clone());
        Ok(persisted)
    }

    async fn list_for_subject(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
    ) -> Result<Vec<VersionRecord>, StoreError> {
        let inner = self.inner.lock().expect("history store lock poisoned");
        let mut records: Vec<_> = inner
            .records
            .iter()
            .filter(|r| r.subject_type == kind.as_str() && r.subject_id == subject_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(records)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<VersionRecord>, StoreError> {
        let inner = self.inner.lock().expect("history store lock poisoned");
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_version(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
        version: i32,
    ) -> Result<Option<VersionRecord>, StoreError> {
        let inner = self.inner.lock().expect("history store lock poisoned");
        Ok(inner
            .records
            .iter()
            .find(|r| {
                r.subject_type == kind.as_str()
                    && r.subject_id == subject_id
                    && r.version == version
            })
            .cloned())
    }

    async fn latest_version(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
    ) -> Result<i32, StoreError> {
        let inner = self.inner.lock().expect("history store lock poisoned");
        Ok(inner
            .records
            .iter()
            .filter(|r| r.subject_type == kind.as_str() && r.subject_id == subject_id)
            .map(|r| r.version)
            .max()
            .unwrap_or(0))
    }
}
