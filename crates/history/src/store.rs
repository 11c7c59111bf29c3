//! Persistence seam for version records.
//!
//! The ledger talks to storage only through [`HistoryStore`], so the same
//! algorithm runs against Postgres in production and against an in-memory
//! store in unit tests. Implementations must enforce uniqueness of
//! `(kind, subject_id, version)` atomically in `append`; the ledger relies
//! on that rejection to keep version sequences dense under concurrent
//! writers.

pub mod memory;
pub mod pg;

use async_trait::async_trait;

use aula_core::types::DbId;

use crate::record::{NewVersionRecord, VersionRecord};
use crate::subject::SubjectKind;

/// Storage-level failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another writer persisted this version number first.
    #[error("version {version} already exists for {kind} {subject_id}")]
    DuplicateVersion {
        kind: SubjectKind,
        subject_id: DbId,
        version: i32,
    },

    /// An infrastructure fault in the backing store.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Durable storage for per-subject version record sequences.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a new record, assigning its id and timestamp.
    ///
    /// Must fail with [`StoreError::DuplicateVersion`] if a record with the
    /// same `(kind, subject_id, version)` already exists.
    async fn append(&self, record: NewVersionRecord) -> Result<VersionRecord, StoreError>;

    /// All records for a subject, ordered by version descending.
    async fn list_for_subject(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
    ) -> Result<Vec<VersionRecord>, StoreError>;

    /// Look up a record by its id, across all subject kinds.
    async fn find_by_id(&self, id: DbId) -> Result<Option<VersionRecord>, StoreError>;

    /// The record for a subject at one exact version.
    async fn find_by_version(
        &self,
        kind: SubjectKind,
        subject_id: DbId,
        version: i32,
    ) -> Result<Option<VersionRecord>, StoreError>;

    /// Highest version recorded for a subject, or 0 if none exist.
    async fn latest_version(&self, kind: SubjectKind, subject_id: DbId)
        -> Result<i32, StoreError>;
}
