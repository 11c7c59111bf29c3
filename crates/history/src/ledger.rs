//! The append-only version ledger, one instance per subject kind.
//!
//! All four read/write operations run the same authorization check
//! ([`aula_core::access::authorize_history_access`]) before touching the
//! store, so a denied caller can never observe or produce a record.

use std::sync::Arc;

use serde::Serialize;

use aula_core::access::authorize_history_access;
use aula_core::diff::{diff_snapshots, FieldChange};
use aula_core::error::CoreError;
use aula_core::roles::Actor;
use aula_core::snapshot::merge_snapshot;
use aula_core::types::{DbId, FieldMap};

use crate::record::{HistoryAction, NewVersionRecord, VersionRecord};
use crate::store::{HistoryStore, StoreError};
use crate::subject::{SubjectKind, SubjectState};

/// Upper bound on read-then-insert attempts when concurrent writers race on
/// the same subject's next version number. Each failed attempt corresponds
/// to another writer's success, so a writer contending with N others needs
/// at most N+1 attempts.
const MAX_VERSION_ATTEMPTS: usize = 8;

/// A snapshot creation request.
///
/// `previous_data` defaults to the subject's current field-map when absent;
/// `group_key` is set by the coordinator on child records and stays `None`
/// for topic records.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    pub subject: SubjectState,
    pub action: HistoryAction,
    pub changes: Option<FieldMap>,
    pub previous_data: Option<FieldMap>,
    pub group_key: Option<DbId>,
}

/// Result of comparing two versions of the same subject.
#[derive(Debug, Serialize)]
pub struct VersionComparison {
    pub subject_id: DbId,
    pub record_a: VersionRecord,
    pub record_b: VersionRecord,
    pub differences: std::collections::BTreeMap<String, FieldChange>,
}

/// Append-only version sequence for one subject kind.
#[derive(Clone)]
pub struct HistoryLedger {
    store: Arc<dyn HistoryStore>,
    kind: SubjectKind,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn HistoryStore>, kind: SubjectKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// Record one edit as a new immutable version of the subject.
    ///
    /// Assigns `version = latest + 1` and persists `previous_data` overlaid
    /// with `changes` as the resulting state. When another writer wins the
    /// race for that version number, the unique constraint rejects the
    /// insert and the read-then-insert sequence is retried with a fresh
    /// version; persistent contention surfaces as `CoreError::Conflict`.
    pub async fn create_snapshot(
        &self,
        actor: &Actor,
        request: SnapshotRequest,
    ) -> Result<VersionRecord, CoreError> {
        authorize_history_access(actor.role)?;

        let previous_data = request
            .previous_data
            .unwrap_or_else(|| request.subject.data.clone());

        if previous_data.is_empty() && request.changes.as_ref().map_or(true, |c| c.is_empty()) {
            return Err(CoreError::Validation(format!(
                "Cannot snapshot {} {}: no previous data and no changes supplied",
                self.kind, request.subject.id
            )));
        }

        let current_data = merge_snapshot(&previous_data, request.changes.as_ref());

        for attempt in 1..=MAX_VERSION_ATTEMPTS {
            let version = self
                .store
                .latest_version(self.kind, request.subject.id)
                .await
                .map_err(|e| self.store_fault(e))?
                + 1;

            let result = self
                .store
                .append(NewVersionRecord {
                    kind: self.kind,
                    subject_id: request.subject.id,
                    group_key: request.group_key,
                    version,
                    action: request.action,
                    changes: request.changes.clone(),
                    previous_data: previous_data.clone(),
                    current_data: current_data.clone(),
                    edited_by: actor.clone(),
                })
                .await;

            match result {
                Ok(record) => {
                    tracing::debug!(
                        kind = %self.kind,
                        subject_id = request.subject.id,
                        version = record.version,
                        action = %request.action,
                        "Created version record"
                    );
                    return Ok(record);
                }
                Err(StoreError::DuplicateVersion { version, .. }) => {
                    tracing::warn!(
                        kind = %self.kind,
                        subject_id = request.subject.id,
                        version,
                        attempt,
                        "Lost version race, retrying"
                    );
                }
                Err(other) => return Err(self.store_fault(other)),
            }
        }

        Err(CoreError::Conflict(format!(
            "Could not assign a version for {} {} after {MAX_VERSION_ATTEMPTS} attempts",
            self.kind, request.subject.id
        )))
    }

    /// All versions of a subject, newest first. Empty if never snapshotted.
    pub async fn get_history(
        &self,
        subject_id: DbId,
        actor: &Actor,
    ) -> Result<Vec<VersionRecord>, CoreError> {
        authorize_history_access(actor.role)?;
        self.store
            .list_for_subject(self.kind, subject_id)
            .await
            .map_err(|e| self.store_fault(e))
    }

    /// One record by its id.
    ///
    /// Record ids are assigned from a single sequence across all subject
    /// kinds, so the lookup is not filtered by this ledger's kind.
    pub async fn get_version_by_id(
        &self,
        record_id: DbId,
        actor: &Actor,
    ) -> Result<VersionRecord, CoreError> {
        authorize_history_access(actor.role)?;
        self.store
            .find_by_id(record_id)
            .await
            .map_err(|e| self.store_fault(e))?
            .ok_or(CoreError::NotFound {
                entity: "history record",
                id: record_id,
            })
    }

    /// Field-level differences between two exact versions of a subject.
    ///
    /// Argument order is caller-defined; `differences` reports
    /// `from = value in A`, `to = value in B` per differing field.
    pub async fn compare_versions(
        &self,
        subject_id: DbId,
        version_a: i32,
        version_b: i32,
        actor: &Actor,
    ) -> Result<VersionComparison, CoreError> {
        authorize_history_access(actor.role)?;

        let record_a = self.fetch_version(subject_id, version_a).await?;
        let record_b = self.fetch_version(subject_id, version_b).await?;

        let differences = diff_snapshots(&record_a.current_fields(), &record_b.current_fields());

        Ok(VersionComparison {
            subject_id,
            record_a,
            record_b,
            differences,
        })
    }

    async fn fetch_version(
        &self,
        subject_id: DbId,
        version: i32,
    ) -> Result<VersionRecord, CoreError> {
        self.store
            .find_by_version(self.kind, subject_id, version)
            .await
            .map_err(|e| self.store_fault(e))?
            .ok_or(CoreError::NotFound {
                entity: self.kind.version_entity(),
                id: DbId::from(version),
            })
    }

    fn store_fault(&self, err: StoreError) -> CoreError {
        match err {
            StoreError::DuplicateVersion {
                kind,
                subject_id,
                version,
            } => CoreError::Conflict(format!(
                "version {version} already exists for {kind} {subject_id}"
            )),
            StoreError::Backend(e) => {
                tracing::error!(kind = %self.kind, error = %e, "History store failure");
                CoreError::Internal(format!("history store failure: {e}"))
            }
        }
    }
}
