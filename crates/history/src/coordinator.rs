//! Groups one logical topic edit into a single audit unit.
//!
//! A topic edit may touch nested resources and activities. The coordinator
//! creates the topic version record first, then one record per touched
//! child, tagging each child with the topic record's id (`group_key`) so
//! the whole edit can be traced as one group. The orchestration is
//! deliberately non-transactional: writes are sequential and independent,
//! and a failure partway through leaves the earlier records persisted.
//! Callers needing all-or-nothing semantics must supply their own
//! transaction boundary around the call.

use std::sync::Arc;

use serde::Serialize;

use aula_core::error::CoreError;
use aula_core::roles::Actor;
use aula_core::types::FieldMap;

use crate::ledger::{HistoryLedger, SnapshotRequest};
use crate::record::{HistoryAction, VersionRecord};
use crate::store::HistoryStore;
use crate::subject::{SubjectKind, SubjectState};

/// One touched child entity (resource or activity) within a topic edit.
#[derive(Debug, Clone)]
pub struct ChildChange {
    pub subject: SubjectState,
    pub changes: Option<FieldMap>,
    pub previous_data: Option<FieldMap>,
}

/// A single logical topic edit to be recorded.
#[derive(Debug, Clone)]
pub struct CreateTopicSnapshotCommand {
    pub topic: SubjectState,
    pub action: HistoryAction,
    pub topic_changes: Option<FieldMap>,
    pub previous_topic_data: Option<FieldMap>,
    pub resource_changes: Vec<ChildChange>,
    pub activity_changes: Vec<ChildChange>,
}

/// The records created by one coordinator invocation, child lists in input
/// order.
#[derive(Debug, Serialize)]
pub struct TopicSnapshotSet {
    pub topic_record: VersionRecord,
    pub resource_records: Vec<VersionRecord>,
    pub activity_records: Vec<VersionRecord>,
}

/// Orchestrates the three ledgers for grouped topic edits.
pub struct SnapshotCoordinator {
    topics: HistoryLedger,
    resources: HistoryLedger,
    activities: HistoryLedger,
}

impl SnapshotCoordinator {
    /// Build a coordinator whose three ledgers share one store.
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            topics: HistoryLedger::new(Arc::clone(&store), SubjectKind::Topic),
            resources: HistoryLedger::new(Arc::clone(&store), SubjectKind::Resource),
            activities: HistoryLedger::new(store, SubjectKind::Activity),
        }
    }

    /// The topic ledger, for direct read paths.
    pub fn topics(&self) -> &HistoryLedger {
        &self.topics
    }

    /// The resource ledger, for direct read paths.
    pub fn resources(&self) -> &HistoryLedger {
        &self.resources
    }

    /// The activity ledger, for direct read paths.
    pub fn activities(&self) -> &HistoryLedger {
        &self.activities
    }

    /// Point lookup of one record by id.
    ///
    /// Record ids are global across subject kinds, so any ledger can
    /// resolve them; the topic ledger is used as the entry point.
    pub async fn get_version_by_id(
        &self,
        record_id: aula_core::types::DbId,
        actor: &Actor,
    ) -> Result<VersionRecord, CoreError> {
        self.topics.get_version_by_id(record_id, actor).await
    }

    /// Record one topic edit and its touched children.
    ///
    /// The topic record is durably created before any child record is
    /// attempted, so a child's `group_key` always resolves once the child
    /// itself is visible. Child failures are surfaced without retracting
    /// records created earlier in the same invocation.
    pub async fn execute(
        &self,
        actor: &Actor,
        command: CreateTopicSnapshotCommand,
    ) -> Result<TopicSnapshotSet, CoreError> {
        let topic_record = self
            .topics
            .create_snapshot(
                actor,
                SnapshotRequest {
                    subject: command.topic,
                    action: command.action,
                    changes: command.topic_changes,
                    previous_data: command.previous_topic_data,
                    group_key: None,
                },
            )
            .await?;

        let group_key = topic_record.id;
        tracing::debug!(
            topic_record_id = group_key,
            resources = command.resource_changes.len(),
            activities = command.activity_changes.len(),
            "Recorded topic snapshot, creating child records"
        );

        let mut resource_records = Vec::with_capacity(command.resource_changes.len());
        for change in command.resource_changes {
            let record = self
                .resources
                .create_snapshot(
                    actor,
                    SnapshotRequest {
                        subject: change.subject,
                        action: command.action,
                        changes: change.changes,
                        previous_data: change.previous_data,
                        group_key: Some(group_key),
                    },
                )
                .await?;
            resource_records.push(record);
        }

        let mut activity_records = Vec::with_capacity(command.activity_changes.len());
        for change in command.activity_changes {
            let record = self
                .activities
                .create_snapshot(
                    actor,
                    SnapshotRequest {
                        subject: change.subject,
                        action: command.action,
                        changes: change.changes,
                        previous_data: change.previous_data,
                        group_key: Some(group_key),
                    },
                )
                .await?;
            activity_records.push(record);
        }

        Ok(TopicSnapshotSet {
            topic_record,
            resource_records,
            activity_records,
        })
    }
}
