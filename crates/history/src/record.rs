//! Version records: the atomic unit of the history ledger.
//!
//! Records are immutable once persisted. The ledger exposes no update or
//! delete operation, so the audit trail itself cannot be rewritten.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use aula_core::roles::Actor;
use aula_core::types::{DbId, FieldMap, Timestamp};

use crate::subject::SubjectKind;

/// What kind of edit produced a version record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
}

impl HistoryAction {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `entity_history` table.
///
/// `current_data` is always `previous_data` overlaid with `changes`; it is
/// derived at snapshot time and never independently authored. `group_key`
/// points at the topic record created in the same coordinator invocation
/// and is `None` for topic records (they anchor the group).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionRecord {
    pub id: DbId,
    pub subject_type: String,
    pub subject_id: DbId,
    pub group_key: Option<DbId>,
    pub version: i32,
    pub action: String,
    pub changes: Option<serde_json::Value>,
    pub previous_data: serde_json::Value,
    pub current_data: serde_json::Value,
    pub edited_by_id: DbId,
    pub edited_by_name: String,
    pub edited_by_role: String,
    pub edited_at: Timestamp,
}

impl VersionRecord {
    /// The record's `current_data` as a field-map.
    ///
    /// Records are only ever written with object snapshots; a non-object
    /// value decodes as an empty map.
    pub fn current_fields(&self) -> FieldMap {
        self.current_data.as_object().cloned().unwrap_or_default()
    }
}

/// Insert payload for a new version record.
///
/// `id` and `edited_at` are assigned by the store at persistence time.
#[derive(Debug, Clone)]
pub struct NewVersionRecord {
    pub kind: SubjectKind,
    pub subject_id: DbId,
    pub group_key: Option<DbId>,
    pub version: i32,
    pub action: HistoryAction,
    pub changes: Option<FieldMap>,
    pub previous_data: FieldMap,
    pub current_data: FieldMap,
    pub edited_by: Actor,
}
