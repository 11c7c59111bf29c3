//! Subject kinds and the caller-supplied view of an edited entity.

use serde::{Deserialize, Serialize};

use aula_core::types::{DbId, FieldMap};

/// The kind of entity a version record describes.
///
/// One [`HistoryLedger`](crate::ledger::HistoryLedger) instance exists per
/// kind; the kind also discriminates rows in the `entity_history` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Topic,
    Resource,
    Activity,
}

impl SubjectKind {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Resource => "resource",
            Self::Activity => "activity",
        }
    }

    /// Entity name used in not-found errors for version-number lookups.
    pub fn version_entity(&self) -> &'static str {
        match self {
            Self::Topic => "topic version",
            Self::Resource => "resource version",
            Self::Activity => "activity version",
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The edited entity as the editing workflow sees it: its id plus its
/// current full field-map.
///
/// The field-map doubles as the default `previous_data` when the caller does
/// not supply an explicit before-image. The history engine never reads the
/// upstream entity store itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectState {
    pub id: DbId,
    pub data: FieldMap,
}
