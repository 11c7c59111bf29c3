//! Field-level diff between two entity snapshots.
//!
//! Used by the history ledger's compare operation to report exactly which
//! fields changed between two versions of the same entity. The diff is a
//! total function over bounded field-maps: it never fails and always
//! terminates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::FieldMap;

/// The before/after values of one field that differs between two snapshots.
///
/// `None` means the field was absent on that side; a field present on only
/// one side always counts as a difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
}

/// Compute the field-level differences between two snapshots.
///
/// Takes the union of both key sets and emits an entry for every field
/// whose values are not structurally equal. Equality follows
/// `serde_json::Value`: objects compare key-by-key regardless of insertion
/// order, arrays compare element-by-element in order.
///
/// The result is keyed by field name in lexicographic order, which keeps
/// comparison payloads stable across calls.
pub fn diff_snapshots(previous: &FieldMap, current: &FieldMap) -> BTreeMap<String, FieldChange> {
    let mut differences = BTreeMap::new();

    for field in previous.keys().chain(current.keys()) {
        if differences.contains_key(field) {
            continue;
        }
        let from = previous.get(field);
        let to = current.get(field);
        if from != to {
            differences.insert(
                field.clone(),
                FieldChange {
                    from: from.cloned(),
                    to: to.cloned(),
                },
            );
        }
    }

    differences
}
