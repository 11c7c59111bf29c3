//! Snapshot merge rule shared by every history ledger instance.
//!
//! A version record stores the entity as it was before an edit
//! (`previous_data`), the caller-asserted partial change set (`changes`),
//! and the resulting state (`current_data`). The resulting state is always
//! derived here, never authored independently.

use crate::types::FieldMap;

/// Overlay `changes` onto `previous` (shallow merge).
///
/// Fields named in `changes` replace the previous value wholesale; nested
/// objects are not merged recursively. With no changes the result equals
/// `previous` unchanged.
pub fn merge_snapshot(previous: &FieldMap, changes: Option<&FieldMap>) -> FieldMap {
    let mut current = previous.clone();
    if let Some(changes) = changes {
        for (field, value) in changes {
            current.insert(field.clone(), value.clone());
        }
    }
    current
}
