//! Aula content versioning and audit-snapshot engine.
//!
//! Every edit to a topic and its nested resources/activities is recorded as
//! an immutable, per-entity-numbered version record. This crate provides:
//!
//! - [`VersionRecord`] -- one numbered audit entry (before/after snapshots,
//!   the asserted change set, and the denormalized editing user).
//! - [`HistoryStore`] -- the persistence seam, with a Postgres
//!   implementation ([`PgHistoryStore`]) and an in-memory one
//!   ([`MemoryHistoryStore`]) for tests and local tooling.
//! - [`HistoryLedger`] -- the append-only ledger algorithm, instantiated
//!   once per subject kind (topic, resource, activity).
//! - [`SnapshotCoordinator`] -- groups one logical topic edit together with
//!   the child records it touched into a single audit unit.

pub mod coordinator;
pub mod ledger;
pub mod record;
pub mod store;
pub mod subject;

pub use coordinator::{ChildChange, CreateTopicSnapshotCommand, SnapshotCoordinator, TopicSnapshotSet};
pub use ledger::{HistoryLedger, SnapshotRequest, VersionComparison};
pub use record::{HistoryAction, NewVersionRecord, VersionRecord};
pub use store::memory::MemoryHistoryStore;
pub use store::pg::PgHistoryStore;
pub use store::{HistoryStore, StoreError};
pub use subject::{SubjectKind, SubjectState};
