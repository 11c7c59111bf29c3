//! Aula core domain logic.
//!
//! This crate holds the pure, dependency-free building blocks of the
//! content-history subsystem: shared types, the error taxonomy, user roles,
//! the history access rule, the field-level diff, and the snapshot merge
//! rule. It has no knowledge of HTTP or the database so it can be used by
//! the API layer, the history ledger, and any future CLI tooling alike.

pub mod access;
pub mod diff;
pub mod error;
pub mod roles;
pub mod snapshot;
pub mod types;
