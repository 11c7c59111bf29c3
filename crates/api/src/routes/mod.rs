pub mod health;
pub mod history;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /topics/{id}/history              topic version ledger
/// /topics/{id}/history/compare      field-level diff between two versions
/// /topics/{id}/snapshot             record a topic snapshot (with children)
/// /resources/{id}/history           resource version ledger
/// /resources/{id}/history/compare
/// /activities/{id}/history          activity version ledger
/// /activities/{id}/history/compare
/// /history/{record_id}              single record lookup by ledger id
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(history::router())
}
