//! Route definitions for the content history and snapshot feature.
//!
//! Registered under `/api/v1`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Content history routes.
///
/// ```text
/// GET  /topics/{id}/history               get_topic_history
/// GET  /topics/{id}/history/compare       compare_topic_versions
/// POST /topics/{id}/snapshot              create_topic_snapshot
/// GET  /resources/{id}/history            get_resource_history
/// GET  /resources/{id}/history/compare    compare_resource_versions
/// GET  /activities/{id}/history           get_activity_history
/// GET  /activities/{id}/history/compare   compare_activity_versions
/// GET  /history/{record_id}               get_version_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/topics/{id}/history", get(history::get_topic_history))
        .route(
            "/topics/{id}/history/compare",
            get(history::compare_topic_versions),
        )
        .route("/topics/{id}/snapshot", post(history::create_topic_snapshot))
        .route("/resources/{id}/history", get(history::get_resource_history))
        .route(
            "/resources/{id}/history/compare",
            get(history::compare_resource_versions),
        )
        .route(
            "/activities/{id}/history",
            get(history::get_activity_history),
        )
        .route(
            "/activities/{id}/history/compare",
            get(history::compare_activity_versions),
        )
        .route("/history/{record_id}", get(history::get_version_by_id))
}
