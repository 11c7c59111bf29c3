//! Handlers for the content versioning / audit-snapshot endpoints.
//!
//! Read paths go straight to the relevant ledger; the snapshot write path
//! goes through the coordinator so one logical topic edit (topic plus any
//! touched resources/activities) is recorded as one traced group.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use aula_core::types::{DbId, FieldMap};
use aula_history::{
    ChildChange, CreateTopicSnapshotCommand, HistoryAction, HistoryLedger, SubjectState,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Request / query parameter types
-------------------------------------------------------------------------- */

/// Query parameters for version comparison.
#[derive(Debug, Deserialize, Validate)]
pub struct CompareParams {
    /// Version number on the "from" side of the diff.
    #[validate(range(min = 1))]
    pub from: i32,
    /// Version number on the "to" side of the diff.
    #[validate(range(min = 1))]
    pub to: i32,
}

/// One touched child entity in a snapshot request.
#[derive(Debug, Deserialize)]
pub struct ChildChangeRequest {
    pub id: DbId,
    /// The child's current full field-map.
    pub data: FieldMap,
    pub changes: Option<FieldMap>,
    pub previous_data: Option<FieldMap>,
}

/// Body of `POST /topics/{id}/snapshot`.
///
/// The editing workflow calls this after persisting the actual entity
/// change; `data` is the topic's full field-map as that workflow sees it.
#[derive(Debug, Deserialize)]
pub struct CreateTopicSnapshotRequest {
    pub action: HistoryAction,
    pub data: FieldMap,
    pub changes: Option<FieldMap>,
    pub previous_data: Option<FieldMap>,
    #[serde(default)]
    pub resources: Vec<ChildChangeRequest>,
    #[serde(default)]
    pub activities: Vec<ChildChangeRequest>,
}

impl ChildChangeRequest {
    fn into_change(self) -> ChildChange {
        ChildChange {
            subject: SubjectState {
                id: self.id,
                data: self.data,
            },
            changes: self.changes,
            previous_data: self.previous_data,
        }
    }
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// List a subject's history through the given ledger.
async fn list_history(
    ledger: &HistoryLedger,
    subject_id: DbId,
    auth: &AuthUser,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor()?;
    let records = ledger.get_history(subject_id, &actor).await?;
    Ok(Json(DataResponse { data: records }))
}

/// Compare two versions of a subject through the given ledger.
async fn compare_history(
    ledger: &HistoryLedger,
    subject_id: DbId,
    params: CompareParams,
    auth: &AuthUser,
) -> AppResult<impl IntoResponse> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let actor = auth.actor()?;
    let comparison = ledger
        .compare_versions(subject_id, params.from, params.to, &actor)
        .await?;
    Ok(Json(DataResponse { data: comparison }))
}

/* --------------------------------------------------------------------------
Topic history
-------------------------------------------------------------------------- */

/// GET /topics/{id}/history
///
/// All versions of a topic, newest first.
pub async fn get_topic_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    list_history(state.history.topics(), topic_id, &auth).await
}

/// GET /topics/{id}/history/compare?from=X&to=Y
pub async fn compare_topic_versions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    compare_history(state.history.topics(), topic_id, params, &auth).await
}

/// POST /topics/{id}/snapshot
///
/// Record one logical topic edit (and any touched resources/activities) as
/// a grouped set of version records.
pub async fn create_topic_snapshot(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    Json(input): Json<CreateTopicSnapshotRequest>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor()?;

    let command = CreateTopicSnapshotCommand {
        topic: SubjectState {
            id: topic_id,
            data: input.data,
        },
        action: input.action,
        topic_changes: input.changes,
        previous_topic_data: input.previous_data,
        resource_changes: input
            .resources
            .into_iter()
            .map(ChildChangeRequest::into_change)
            .collect(),
        activity_changes: input
            .activities
            .into_iter()
            .map(ChildChangeRequest::into_change)
            .collect(),
    };

    let result = state.history.execute(&actor, command).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/* --------------------------------------------------------------------------
Resource / activity history
-------------------------------------------------------------------------- */

/// GET /resources/{id}/history
pub async fn get_resource_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(resource_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    list_history(state.history.resources(), resource_id, &auth).await
}

/// GET /resources/{id}/history/compare?from=X&to=Y
pub async fn compare_resource_versions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(resource_id): Path<DbId>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    compare_history(state.history.resources(), resource_id, params, &auth).await
}

/// GET /activities/{id}/history
pub async fn get_activity_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(activity_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    list_history(state.history.activities(), activity_id, &auth).await
}

/// GET /activities/{id}/history/compare?from=X&to=Y
pub async fn compare_activity_versions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(activity_id): Path<DbId>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    compare_history(state.history.activities(), activity_id, params, &auth).await
}

/* --------------------------------------------------------------------------
Point lookup
-------------------------------------------------------------------------- */

/// GET /history/{record_id}
///
/// One version record by its id, whatever subject kind it belongs to.
pub async fn get_version_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(record_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor()?;
    let record = state.history.get_version_by_id(record_id, &actor).await?;
    Ok(Json(DataResponse { data: record }))
}
