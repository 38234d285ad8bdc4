//! Snapshot and identity endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::errors::AppErrorWithRevision;
use crate::models::{CurrentUser, LinkSnapshot, RevisionInfo};
use crate::AppState;

/// GET /api/me - The signed-in user.
pub async fn get_me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<CurrentUser> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    success(user, revision_id)
}

/// GET /api/snapshot - The user's whole collection.
pub async fn get_snapshot(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<LinkSnapshot> {
    let snapshot = state
        .repo
        .get_snapshot(&user.id)
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    let revision_id = snapshot.revision_id;
    success(snapshot, revision_id)
}

/// GET /api/snapshot/revision - Revision info for change polling.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_info = state
        .repo
        .get_revision_info()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    let revision_id = revision_info.revision_id;
    success(revision_info, revision_id)
}
