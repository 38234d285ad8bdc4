//! Link API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use super::preview::fetch_preview;
use super::{error, success, ApiResult};
use crate::engine::{compute_visible, tag_counts};
use crate::errors::AppError;
use crate::models::{
    CreateLinkRequest, CurrentUser, LinkItem, TagCount, UpdateLinkRequest, ViewQuery,
};
use crate::AppState;

/// Result of emptying the trash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyTrashResponse {
    pub deleted: u64,
}

/// GET /api/links - Links visible under the requested view.
pub async fn list_links(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ViewQuery>,
) -> ApiResult<Vec<LinkItem>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let unlocked = state.vault.visit(&user.id, query.tag.as_deref()).await;
    let spec = query.into_spec(unlocked);

    match state.repo.list_links(&user.id).await {
        Ok(links) => success(compute_visible(&links, &spec), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/links/:id - Get a single link.
pub async fn get_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<LinkItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_link(&user.id, &id).await {
        Ok(Some(link)) => success(link, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Link {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/links - Save a link.
pub async fn create_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateLinkRequest>,
) -> ApiResult<LinkItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let url = request.url.trim();
    if url.is_empty() {
        return error(
            AppError::Validation("URL is required".to_string()),
            revision_id,
        );
    }

    let preview = match request.preview {
        Some(preview) => preview,
        None => fetch_preview(&state, url).await,
    };
    if preview.title.trim().is_empty() {
        return error(
            AppError::Validation("Preview title is required".to_string()),
            revision_id,
        );
    }

    let is_private = request.is_private.unwrap_or(false);
    match state
        .repo
        .create_link(&user.id, url, &preview, is_private)
        .await
    {
        Ok(link) => {
            tracing::info!("User {} saved link {} ({})", user.id, link.id, preview.domain);
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(link, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/links/:id - Update title, description, tags or status flags.
pub async fn update_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateLinkRequest>,
) -> ApiResult<LinkItem> {
    apply_update(&state, &user, &id, &request).await
}

/// POST /api/links/:id/trash - Move a link to the trash.
pub async fn trash_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<LinkItem> {
    apply_update(&state, &user, &id, &UpdateLinkRequest::trash(true)).await
}

/// POST /api/links/:id/restore - Take a link out of the trash.
pub async fn restore_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<LinkItem> {
    apply_update(&state, &user, &id, &UpdateLinkRequest::trash(false)).await
}

/// DELETE /api/links/:id - Delete a link permanently.
pub async fn delete_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_link(&user.id, &id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/trash - Permanently delete everything in the trash.
pub async fn empty_trash(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<EmptyTrashResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.empty_trash(&user.id).await {
        Ok(deleted) => {
            tracing::info!("User {} emptied trash ({} links)", user.id, deleted);
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(EmptyTrashResponse { deleted }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/tags - Tag usage across the user's regular links.
pub async fn list_tags(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Vec<TagCount>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_links(&user.id).await {
        Ok(links) => success(tag_counts(&links), revision_id),
        Err(e) => error(e, revision_id),
    }
}

async fn apply_update(
    state: &AppState,
    user: &CurrentUser,
    id: &str,
    request: &UpdateLinkRequest,
) -> ApiResult<LinkItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if matches!(&request.title, Some(title) if title.trim().is_empty()) {
        return error(
            AppError::Validation("Title cannot be empty".to_string()),
            revision_id,
        );
    }

    match state.repo.update_link(&user.id, id, request).await {
        Ok(link) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(link, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
