//! Preview endpoint.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::engine::normalize;
use crate::errors::AppError;
use crate::models::{CurrentUser, PreviewData, PreviewRequest};
use crate::AppState;

/// POST /api/preview - Look up and normalize metadata for a URL.
///
/// Lookup failures never surface here; they degrade the preview instead.
pub async fn preview_link(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<PreviewRequest>,
) -> ApiResult<PreviewData> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let url = request.url.trim();
    if url.is_empty() {
        return error(
            AppError::Validation("URL is required".to_string()),
            revision_id,
        );
    }

    success(fetch_preview(&state, url).await, revision_id)
}

/// Run the remote lookup and normalize its outcome.
pub(crate) async fn fetch_preview(state: &AppState, url: &str) -> PreviewData {
    let outcome = state.metadata.lookup(url).await;
    if let Err(failure) = &outcome {
        tracing::warn!("Metadata lookup for {} degraded: {}", url, failure);
    }
    normalize(url, outcome)
}
