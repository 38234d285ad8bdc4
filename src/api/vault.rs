//! Vault gate endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::CurrentUser;
use crate::vault::VaultReport;
use crate::AppState;

/// GET /api/vault - Advance the gate and report it.
pub async fn get_vault(State(state): State<AppState>, user: CurrentUser) -> ApiResult<VaultReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    success(state.vault.poll(&user.id).await, revision_id)
}

/// POST /api/vault/open - Start the unlock prompt.
pub async fn open_vault(State(state): State<AppState>, user: CurrentUser) -> ApiResult<VaultReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    success(state.vault.open(&user.id).await, revision_id)
}

/// POST /api/vault/cancel - Dismiss the prompt.
pub async fn cancel_vault(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<VaultReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    success(state.vault.cancel(&user.id).await, revision_id)
}

/// POST /api/vault/lock - Lock the vault again.
pub async fn lock_vault(State(state): State<AppState>, user: CurrentUser) -> ApiResult<VaultReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    success(state.vault.lock(&user.id).await, revision_id)
}
