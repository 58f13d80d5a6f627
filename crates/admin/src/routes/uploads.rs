//! Upload provider housekeeping.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::GalleryRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Most keys accepted in one cleanup request.
const MAX_CLEANUP_KEYS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub file_keys: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CleanupResponse {
    pub deleted: Vec<String>,
    /// Keys still referenced by a gallery image.
    pub kept: Vec<String>,
}

/// Split `keys` into orphans and keys some gallery still uses.
fn partition(
    keys: Vec<String>,
    referenced: &std::collections::HashSet<String>,
) -> CleanupResponse {
    let (kept, deleted) = keys.into_iter().partition(|key| referenced.contains(key));
    CleanupResponse { deleted, kept }
}

/// `POST /api/uploads/cleanup`
///
/// Delete provider files the client uploaded but never saved. Keys that a
/// gallery image references are left alone.
#[instrument(skip(state, request), fields(count = request.file_keys.len()))]
pub async fn cleanup(
    State(state): State<AppState>,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<CleanupResponse>> {
    let mut keys = request.file_keys;
    keys.retain(|key| !key.trim().is_empty());
    keys.sort();
    keys.dedup();

    if keys.len() > MAX_CLEANUP_KEYS {
        return Err(AppError::BadRequest(format!(
            "at most {MAX_CLEANUP_KEYS} keys per request"
        )));
    }

    let referenced = GalleryRepository::new(state.pool())
        .referenced_keys(&keys)
        .await?;
    let response = partition(keys, &referenced);

    if !response.deleted.is_empty() {
        state.uploads().delete(&response.deleted).await?;
        tracing::info!(count = response.deleted.len(), "Orphaned uploads deleted");
    }

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_keeps_referenced() {
        let referenced = ["b".to_string()].into_iter().collect();
        let response = partition(vec!["a".into(), "b".into(), "c".into()], &referenced);
        assert_eq!(response.deleted, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(response.kept, vec!["b".to_string()]);
    }
}
