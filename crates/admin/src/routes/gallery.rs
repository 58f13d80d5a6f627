//! Project gallery management.
//!
//! Every edit follows the same path: inside one transaction, lock the
//! project, load the stored gallery into a [`Gallery`], apply the edit there
//! so the ordering rules are enforced in one place, then write the result
//! back. See [`GalleryRepository::edit`].

use std::iter;

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use keystone_core::gallery::{DragEnd, Gallery, GalleryImage, ImageKey, ReorderOutcome};
use keystone_core::{GalleryImageId, ProjectId};

use crate::db::{GalleryRepository, ProjectRepository};
use crate::error::{AppError, Result};
use crate::services::OutgoingFile;
use crate::services::uploads::validate_file;
use crate::state::AppState;

/// Most files accepted in one upload request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// A project's gallery as returned by every gallery endpoint.
#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub project_id: ProjectId,
    pub feature: Option<ImageKey>,
    pub images: Vec<GalleryImage>,
}

impl GalleryResponse {
    fn new(project_id: ProjectId, gallery: Gallery) -> Self {
        Self {
            project_id,
            feature: gallery.feature().map(|image| image.key),
            images: gallery.into_images(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    #[serde(flatten)]
    pub outcome: ReorderOutcome,
    #[serde(flatten)]
    pub gallery: GalleryResponse,
}

#[derive(Debug, Deserialize)]
pub struct FeatureUpdate {
    /// `None` clears the feature image.
    pub image_id: Option<GalleryImageId>,
}

#[derive(Debug, Deserialize)]
pub struct CaptionUpdate {
    pub caption: Option<String>,
}

async fn ensure_project(state: &AppState, project_id: ProjectId) -> Result<()> {
    if ProjectRepository::new(state.pool()).exists(project_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("project {project_id}")))
    }
}

async fn load_gallery(state: &AppState, project_id: ProjectId) -> Result<Gallery> {
    ensure_project(state, project_id).await?;
    Ok(GalleryRepository::new(state.pool()).load(project_id).await?)
}

/// `GET /api/projects/{id}/gallery`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<GalleryResponse>> {
    let gallery = load_gallery(&state, project_id).await?;
    Ok(Json(GalleryResponse::new(project_id, gallery)))
}

/// `PUT /api/projects/{id}/gallery`
///
/// Persist a gallery the client already reordered. The list must satisfy
/// every gallery rule as submitted and name exactly the stored images.
#[instrument(skip(state, images), fields(count = images.len()))]
pub async fn replace(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(images): Json<Vec<GalleryImage>>,
) -> Result<Json<GalleryResponse>> {
    let gallery = Gallery::from_submitted(images)?;
    if let Some(image) = gallery
        .images()
        .iter()
        .find(|image| image.key.persisted_id().is_none())
    {
        return Err(AppError::BadRequest(format!(
            "image {} must be uploaded before the gallery is saved",
            image.key
        )));
    }

    ensure_project(&state, project_id).await?;
    GalleryRepository::new(state.pool())
        .save_order(project_id, gallery.images())
        .await?;

    tracing::info!(%project_id, "Gallery saved");
    Ok(Json(GalleryResponse::new(project_id, gallery)))
}

/// `POST /api/projects/{id}/gallery/reorder`
///
/// Apply a drag-end event to the stored gallery. Nothing is written when the
/// drop leaves the order unchanged.
#[instrument(skip(state))]
pub async fn reorder(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(event): Json<DragEnd>,
) -> Result<Json<ReorderResponse>> {
    let (gallery, outcome) = GalleryRepository::new(state.pool())
        .edit(project_id, |gallery| {
            gallery
                .apply_drag_end(&event, |images| {
                    tracing::info!(%project_id, count = images.len(), "Gallery reordered");
                })
                .map_err(AppError::from)
        })
        .await?;

    Ok(Json(ReorderResponse {
        outcome,
        gallery: GalleryResponse::new(project_id, gallery),
    }))
}

/// `PUT /api/projects/{id}/gallery/feature`
#[instrument(skip(state))]
pub async fn set_feature(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(update): Json<FeatureUpdate>,
) -> Result<Json<GalleryResponse>> {
    let (gallery, ()) = GalleryRepository::new(state.pool())
        .edit(project_id, |gallery| {
            match update.image_id {
                Some(id) => gallery.set_feature(ImageKey::Persisted(id))?,
                None => gallery.clear_feature(),
            }
            Ok::<_, AppError>(())
        })
        .await?;
    Ok(Json(GalleryResponse::new(project_id, gallery)))
}

/// `PATCH /api/projects/{id}/gallery/{image_id}`
#[instrument(skip(state, update))]
pub async fn update_caption(
    State(state): State<AppState>,
    Path((project_id, image_id)): Path<(ProjectId, GalleryImageId)>,
    Json(update): Json<CaptionUpdate>,
) -> Result<Json<GalleryResponse>> {
    let (gallery, ()) = GalleryRepository::new(state.pool())
        .edit(project_id, |gallery| {
            gallery
                .set_caption(ImageKey::Persisted(image_id), update.caption)
                .map_err(AppError::from)
        })
        .await?;
    Ok(Json(GalleryResponse::new(project_id, gallery)))
}

/// `DELETE /api/projects/{id}/gallery/{image_id}`
///
/// Removes the row, closes the gap in display order, then deletes the file
/// from the upload provider.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((project_id, image_id)): Path<(ProjectId, GalleryImageId)>,
) -> Result<Json<GalleryResponse>> {
    let (gallery, removed) = GalleryRepository::new(state.pool())
        .edit(project_id, |gallery| {
            gallery
                .remove(ImageKey::Persisted(image_id))
                .map_err(AppError::from)
        })
        .await?;

    if let Some(key) = removed.file_key() {
        state.uploads().delete_quietly(&[key.to_owned()]).await;
    }

    tracing::info!(%project_id, %image_id, "Gallery image removed");
    Ok(Json(GalleryResponse::new(project_id, gallery)))
}

/// `POST /api/projects/{id}/gallery/images`
///
/// Multipart form with one or more `file` parts and optional `caption`
/// parts (the n-th caption belongs to the n-th file). Files are checked,
/// sent to the upload provider and appended to the gallery. If saving fails,
/// the files just uploaded are deleted from the provider again.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<GalleryResponse>)> {
    let max_bytes = state.config().max_upload_bytes;
    let mut files = Vec::new();
    let mut captions = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file" | "files") => {
                if files.len() == MAX_FILES_PER_REQUEST {
                    return Err(AppError::BadRequest(format!(
                        "at most {MAX_FILES_PER_REQUEST} files per request"
                    )));
                }
                let file_name = field.file_name().unwrap_or("image").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                let file = OutgoingFile::new(file_name, content_type, bytes.to_vec());
                validate_file(&file.meta, max_bytes)?;
                files.push(file);
            }
            Some("caption") => captions.push(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("no files in request".to_string()));
    }

    let mut gallery = load_gallery(&state, project_id).await?;
    let captions = captions
        .into_iter()
        .map(|caption| Some(caption).filter(|c| !c.trim().is_empty()))
        .chain(iter::repeat(None));
    let keys: Vec<ImageKey> = files
        .iter()
        .zip(captions)
        .map(|(file, caption)| gallery.push_pending(file.meta.clone(), caption))
        .collect();

    let uploaded = state.uploads().upload(files).await?;
    for (key, file) in keys.iter().zip(uploaded) {
        gallery.mark_uploaded(*key, file)?;
    }

    let new_images: Vec<GalleryImage> = keys
        .iter()
        .filter_map(|key| gallery.get(*key).cloned())
        .collect();

    let repo = GalleryRepository::new(state.pool());
    if let Err(e) = repo.append(project_id, &new_images).await {
        let orphaned: Vec<String> = new_images
            .iter()
            .filter_map(|image| image.file_key().map(str::to_owned))
            .collect();
        state.uploads().delete_quietly(&orphaned).await;
        return Err(e.into());
    }

    tracing::info!(%project_id, count = new_images.len(), "Gallery images added");
    let gallery = repo.load(project_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(GalleryResponse::new(project_id, gallery)),
    ))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(err.body_text());
    }
    AppError::BadRequest(err.body_text())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stored(n: i64) -> Gallery {
        Gallery::from_records((1..=n).map(|id| {
            GalleryImage::persisted(
                GalleryImageId::new(id),
                format!("https://cdn.test/{id}.jpg"),
                Some(format!("key-{id}")),
                None,
                u32::try_from(id).unwrap(),
                id == 1,
            )
        }))
    }

    #[test]
    fn test_gallery_response_names_feature() {
        let response = GalleryResponse::new(ProjectId::new(7), stored(3));
        assert_eq!(
            response.feature,
            Some(ImageKey::Persisted(GalleryImageId::new(1)))
        );
        assert_eq!(response.images.len(), 3);
    }

    #[test]
    fn test_reorder_response_json_is_flat() {
        let response = ReorderResponse {
            outcome: ReorderOutcome::Moved { from: 0, to: 2 },
            gallery: GalleryResponse::new(ProjectId::new(7), stored(3)),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "moved");
        assert_eq!(json["to"], 2);
        assert_eq!(json["project_id"], 7);
        assert_eq!(json["images"][0]["display_order"], 1);
    }

    #[test]
    fn test_submitted_gallery_json_passes_rules() {
        let json = serde_json::to_string(stored(2).images()).unwrap();
        let images: Vec<GalleryImage> = serde_json::from_str(&json).unwrap();
        assert!(Gallery::from_submitted(images).is_ok());
    }
}
