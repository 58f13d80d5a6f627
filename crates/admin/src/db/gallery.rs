//! Gallery persistence.
//!
//! Ordering rules live in [`keystone_core::gallery`]. This module loads rows
//! into a [`Gallery`] and writes whole galleries back.
//!
//! Edits go through [`GalleryRepository::edit`], which locks the parent
//! project row, reads the gallery and writes the result in one transaction.
//! Two editors working on the same gallery are serialized, and the second
//! edit is applied to the first one's result.

use std::collections::HashSet;

use sqlx::{PgConnection, PgExecutor, PgPool};

use keystone_core::gallery::{Gallery, GalleryImage, ImageKey};
use keystone_core::{GalleryImageId, ProjectId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct GalleryImageRow {
    id: GalleryImageId,
    image_url: String,
    file_key: Option<String>,
    caption: Option<String>,
    display_order: i32,
    is_feature: bool,
}

impl TryFrom<GalleryImageRow> for GalleryImage {
    type Error = RepositoryError;

    fn try_from(row: GalleryImageRow) -> Result<Self, Self::Error> {
        let display_order = u32::try_from(row.display_order).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "gallery image {} has negative display order {}",
                row.id, row.display_order
            ))
        })?;

        Ok(Self::persisted(
            row.id,
            row.image_url,
            row.file_key,
            row.caption,
            display_order,
            row.is_feature,
        ))
    }
}

/// Repository for project galleries.
pub struct GalleryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GalleryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load a project's gallery in display order.
    ///
    /// Rows are normalized through [`Gallery::from_records`], so a gallery
    /// with gaps or several feature flags in storage still loads as a valid
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(&self, project_id: ProjectId) -> Result<Gallery, RepositoryError> {
        load_rows(self.pool, project_id).await
    }

    /// Apply `apply` to the stored gallery and persist the result.
    ///
    /// The project row is locked before the gallery is read, so concurrent
    /// edits of one gallery run one after the other. Images dropped by
    /// `apply` are deleted. Nothing is written when `apply` leaves the
    /// gallery as it was, and nothing at all when it fails.
    ///
    /// Returns the gallery after the edit together with `apply`'s value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist,
    /// `RepositoryError::Conflict` if the edit leaves an unsaved image in the
    /// gallery, or the error returned by `apply`.
    pub async fn edit<T, E, F>(&self, project_id: ProjectId, apply: F) -> Result<(Gallery, T), E>
    where
        F: FnOnce(&mut Gallery) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        lock_project(&mut tx, project_id).await?;

        let before = load_rows(&mut *tx, project_id).await?;
        let mut gallery = before.clone();
        let value = apply(&mut gallery)?;

        if let Some(plan) = WritePlan::between(&before, &gallery) {
            if !plan.deleted.is_empty() {
                sqlx::query("DELETE FROM site.gallery_image WHERE project_id = $1 AND id = ANY($2)")
                    .bind(project_id)
                    .bind(&plan.deleted)
                    .execute(&mut *tx)
                    .await
                    .map_err(RepositoryError::from)?;
            }
            write_order(&mut tx, project_id, gallery.images()).await?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;
        Ok((gallery, value))
    }

    /// Append uploaded images after the current last one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist and
    /// `RepositoryError::Conflict` if an image has no uploaded file yet.
    pub async fn append(
        &self,
        project_id: ProjectId,
        images: &[GalleryImage],
    ) -> Result<Vec<GalleryImageId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_project(&mut tx, project_id).await?;

        let last: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(display_order), 0) FROM site.gallery_image WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut ids = Vec::with_capacity(images.len());
        for (offset, image) in images.iter().enumerate() {
            let url = image.image_url().ok_or_else(|| {
                RepositoryError::Conflict(format!("image {} has not been uploaded", image.key))
            })?;
            let display_order = i32::try_from(offset)
                .ok()
                .and_then(|o| last.checked_add(o + 1))
                .ok_or_else(|| RepositoryError::Conflict("gallery is full".to_owned()))?;

            let id: GalleryImageId = sqlx::query_scalar(
                r"
                INSERT INTO site.gallery_image
                    (project_id, image_url, file_key, caption, display_order, is_feature)
                VALUES ($1, $2, $3, $4, $5, FALSE)
                RETURNING id
                ",
            )
            .bind(project_id)
            .bind(url)
            .bind(image.file_key())
            .bind(&image.caption)
            .bind(display_order)
            .fetch_one(&mut *tx)
            .await?;
            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    /// Persist order, feature flag and captions for a whole gallery.
    ///
    /// `images` must name exactly the images currently stored for the
    /// project. Anything else means the gallery changed since the caller
    /// loaded it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist and
    /// `RepositoryError::Conflict` if the stored gallery differs from `images`.
    pub async fn save_order(
        &self,
        project_id: ProjectId,
        images: &[GalleryImage],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_project(&mut tx, project_id).await?;
        write_order(&mut tx, project_id, images).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Which of `keys` are still used by some gallery image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn referenced_keys(&self, keys: &[String]) -> Result<HashSet<String>, RepositoryError> {
        if keys.is_empty() {
            return Ok(HashSet::new());
        }

        let found: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT file_key FROM site.gallery_image WHERE file_key = ANY($1)",
        )
        .bind(keys)
        .fetch_all(self.pool)
        .await?;
        Ok(found.into_iter().collect())
    }
}

/// What an edit changed, as far as storage is concerned.
#[derive(Debug, PartialEq, Eq)]
struct WritePlan {
    /// Stored images the edit removed.
    deleted: Vec<i64>,
}

impl WritePlan {
    /// `None` when `after` equals `before` and nothing has to be written.
    fn between(before: &Gallery, after: &Gallery) -> Option<Self> {
        if before == after {
            return None;
        }

        let kept: HashSet<ImageKey> = after.images().iter().map(|image| image.key).collect();
        let deleted = before
            .images()
            .iter()
            .filter(|image| !kept.contains(&image.key))
            .filter_map(|image| image.key.persisted_id())
            .map(GalleryImageId::get)
            .collect();
        Some(Self { deleted })
    }
}

async fn load_rows<'e>(
    executor: impl PgExecutor<'e>,
    project_id: ProjectId,
) -> Result<Gallery, RepositoryError> {
    let rows = sqlx::query_as::<_, GalleryImageRow>(
        r"
        SELECT id, image_url, file_key, caption, display_order, is_feature
        FROM site.gallery_image
        WHERE project_id = $1
        ORDER BY display_order, id
        ",
    )
    .bind(project_id)
    .fetch_all(executor)
    .await?;

    let images = rows
        .into_iter()
        .map(GalleryImage::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Gallery::from_records(images))
}

async fn lock_project(conn: &mut PgConnection, project_id: ProjectId) -> Result<(), RepositoryError> {
    sqlx::query("SELECT id FROM site.project WHERE id = $1 FOR UPDATE")
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|_| ())
        .ok_or(RepositoryError::NotFound)
}

async fn write_order(
    conn: &mut PgConnection,
    project_id: ProjectId,
    images: &[GalleryImage],
) -> Result<(), RepositoryError> {
    let stored: HashSet<GalleryImageId> =
        sqlx::query_scalar("SELECT id FROM site.gallery_image WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .collect();

    let mut ids = Vec::with_capacity(images.len());
    let mut orders = Vec::with_capacity(images.len());
    let mut features = Vec::with_capacity(images.len());
    let mut captions = Vec::with_capacity(images.len());

    for image in images {
        let ImageKey::Persisted(id) = image.key else {
            return Err(RepositoryError::Conflict(format!(
                "image {} has not been saved yet",
                image.key
            )));
        };
        let order = i32::try_from(image.display_order()).map_err(|_| {
            RepositoryError::Conflict(format!("display order {} is too large", image.display_order()))
        })?;

        ids.push(id.get());
        orders.push(order);
        features.push(image.is_feature());
        captions.push(image.caption.clone());
    }

    let submitted: HashSet<GalleryImageId> = ids.iter().copied().map(GalleryImageId::new).collect();
    if submitted != stored || submitted.len() != images.len() {
        return Err(RepositoryError::Conflict(
            "gallery was changed by another request, reload and try again".to_owned(),
        ));
    }

    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        UPDATE site.gallery_image AS g
        SET display_order = u.display_order,
            is_feature = u.is_feature,
            caption = u.caption,
            updated_at = now()
        FROM UNNEST($2::BIGINT[], $3::INT[], $4::BOOL[], $5::TEXT[])
            AS u(id, display_order, is_feature, caption)
        WHERE g.id = u.id AND g.project_id = $1
        ",
    )
    .bind(project_id)
    .bind(&ids)
    .bind(&orders)
    .bind(&features)
    .bind(&captions)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(id: i64, display_order: i32, is_feature: bool) -> GalleryImageRow {
        GalleryImageRow {
            id: GalleryImageId::new(id),
            image_url: format!("https://cdn.test/{id}.jpg"),
            file_key: Some(format!("key-{id}")),
            caption: Some("  ".to_owned()),
            display_order,
            is_feature,
        }
    }

    #[test]
    fn test_row_conversion() {
        let image = GalleryImage::try_from(row(4, 2, true)).unwrap();
        assert_eq!(image.key, ImageKey::Persisted(GalleryImageId::new(4)));
        assert_eq!(image.display_order(), 2);
        assert!(image.is_feature());
        assert_eq!(image.file_key(), Some("key-4"));
        assert_eq!(image.caption, None);
    }

    fn stored(n: i64) -> Gallery {
        Gallery::from_records((1..=n).map(|id| {
            GalleryImage::try_from(row(id, i32::try_from(id).unwrap(), false)).unwrap()
        }))
    }

    fn persisted(id: i64) -> ImageKey {
        ImageKey::Persisted(GalleryImageId::new(id))
    }

    #[test]
    fn test_unchanged_gallery_writes_nothing() {
        let gallery = stored(3);
        assert_eq!(WritePlan::between(&gallery, &gallery.clone()), None);

        let mut noop = gallery.clone();
        noop.move_item(1, 1).unwrap();
        assert_eq!(WritePlan::between(&gallery, &noop), None);
    }

    #[test]
    fn test_later_edit_builds_on_earlier_one() {
        // Each edit starts from what the previous one left in storage.
        let stored_first = stored(3);
        let mut after_feature = stored_first.clone();
        after_feature.set_feature(persisted(2)).unwrap();

        let mut after_caption = after_feature.clone();
        after_caption
            .set_caption(persisted(3), Some("Back porch".to_owned()))
            .unwrap();

        let plan = WritePlan::between(&after_feature, &after_caption).unwrap();
        assert!(plan.deleted.is_empty());
        assert_eq!(after_caption.feature().unwrap().key, persisted(2));
        assert_eq!(
            after_caption.get(persisted(3)).unwrap().caption.as_deref(),
            Some("Back porch")
        );
    }

    #[test]
    fn test_removed_image_is_deleted() {
        let before = stored(3);
        let mut after = before.clone();
        after.remove(persisted(2)).unwrap();

        let plan = WritePlan::between(&before, &after).unwrap();
        assert_eq!(plan.deleted, vec![2]);
    }

    #[test]
    fn test_negative_order_is_corruption() {
        let err = GalleryImage::try_from(row(1, -1, false)).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
