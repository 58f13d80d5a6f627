//! Published projects and their galleries.

use sqlx::PgPool;

use keystone_core::GalleryImageId;
use keystone_core::gallery::{Gallery, GalleryImage};

use super::RepositoryError;
use crate::models::{GalleryPhoto, ProjectDetail, ProjectSummary};

const SUMMARY_SELECT: &str = r"
    SELECT p.id, p.slug, p.title, p.summary, p.location, p.category, p.completed_on,
           cover.image_url AS cover_image_url
    FROM site.project p
    LEFT JOIN LATERAL (
        SELECT g.image_url
        FROM site.gallery_image g
        WHERE g.project_id = p.id
        ORDER BY g.is_feature DESC, g.display_order, g.id
        LIMIT 1
    ) cover ON true
    WHERE p.published
";

#[derive(Debug, sqlx::FromRow)]
struct GalleryImageRow {
    id: GalleryImageId,
    image_url: String,
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
            None,
            row.caption,
            display_order,
            row.is_feature,
        ))
    }
}

/// Read access to the public portfolio.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published projects, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<ProjectSummary>, RepositoryError> {
        let projects = sqlx::query_as::<_, ProjectSummary>(&format!(
            "{SUMMARY_SELECT} ORDER BY p.completed_on DESC NULLS LAST, p.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(projects)
    }

    /// A published project with its gallery in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored order is negative.
    pub async fn get_published(&self, slug: &str) -> Result<Option<ProjectDetail>, RepositoryError> {
        let Some((project, description)) = self.summary_with_description(slug).await? else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, GalleryImageRow>(
            r"
            SELECT id, image_url, caption, display_order, is_feature
            FROM site.gallery_image
            WHERE project_id = $1
            ORDER BY display_order, id
            ",
        )
        .bind(project.id)
        .fetch_all(self.pool)
        .await?;

        let images = rows
            .into_iter()
            .map(GalleryImage::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let gallery = Gallery::from_records(images);

        Ok(Some(ProjectDetail {
            project,
            description,
            gallery: GalleryPhoto::from_gallery(&gallery),
        }))
    }

    async fn summary_with_description(
        &self,
        slug: &str,
    ) -> Result<Option<(ProjectSummary, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            summary: ProjectSummary,
            description: String,
        }

        let row = sqlx::query_as::<_, Row>(&format!(
            r"
            SELECT s.*, p.description
            FROM ({SUMMARY_SELECT} AND p.slug = $1) s
            JOIN site.project p ON p.id = s.id
            "
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| (row.summary, row.description)))
    }
}
