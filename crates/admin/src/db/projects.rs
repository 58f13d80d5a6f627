//! Project repository.

use sqlx::PgPool;

use keystone_core::ProjectId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{Project, ProjectInput};

const PROJECT_COLUMNS: &str = "id, slug, title, summary, description, location, category, \
                               completed_on, published, created_at, updated_at";

/// Repository for portfolio projects.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM site.project ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(projects)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM site.project WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(project)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, input: &ProjectInput) -> Result<Project, RepositoryError> {
        sqlx::query_as::<_, Project>(&format!(
            r"
            INSERT INTO site.project
                (slug, title, summary, description, location, category, completed_on, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROJECT_COLUMNS}
            "
        ))
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(&input.summary)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.category)
        .bind(input.completed_on)
        .bind(input.published)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("project slug"))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist and
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: ProjectId,
        input: &ProjectInput,
    ) -> Result<Project, RepositoryError> {
        sqlx::query_as::<_, Project>(&format!(
            r"
            UPDATE site.project
            SET slug = $2, title = $3, summary = $4, description = $5, location = $6,
                category = $7, completed_on = $8, published = $9, updated_at = now()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(&input.summary)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.category)
        .bind(input.completed_on)
        .bind(input.published)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("project slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a project. Its gallery rows go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist.
    pub async fn delete(&self, id: ProjectId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM site.project WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM site.project WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }
}
