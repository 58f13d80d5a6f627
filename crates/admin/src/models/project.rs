//! Portfolio projects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use keystone_core::ProjectId;

use super::{require, require_slug};

/// A portfolio project. Its images live in the project's gallery.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub completed_on: Option<NaiveDate>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub completed_on: Option<NaiveDate>,
    #[serde(default)]
    pub published: bool,
}

impl ProjectInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        require_slug(&self.slug)?;
        require("title", &self.title)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_payload() {
        let input: ProjectInput =
            serde_json::from_str(r#"{"slug": "lakeview-deck", "title": "Lakeview deck"}"#).unwrap();
        assert!(input.validate().is_ok());
        assert!(!input.published);
        assert_eq!(input.summary, "");
    }

    #[test]
    fn test_rejects_bad_slug() {
        let input: ProjectInput =
            serde_json::from_str(r#"{"slug": "Lakeview Deck", "title": "Lakeview deck"}"#).unwrap();
        assert!(input.validate().unwrap_err().contains("slug"));
    }
}
