//! Job postings and the applications they receive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keystone_core::{Email, EmploymentType, JobApplicationId, JobPostingId};

use super::{require, require_slug};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobPosting {
    pub id: JobPostingId,
    pub slug: String,
    pub title: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub description_markdown: String,
    pub is_open: bool,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPostingInput {
    pub slug: String,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub employment_type: EmploymentType,
    pub description_markdown: String,
    #[serde(default = "default_open")]
    pub is_open: bool,
}

const fn default_open() -> bool {
    true
}

impl JobPostingInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        require_slug(&self.slug)?;
        require("title", &self.title)?;
        require("location", &self.location)?;
        require("description_markdown", &self.description_markdown)
    }
}

/// An application submitted from the careers page.
#[derive(Debug, Clone, Serialize)]
pub struct JobApplication {
    pub id: JobApplicationId,
    pub job_posting_id: JobPostingId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let input: JobPostingInput = serde_json::from_str(
            r#"{"slug": "site-carpenter", "title": "Site carpenter",
                "location": "Portland, OR", "description_markdown": "Frame houses."}"#,
        )
        .unwrap();
        assert!(input.is_open);
        assert_eq!(input.employment_type, EmploymentType::FullTime);
        assert!(input.validate().is_ok());
    }
}
