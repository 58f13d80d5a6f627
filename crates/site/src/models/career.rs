use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keystone_core::{Email, EmploymentType};

use super::{MAX_LINE, MAX_TEXT, email, optional, required};

/// An open position as listed on the careers page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobPostingSummary {
    pub slug: String,
    pub title: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub posted_at: DateTime<Utc>,
}

/// An open position with its description rendered to HTML.
#[derive(Debug, Clone, Serialize)]
pub struct JobPostingDetail {
    #[serde(flatten)]
    pub posting: JobPostingSummary,
    pub description_html: String,
}

/// `POST /api/careers/{slug}/apply`
#[derive(Debug, Deserialize)]
pub struct JobApplicationInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}

impl JobApplicationInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field. A resume link must
    /// be an absolute `http(s)` URL.
    pub fn validate(self) -> Result<NewJobApplication, String> {
        let resume_url = optional("resume_url", self.resume_url, 2_000)?;
        if let Some(link) = &resume_url {
            let parsed = url::Url::parse(link).map_err(|_| "resume_url must be a URL".to_string())?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err("resume_url must be an http(s) URL".to_string());
            }
        }

        Ok(NewJobApplication {
            name: required("name", &self.name, MAX_LINE)?,
            email: email(&self.email)?,
            phone: optional("phone", self.phone, 40)?,
            resume_url,
            cover_letter: optional("cover_letter", self.cover_letter, MAX_TEXT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(resume_url: Option<&str>) -> JobApplicationInput {
        JobApplicationInput {
            name: "Sam Okafor".to_string(),
            email: "Sam@Okafor.dev".to_string(),
            phone: None,
            resume_url: resume_url.map(str::to_string),
            cover_letter: None,
        }
    }

    #[test]
    fn test_validate_normalizes_email() {
        let application = input(None).validate();
        assert_eq!(
            application.map(|a| a.email.into_inner()),
            Ok("sam@okafor.dev".to_string())
        );
    }

    #[test]
    fn test_validate_resume_url_scheme() {
        assert!(input(Some("https://files.test/cv.pdf")).validate().is_ok());
        assert!(input(Some("javascript:alert(1)")).validate().is_err());
        assert!(input(Some("not a url")).validate().is_err());
    }
}
