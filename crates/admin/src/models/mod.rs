//! Domain models for the back-office.
//!
//! Each entity comes in two shapes: the stored record returned by the API,
//! and an `*Input` payload accepted on create/update. Inputs validate
//! themselves before any query runs.

pub mod career;
pub mod inbox;
pub mod post;
pub mod project;

use std::sync::LazyLock;

use regex::Regex;

pub use career::{JobApplication, JobPosting, JobPostingInput};
pub use inbox::{Message, QuoteRequest, Testimonial};
pub use post::{BlogPost, BlogPostInput};
pub use project::{Project, ProjectInput};

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex"));

/// Longest slug accepted in a URL.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Lowercase words joined by single hyphens.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LENGTH && SLUG_RE.is_match(slug)
}

/// Reject blank required text fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

pub(crate) fn require_slug(slug: &str) -> Result<(), String> {
    if !is_valid_slug(slug) {
        return Err(format!(
            "slug must be lowercase letters, digits and single hyphens (got {slug:?})"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs() {
        assert!(is_valid_slug("kitchen-remodel-2024"));
        assert!(is_valid_slug("deck"));
        assert!(!is_valid_slug("Kitchen"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }

    #[test]
    fn test_require() {
        assert!(require("title", "  ").is_err());
        assert!(require("title", "Deck").is_ok());
    }
}
