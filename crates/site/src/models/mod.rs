//! Public view types and form submissions.
//!
//! Submissions arrive as loose `*Input` structs and are turned into `New*`
//! values by `validate`, which trims fields, enforces limits and parses the
//! email address. Handlers never touch the database with an unvalidated
//! payload.

use keystone_core::Email;

pub mod career;
pub mod lead;
pub mod post;
pub mod project;
pub mod testimonial;

pub use career::{JobApplicationInput, JobPostingDetail, JobPostingSummary, NewJobApplication};
pub use lead::{
    ContactInput, NewContactMessage, NewQuoteRequest, NewsletterSignup, QuoteRequestInput,
    Subscription,
};
pub use post::{PostDetail, PostSummary};
pub use project::{GalleryPhoto, ProjectDetail, ProjectSummary};
pub use testimonial::{NewTestimonial, Testimonial, TestimonialInput};

/// Limit for names, subjects and other single-line fields.
pub const MAX_LINE: usize = 200;
/// Limit for free-text bodies.
pub const MAX_TEXT: usize = 5_000;

/// Trimmed, non-empty value of at most `max` characters.
pub(crate) fn required(field: &str, value: &str, max: usize) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(value.to_string())
}

/// Like [`required`], but blank input becomes `None`.
pub(crate) fn optional(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, String> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => required(field, value, max).map(Some),
    }
}

pub(crate) fn email(value: &str) -> Result<Email, String> {
    Email::parse(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Ada ", 10), Ok("Ada".to_string()));
        assert_eq!(required("name", "   ", 10), Err("name is required".to_string()));
        assert!(required("name", "abcdef", 5).is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("phone", Some("  ".to_string()), 10), Ok(None));
        assert_eq!(optional("phone", None, 10), Ok(None));
        assert_eq!(
            optional("phone", Some(" 555 ".to_string()), 10),
            Ok(Some("555".to_string()))
        );
    }
}
