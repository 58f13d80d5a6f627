use serde::{Deserialize, Serialize};

use super::{MAX_LINE, MAX_TEXT, optional, required};

/// An approved testimonial as shown on the site.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Testimonial {
    pub author_name: String,
    pub company: Option<String>,
    pub quote: String,
    pub rating: i16,
}

/// `POST /api/testimonials`
#[derive(Debug, Deserialize)]
pub struct TestimonialInput {
    pub author_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub quote: String,
    pub rating: i16,
}

/// A testimonial ready to be stored as pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestimonial {
    pub author_name: String,
    pub company: Option<String>,
    pub quote: String,
    pub rating: i16,
}

impl TestimonialInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(self) -> Result<NewTestimonial, String> {
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".to_string());
        }
        Ok(NewTestimonial {
            author_name: required("author_name", &self.author_name, MAX_LINE)?,
            company: optional("company", self.company, MAX_LINE)?,
            quote: required("quote", &self.quote, MAX_TEXT)?,
            rating: self.rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(rating: i16) -> TestimonialInput {
        TestimonialInput {
            author_name: " Dana Ruiz ".to_string(),
            company: Some(String::new()),
            quote: "On time and on budget.".to_string(),
            rating,
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_company() {
        let testimonial = input(5).validate();
        assert_eq!(
            testimonial,
            Ok(NewTestimonial {
                author_name: "Dana Ruiz".to_string(),
                company: None,
                quote: "On time and on budget.".to_string(),
                rating: 5,
            })
        );
    }

    #[test]
    fn test_validate_rejects_rating_out_of_range() {
        assert!(input(0).validate().is_err());
        assert!(input(6).validate().is_err());
    }
}
