//! Lead funnel submissions: newsletter, quote requests and contact messages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keystone_core::Email;

use super::{MAX_LINE, MAX_TEXT, email, optional, required};

/// `POST /api/newsletter`
#[derive(Debug, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
    /// Where the form was shown, e.g. `footer` or `blog`.
    #[serde(default)]
    pub source: Option<String>,
}

/// Result of a newsletter signup. Signing up twice is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subscription {
    Subscribed,
    AlreadySubscribed,
}

impl NewsletterSignup {
    /// # Errors
    ///
    /// Returns a message if the email or source is invalid.
    pub fn validate(self) -> Result<(Email, Option<String>), String> {
        Ok((email(&self.email)?, optional("source", self.source, 50)?))
    }
}

/// `POST /api/quote`
#[derive(Debug, Deserialize)]
pub struct QuoteRequestInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub service: String,
    #[serde(default)]
    pub project_location: Option<String>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub timeline: Option<String>,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuoteRequest {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub service: String,
    pub project_location: Option<String>,
    pub budget: Option<Decimal>,
    pub timeline: Option<String>,
    pub details: String,
}

impl QuoteRequestInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(self) -> Result<NewQuoteRequest, String> {
        if self.budget.is_some_and(|budget| budget.is_sign_negative()) {
            return Err("budget must not be negative".to_string());
        }
        Ok(NewQuoteRequest {
            name: required("name", &self.name, MAX_LINE)?,
            email: email(&self.email)?,
            phone: optional("phone", self.phone, 40)?,
            service: required("service", &self.service, MAX_LINE)?,
            project_location: optional("project_location", self.project_location, MAX_LINE)?,
            budget: self.budget,
            timeline: optional("timeline", self.timeline, MAX_LINE)?,
            details: required("details", &self.details, MAX_TEXT)?,
        })
    }
}

/// `POST /api/contact`
#[derive(Debug, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub body: String,
}

impl ContactInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(self) -> Result<NewContactMessage, String> {
        Ok(NewContactMessage {
            name: required("name", &self.name, MAX_LINE)?,
            email: email(&self.email)?,
            phone: optional("phone", self.phone, 40)?,
            subject: optional("subject", self.subject, MAX_LINE)?,
            body: required("body", &self.body, MAX_TEXT)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quote() -> QuoteRequestInput {
        QuoteRequestInput {
            name: "Lee Park".to_string(),
            email: "lee@park.test".to_string(),
            phone: Some(" ".to_string()),
            service: "Kitchen remodel".to_string(),
            project_location: None,
            budget: Some(Decimal::new(4_500_000, 2)),
            timeline: None,
            details: "Gut and replace cabinets.".to_string(),
        }
    }

    #[test]
    fn test_quote_validate() {
        let request = quote().validate().unwrap();
        assert_eq!(request.phone, None);
        assert_eq!(request.budget, Some(Decimal::new(4_500_000, 2)));
    }

    #[test]
    fn test_quote_rejects_negative_budget() {
        let mut input = quote();
        input.budget = Some(Decimal::new(-1, 0));
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_quote_requires_details() {
        let mut input = quote();
        input.details = "   ".to_string();
        assert_eq!(input.validate(), Err("details is required".to_string()));
    }

    #[test]
    fn test_newsletter_rejects_bad_email() {
        let signup = NewsletterSignup {
            email: "not-an-email".to_string(),
            source: None,
        };
        assert!(signup.validate().is_err());
    }

    #[test]
    fn test_contact_validate() {
        let message = ContactInput {
            name: "Ana".to_string(),
            email: "ANA@mail.test".to_string(),
            phone: None,
            subject: Some("Deck".to_string()),
            body: "Do you build decks?".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(message.email.as_str(), "ana@mail.test");
        assert_eq!(message.subject.as_deref(), Some("Deck"));
    }

    #[test]
    fn test_subscription_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Subscription::AlreadySubscribed).unwrap(),
            "already_subscribed"
        );
    }
}
