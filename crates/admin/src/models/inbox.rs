//! Records that arrive from the public site and wait on staff.
//!
//! These feed the notification badge, so each implements the matching
//! `keystone_core::notifications` trait and `Hash` (the aggregator keys its
//! memo on a hash of the collection).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keystone_core::notifications::{AwaitingReview, Unread};
use keystone_core::{Email, MessageId, QuoteRequestId, QuoteStatus, TestimonialId, TestimonialStatus};

/// A contact-form message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unread for Message {
    fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// A client testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::FromRow)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub author_name: String,
    pub company: Option<String>,
    pub quote: String,
    pub rating: i16,
    pub status: TestimonialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AwaitingReview for Testimonial {
    fn is_pending(&self) -> bool {
        self.status == TestimonialStatus::Pending
    }
}

/// A quote request from the lead funnel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub service: String,
    pub project_location: Option<String>,
    pub budget: Option<Decimal>,
    pub timeline: Option<String>,
    pub details: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AwaitingReview for QuoteRequest {
    fn is_pending(&self) -> bool {
        self.status == QuoteStatus::Pending
    }
}

/// `PATCH /api/messages/{id}`
#[derive(Debug, Deserialize)]
pub struct MessageUpdate {
    pub is_read: bool,
}

/// `PATCH /api/admin/quote/requests/{id}`
#[derive(Debug, Deserialize)]
pub struct QuoteStatusUpdate {
    pub status: QuoteStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use keystone_core::notifications::aggregate;

    use super::*;

    fn message(id: i64, is_read: bool) -> Message {
        Message {
            id: MessageId::new(id),
            name: "Dana".to_string(),
            email: Email::parse("dana@example.com").unwrap(),
            phone: None,
            subject: None,
            body: "Do you build decks?".to_string(),
            is_read,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn testimonial(id: i64, status: TestimonialStatus) -> Testimonial {
        Testimonial {
            id: TestimonialId::new(id),
            author_name: "Sam".to_string(),
            company: None,
            quote: "On time and on budget.".to_string(),
            rating: 5,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_inbox_records_feed_aggregate() {
        let messages = [message(1, false), message(2, true)];
        let testimonials = [
            testimonial(1, TestimonialStatus::Pending),
            testimonial(2, TestimonialStatus::Approved),
            testimonial(3, TestimonialStatus::Pending),
        ];

        let counts = aggregate::<_, _, QuoteRequest>(&messages, &testimonials, &[]);
        assert_eq!(counts.unread_messages(), 1);
        assert_eq!(counts.pending_testimonials(), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_quote_status_update_payload() {
        let update: QuoteStatusUpdate = serde_json::from_str(r#"{"status": "contacted"}"#).unwrap();
        assert_eq!(update.status, QuoteStatus::Contacted);
        assert!(serde_json::from_str::<QuoteStatusUpdate>(r#"{"status": "maybe"}"#).is_err());
    }
}
