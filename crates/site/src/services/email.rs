//! Staff notifications for new leads over SMTP.
//!
//! Sent in the background after the lead is stored; a failed send is logged
//! and never reaches the visitor.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;

use keystone_core::{Email, MessageId, QuoteRequestId};

use crate::config::EmailConfig;
use crate::models::{NewContactMessage, NewQuoteRequest};

/// Email service errors.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build email: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for lead notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: Email,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if SMTP transport cannot be created.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notify_address: config.notify_address.clone(),
        })
    }

    /// Announce a new quote request to staff.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or sent.
    pub async fn notify_quote_request(
        &self,
        id: QuoteRequestId,
        request: &NewQuoteRequest,
    ) -> Result<(), EmailError> {
        let (subject, body) = quote_request_text(id, request);
        self.send_text(&subject, body, &request.email).await
    }

    /// Announce a new contact message to staff.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or sent.
    pub async fn notify_contact_message(
        &self,
        id: MessageId,
        message: &NewContactMessage,
    ) -> Result<(), EmailError> {
        let (subject, body) = contact_message_text(id, message);
        self.send_text(&subject, body, &message.email).await
    }

    /// Send a plain-text email to staff with `Reply-To` set to the visitor.
    async fn send_text(
        &self,
        subject: &str,
        body: String,
        reply_to: &Email,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .reply_to(
                reply_to
                    .as_str()
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(reply_to.to_string()))?,
            )
            .to(self
                .notify_address
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.notify_address.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(subject = %subject, "Lead notification sent");
        Ok(())
    }
}

fn quote_request_text(id: QuoteRequestId, request: &NewQuoteRequest) -> (String, String) {
    let subject = format!("New quote request #{id}: {}", request.service);

    let mut body = format!(
        "Name: {}\nEmail: {}\nService: {}\n",
        request.name, request.email, request.service
    );
    push_line(&mut body, "Phone", request.phone.as_deref());
    push_line(&mut body, "Location", request.project_location.as_deref());
    push_line(
        &mut body,
        "Budget",
        request.budget.map(|b| b.to_string()).as_deref(),
    );
    push_line(&mut body, "Timeline", request.timeline.as_deref());
    body.push('\n');
    body.push_str(&request.details);
    body.push('\n');

    (subject, body)
}

fn contact_message_text(id: MessageId, message: &NewContactMessage) -> (String, String) {
    let subject = format!(
        "New message #{id}: {}",
        message.subject.as_deref().unwrap_or("(no subject)")
    );

    let mut body = format!("Name: {}\nEmail: {}\n", message.name, message.email);
    push_line(&mut body, "Phone", message.phone.as_deref());
    body.push('\n');
    body.push_str(&message.body);
    body.push('\n');

    (subject, body)
}

fn push_line(body: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        body.push_str(label);
        body.push_str(": ");
        body.push_str(value);
        body.push('\n');
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_quote_request_text() {
        let request = NewQuoteRequest {
            name: "Dana Reyes".to_string(),
            email: Email::parse("dana@example.com").unwrap(),
            phone: None,
            service: "Deck".to_string(),
            project_location: Some("Bend, OR".to_string()),
            budget: Some(Decimal::new(1_500_000, 2)),
            timeline: None,
            details: "Cedar deck, roughly 300 sq ft.".to_string(),
        };

        let (subject, body) = quote_request_text(QuoteRequestId::new(42), &request);
        assert_eq!(subject, "New quote request #42: Deck");
        assert!(body.contains("Location: Bend, OR\n"));
        assert!(body.contains("Budget: 15000.00\n"));
        assert!(!body.contains("Phone:"));
        assert!(body.ends_with("300 sq ft.\n"));
    }

    #[test]
    fn test_contact_message_text_without_subject() {
        let message = NewContactMessage {
            name: "Sam".to_string(),
            email: Email::parse("sam@example.com").unwrap(),
            phone: Some("555-0100".to_string()),
            subject: None,
            body: "Do you do siding?".to_string(),
        };

        let (subject, body) = contact_message_text(MessageId::new(7), &message);
        assert_eq!(subject, "New message #7: (no subject)");
        assert!(body.contains("Phone: 555-0100\n"));
    }
}
