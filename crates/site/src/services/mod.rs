//! Outbound services used by the site.

pub mod email;

pub use email::{EmailError, EmailService};
