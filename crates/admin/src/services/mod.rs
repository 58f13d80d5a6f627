//! Clients for external services.

pub mod uploads;

pub use uploads::{OutgoingFile, UploadClient, UploadError};
