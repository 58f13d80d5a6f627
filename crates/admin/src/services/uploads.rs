//! Upload provider client.
//!
//! Gallery images are stored by an external file host. The back-office
//! forwards the bytes it receives and keeps only the returned URL and file
//! key.
//!
//! # API
//!
//! - `POST {base}/files` - multipart, one `files` part per file, returns a
//!   JSON array of `{url, key, name, size}`
//! - `POST {base}/deleteFiles` - `{"fileKeys": [...]}`
//!
//! Authentication is the `x-uploadthing-api-key` header.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use keystone_core::gallery::{PendingFile, UploadedFile};

use crate::config::UploadConfig;

const API_KEY_HEADER: &str = "x-uploadthing-api-key";

/// Errors from the upload provider or from files rejected before sending.
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Provider rejected the API key.
    #[error("Unauthorized: invalid upload API key")]
    Unauthorized,

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Not an image.
    #[error("{name} is not an image ({content_type})")]
    NotAnImage { name: String, content_type: String },

    /// Over the per-file cap.
    #[error("{name} is {size} bytes, the limit is {max}")]
    TooLarge { name: String, size: u64, max: u64 },

    /// Zero-byte file.
    #[error("{0} is empty")]
    EmptyFile(String),
}

impl UploadError {
    /// Whether the caller sent something we refuse, as opposed to the
    /// provider failing.
    #[must_use]
    pub const fn is_rejected_file(&self) -> bool {
        matches!(
            self,
            Self::NotAnImage { .. } | Self::TooLarge { .. } | Self::EmptyFile(_)
        )
    }
}

/// A file received from the back-office, ready to forward.
#[derive(Debug, Clone)]
pub struct OutgoingFile {
    pub meta: PendingFile,
    pub bytes: Vec<u8>,
}

impl OutgoingFile {
    #[must_use]
    pub fn new(file_name: String, content_type: String, bytes: Vec<u8>) -> Self {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        Self {
            meta: PendingFile {
                file_name,
                content_type,
                size,
            },
            bytes,
        }
    }
}

/// Check a file before it is sent anywhere.
///
/// # Errors
///
/// Returns the reason the file is refused.
pub fn validate_file(meta: &PendingFile, max_bytes: usize) -> Result<(), UploadError> {
    if !meta.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            name: meta.file_name.clone(),
            content_type: meta.content_type.clone(),
        });
    }
    if meta.size == 0 {
        return Err(UploadError::EmptyFile(meta.file_name.clone()));
    }
    let max = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if meta.size > max {
        return Err(UploadError::TooLarge {
            name: meta.file_name.clone(),
            size: meta.size,
            max,
        });
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesRequest<'a> {
    file_keys: &'a [String],
}

/// Upload provider client.
#[derive(Clone)]
pub struct UploadClient {
    inner: Arc<UploadClientInner>,
}

struct UploadClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl UploadClient {
    /// Create a new upload client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| UploadError::Parse(format!("Invalid API key format: {e}")))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(UploadClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Send files to the provider.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider answers with an
    /// error or with a different number of files than were sent.
    #[tracing::instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload(&self, files: Vec<OutgoingFile>) -> Result<Vec<UploadedFile>, UploadError> {
        let expected = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.meta.file_name)
                .mime_str(&file.meta.content_type)?;
            form = form.part("files", part);
        }

        let response = self
            .inner
            .client
            .post(self.endpoint("files"))
            .multipart(form)
            .send()
            .await?;

        let uploaded: Vec<UploadedFile> = Self::handle_response(response).await?;
        if uploaded.len() != expected {
            return Err(UploadError::Parse(format!(
                "sent {expected} files, provider returned {}",
                uploaded.len()
            )));
        }

        tracing::info!(count = uploaded.len(), "Files uploaded");
        Ok(uploaded)
    }

    /// Delete files from the provider.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider answers with an
    /// error.
    #[tracing::instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn delete(&self, keys: &[String]) -> Result<(), UploadError> {
        if keys.is_empty() {
            return Ok(());
        }

        let response = self
            .inner
            .client
            .post(self.endpoint("deleteFiles"))
            .json(&DeleteFilesRequest { file_keys: keys })
            .send()
            .await?;

        if response.status().is_success() {
            tracing::info!(count = keys.len(), "Files deleted");
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Delete files and log instead of failing. Used when cleaning up after
    /// an operation that already failed or already succeeded.
    pub async fn delete_quietly(&self, keys: &[String]) {
        if let Err(e) = self.delete(keys).await {
            tracing::warn!(error = %e, keys = ?keys, "Failed to delete files from upload provider");
        }
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UploadError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| UploadError::Parse(format!("Failed to parse response: {e}")));
        }
        Err(Self::parse_error(response).await)
    }

    async fn parse_error(response: reqwest::Response) -> UploadError {
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return UploadError::Unauthorized;
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        UploadError::Api { status, message }
    }
}

impl std::fmt::Debug for UploadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn meta(content_type: &str, size: u64) -> PendingFile {
        PendingFile {
            file_name: "porch.jpg".to_owned(),
            content_type: content_type.to_owned(),
            size,
        }
    }

    #[test]
    fn test_validate_file() {
        assert!(validate_file(&meta("image/jpeg", 10), 100).is_ok());
        assert!(validate_file(&meta("image/webp", 100), 100).is_ok());

        let err = validate_file(&meta("application/pdf", 10), 100).unwrap_err();
        assert!(matches!(err, UploadError::NotAnImage { .. }));
        assert!(err.is_rejected_file());

        let err = validate_file(&meta("image/png", 101), 100).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { size: 101, max: 100, .. }));

        assert!(matches!(
            validate_file(&meta("image/png", 0), 100),
            Err(UploadError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_endpoints_ignore_trailing_slash() {
        let client = UploadClient::new(&UploadConfig {
            api_url: Url::parse("https://uploads.test/v6/").unwrap(),
            api_key: SecretString::from("sk_live_9f8e7d6c5b4a"),
        })
        .unwrap();

        assert_eq!(client.endpoint("files"), "https://uploads.test/v6/files");
        assert_eq!(
            client.endpoint("deleteFiles"),
            "https://uploads.test/v6/deleteFiles"
        );
        assert!(!format!("{client:?}").contains("sk_live"));
    }

    #[test]
    fn test_delete_request_shape() {
        let keys = vec!["a".to_owned(), "b".to_owned()];
        let json = serde_json::to_value(DeleteFilesRequest { file_keys: &keys }).unwrap();
        assert_eq!(json, serde_json::json!({"fileKeys": ["a", "b"]}));
    }

    #[test]
    fn test_outgoing_file_size() {
        let file = OutgoingFile::new("a.png".into(), "image/png".into(), vec![0; 42]);
        assert_eq!(file.meta.size, 42);
    }
}
