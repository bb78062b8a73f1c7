//! Reqwest-backed adapter for the hosted backend's REST and storage APIs.
//!
//! This adapter owns transport details only: URL construction, auth headers,
//! timeouts, status mapping and row decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use url::Url;

use super::HostedBackendSettings;
use super::dto::{NewLetterRowDto, ReadFlagDto, decode_rows};
use crate::domain::photo::{BlobName, JpegPhoto};
use crate::domain::ports::{BlobStore, BlobStoreError, LetterRepository, LetterRepositoryError};
use crate::domain::{Letter, LetterId, NewLetter};

/// Default table holding letter records.
pub const DEFAULT_TABLE: &str = "santa_letters";
/// Default bucket holding letter photos.
pub const DEFAULT_BUCKET: &str = "letter-images";
/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Where letters and photos live on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedResources {
    pub table: String,
    pub bucket: String,
    pub request_timeout: Duration,
}

impl Default for HostedResources {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_owned(),
            bucket: DEFAULT_BUCKET.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Letters table and photo bucket on the hosted backend.
pub struct HostedBackend {
    client: Client,
    base: Url,
    api_key: HeaderValue,
    bearer: HeaderValue,
    table: String,
    bucket: String,
}

impl HostedBackend {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// key is not a valid header value.
    pub fn new(
        settings: &HostedBackendSettings,
        resources: HostedResources,
    ) -> Result<Self, HostedClientError> {
        let client = Client::builder()
            .timeout(resources.request_timeout)
            .build()?;
        let api_key = sensitive_header(settings.key())?;
        let bearer = sensitive_header(&format!("Bearer {}", settings.key()))?;
        Ok(Self {
            client,
            base: settings.url().clone(),
            api_key,
            bearer,
            table: resources.table,
            bucket: resources.bucket,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| format!("backend URL {} cannot carry a path", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self) -> Result<Url, LetterRepositoryError> {
        self.endpoint(&["rest", "v1", self.table.as_str()])
            .map_err(LetterRepositoryError::query)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(AUTHORIZATION, self.bearer.clone())
    }

    async fn fetch_rows(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<Letter>, LetterRepositoryError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_rows(body.as_ref()).map_err(LetterRepositoryError::decode)
    }

    async fn rows_for_id(
        &self,
        method: Method,
        id: LetterId,
        body: Option<ReadFlagDto>,
    ) -> Result<Vec<Letter>, LetterRepositoryError> {
        let id_filter = format!("eq.{id}");
        let mut request = self
            .request(method, self.table_url()?)
            .query(&[("id", id_filter.as_str())])
            .header(PREFER_HEADER, RETURN_REPRESENTATION);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.fetch_rows(request).await
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue, HostedClientError> {
    let mut header = HeaderValue::from_str(value).map_err(|_| HostedClientError::InvalidKey)?;
    header.set_sensitive(true);
    Ok(header)
}

/// Raised when the adapter cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum HostedClientError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("backend key contains characters not allowed in a header")]
    InvalidKey,
}

#[async_trait]
impl LetterRepository for HostedBackend {
    async fn insert(&self, letter: &NewLetter) -> Result<Letter, LetterRepositoryError> {
        let request = self
            .request(Method::POST, self.table_url()?)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&NewLetterRowDto::from(letter));
        self.fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LetterRepositoryError::decode("insert returned no row"))
    }

    async fn list_newest_first(&self) -> Result<Vec<Letter>, LetterRepositoryError> {
        let request = self
            .request(Method::GET, self.table_url()?)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.fetch_rows(request).await
    }

    async fn find(&self, id: LetterId) -> Result<Option<Letter>, LetterRepositoryError> {
        let id_filter = format!("eq.{id}");
        let request = self.request(Method::GET, self.table_url()?).query(&[
            ("select", "*"),
            ("id", id_filter.as_str()),
            ("limit", "1"),
        ]);
        Ok(self.fetch_rows(request).await?.into_iter().next())
    }

    async fn latest_by_phone(&self, phone: &str) -> Result<Option<Letter>, LetterRepositoryError> {
        let phone_filter = format!("eq.{phone}");
        let request = self.request(Method::GET, self.table_url()?).query(&[
            ("select", "*"),
            ("phone", phone_filter.as_str()),
            ("order", "created_at.desc"),
            ("limit", "1"),
        ]);
        Ok(self.fetch_rows(request).await?.into_iter().next())
    }

    async fn set_read(&self, id: LetterId, is_read: bool) -> Result<Letter, LetterRepositoryError> {
        self.rows_for_id(Method::PATCH, id, Some(ReadFlagDto { is_read }))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LetterRepositoryError::not_found(id))
    }

    async fn delete(&self, id: LetterId) -> Result<(), LetterRepositoryError> {
        let removed = self.rows_for_id(Method::DELETE, id, None).await?;
        if removed.is_empty() {
            return Err(LetterRepositoryError::not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for HostedBackend {
    async fn upload(&self, name: &BlobName, photo: &JpegPhoto) -> Result<(), BlobStoreError> {
        let url = self
            .endpoint(&["storage", "v1", "object", self.bucket.as_str(), name.as_str()])
            .map_err(BlobStoreError::rejected)?;
        let response = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "image/jpeg")
            .body(photo.as_bytes().to_vec())
            .send()
            .await
            .map_err(|err| BlobStoreError::connection(transport_message(&err)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| BlobStoreError::connection(transport_message(&err)))?;
        Err(BlobStoreError::rejected(status_message(status, body.as_ref())))
    }

    fn public_url(&self, name: &BlobName) -> Result<Url, BlobStoreError> {
        self.endpoint(&[
            "storage",
            "v1",
            "object",
            "public",
            self.bucket.as_str(),
            name.as_str(),
        ])
        .map_err(BlobStoreError::public_url)
    }
}

fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    }
}

fn map_transport_error(error: reqwest::Error) -> LetterRepositoryError {
    LetterRepositoryError::connection(transport_message(&error))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LetterRepositoryError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => LetterRepositoryError::connection(message),
        _ => LetterRepositoryError::query(message),
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
