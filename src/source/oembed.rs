//! Video metadata (oEmbed) and thumbnail fetching.

use anyhow::Context as _;
use url::Url;

use crate::foundation::error::{SharecardError, SharecardResult};
use crate::source::video_id::{DEFAULT_THUMBNAIL_BASE, VideoId};

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://noembed.com/embed";

/// Validated video metadata. All fields are non-empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author_name: String,
    pub canonical_url: String,
}

/// oEmbed response body as the provider sends it.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct RawOEmbed {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Set by providers instead of the fields above when the lookup failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl VideoMetadata {
    /// Build metadata, rejecting blank fields.
    pub fn new(
        title: impl Into<String>,
        author_name: impl Into<String>,
        canonical_url: impl Into<String>,
    ) -> SharecardResult<Self> {
        let metadata = Self {
            title: title.into(),
            author_name: author_name.into(),
            canonical_url: canonical_url.into(),
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Every field must carry non-whitespace text.
    pub fn validate(&self) -> SharecardResult<()> {
        let blank = [&self.title, &self.author_name, &self.canonical_url]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(SharecardError::metadata("invalid video or missing data"));
        }
        Ok(())
    }

    pub fn from_oembed(raw: RawOEmbed) -> SharecardResult<Self> {
        if let Some(error) = raw.error.filter(|e| !e.trim().is_empty()) {
            return Err(SharecardError::metadata(error));
        }
        Self::new(
            raw.title.unwrap_or_default(),
            raw.author_name.unwrap_or_default(),
            raw.url.unwrap_or_default(),
        )
    }

    pub fn from_json(body: &[u8]) -> SharecardResult<Self> {
        let raw: RawOEmbed = serde_json::from_slice(body)
            .map_err(|e| SharecardError::metadata(format!("error fetching video info: {e}")))?;
        Self::from_oembed(raw)
    }
}

/// Where metadata and thumbnails come from.
#[allow(async_fn_in_trait)]
pub trait VideoSource {
    /// Look up metadata for the URL the user entered.
    async fn fetch_metadata(&self, source_url: &str) -> SharecardResult<VideoMetadata>;

    /// Encoded bytes of the high-resolution thumbnail.
    async fn fetch_thumbnail(&self, video_id: &VideoId) -> SharecardResult<Vec<u8>>;
}

/// [`VideoSource`] over HTTP. No timeouts, no retries.
#[derive(Clone, Debug)]
pub struct HttpVideoSource {
    http: reqwest::Client,
    oembed_endpoint: String,
    thumbnail_base: String,
}

impl HttpVideoSource {
    pub fn new(
        oembed_endpoint: impl Into<String>,
        thumbnail_base: impl Into<String>,
    ) -> SharecardResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sharecard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            oembed_endpoint: oembed_endpoint.into(),
            thumbnail_base: thumbnail_base.into(),
        })
    }

    pub fn with_defaults() -> SharecardResult<Self> {
        Self::new(DEFAULT_OEMBED_ENDPOINT, DEFAULT_THUMBNAIL_BASE)
    }

    /// `{endpoint}?url=<percent-encoded source url>`
    pub fn metadata_request_url(&self, source_url: &str) -> SharecardResult<Url> {
        Url::parse_with_params(&self.oembed_endpoint, &[("url", source_url)]).map_err(|e| {
            SharecardError::input(format!(
                "invalid metadata endpoint '{}': {e}",
                self.oembed_endpoint
            ))
        })
    }
}

impl VideoSource for HttpVideoSource {
    #[tracing::instrument(skip(self))]
    async fn fetch_metadata(&self, source_url: &str) -> SharecardResult<VideoMetadata> {
        let url = self.metadata_request_url(source_url)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SharecardError::metadata(format!("error fetching video info: {e}")))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| SharecardError::metadata(format!("error fetching video info: {e}")))?;
        tracing::debug!(bytes = body.len(), "metadata received");
        VideoMetadata::from_json(&body)
    }

    #[tracing::instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_thumbnail(&self, video_id: &VideoId) -> SharecardResult<Vec<u8>> {
        let url = video_id.thumbnail_url(&self.thumbnail_base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SharecardError::load(format!("failed loading high-res thumbnail: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SharecardError::load(format!(
                "failed loading high-res thumbnail: HTTP {status}"
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SharecardError::load(format!("failed loading high-res thumbnail: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/oembed.rs"]
mod tests;
