//! Remote link metadata lookup.
//!
//! Talks to a microlink-compatible endpoint: `GET {base}/?url=<url>` answers
//! with `{status, data: {title, description, image: {url}, logo: {url}, publisher}}`.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Why a lookup produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// The link itself is not a valid absolute URL.
    InvalidUrl(String),
    /// The request could not be sent or the connection failed.
    Transport(String),
    /// The lookup service answered with a non-success HTTP status.
    HttpStatus(u16),
    /// The payload reported a status other than `success`.
    Unsuccessful(String),
    /// The body could not be decoded.
    MalformedBody(String),
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::InvalidUrl(msg) => write!(f, "invalid URL: {}", msg),
            LookupFailure::Transport(msg) => write!(f, "transport error: {}", msg),
            LookupFailure::HttpStatus(code) => write!(f, "lookup returned HTTP {}", code),
            LookupFailure::Unsuccessful(status) => write!(f, "lookup status: {}", status),
            LookupFailure::MalformedBody(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for LookupFailure {}

/// Metadata fields of a successful lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub logo: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    status: String,
    #[serde(default)]
    data: Option<LookupData>,
}

#[derive(Debug, Default, Deserialize)]
struct LookupData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<LookupAsset>,
    #[serde(default)]
    logo: Option<LookupAsset>,
    #[serde(default)]
    publisher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupAsset {
    #[serde(default)]
    url: Option<String>,
}

impl From<LookupData> for RemoteMetadata {
    fn from(data: LookupData) -> Self {
        Self {
            title: data.title,
            description: data.description,
            image: data.image.and_then(|a| a.url),
            logo: data.logo.and_then(|a| a.url),
            publisher: data.publisher,
        }
    }
}

/// HTTP client for the metadata service.
#[derive(Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkit-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up preview metadata for `link`. Makes a single attempt.
    pub async fn lookup(&self, link: &str) -> Result<RemoteMetadata, LookupFailure> {
        Url::parse(link).map_err(|e| LookupFailure::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("url", link)])
            .send()
            .await
            .map_err(|e| LookupFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupFailure::HttpStatus(status.as_u16()));
        }

        let envelope: LookupEnvelope = response
            .json()
            .await
            .map_err(|e| LookupFailure::MalformedBody(e.to_string()))?;

        parse_envelope(envelope)
    }
}

fn parse_envelope(envelope: LookupEnvelope) -> Result<RemoteMetadata, LookupFailure> {
    if envelope.status != "success" {
        return Err(LookupFailure::Unsuccessful(envelope.status));
    }
    Ok(envelope.data.unwrap_or_default().into())
}
