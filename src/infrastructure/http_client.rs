//! Confluence REST client
//!
//! Performs the single authenticated GET against
//! `{base}/rest/api/content/{page_id}?expand=body.view` and returns the
//! rendered page markup found at `body.view.value`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::domain::PageSource;

/// Errors raised while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Invalid page URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Error while requesting url: \"{url}\" - {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error while requesting url: \"{url}\" - \"{status}\"")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Could not parse page response from \"{url}\": {reason}")]
    MalformedResponse { url: String, reason: String },
}

/// How the request authenticates against Confluence
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Basic base64(username:token)`
    Basic { username: String, token: String },
    /// `Authorization: Bearer token` (personal access token)
    Bearer { token: String },
}

impl Credentials {
    /// Basic auth when a non-empty username is supplied, bearer otherwise
    pub fn new(username: Option<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        match username.filter(|name| !name.is_empty()) {
            Some(username) => Self::Basic { username, token },
            None => Self::Bearer { token },
        }
    }

    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "Basic",
            Self::Bearer { .. } => "Bearer",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("token", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    /// No timeout when `None`: a hung connection hangs the run
    pub timeout_seconds: Option<u64>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("confluence-content-ids/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: None,
        }
    }
}

/// Client for one Confluence instance
pub struct ConfluenceClient {
    client: Client,
    base_uri: Url,
    credentials: Credentials,
    config: HttpClientConfig,
}

impl ConfluenceClient {
    pub fn new(
        base_uri: Url,
        credentials: Credentials,
        config: HttpClientConfig,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::InvalidHeader(format!("user agent: {e}")))?,
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            base_uri,
            credentials,
            config,
        })
    }

    /// `{base}/rest/api/content/{page_id}?expand=body.view`
    pub fn page_url(&self, page_id: &str) -> Result<Url, FetchError> {
        let base = self.base_uri.as_str().trim_end_matches('/');
        let raw = format!("{base}/rest/api/content/{page_id}?expand=body.view");
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }

    /// Build the authenticated GET request without sending it
    pub fn build_request(&self, page_id: &str) -> Result<Request, FetchError> {
        let url = self.page_url(page_id)?;
        let request = self.client.get(url.clone());
        let request = match &self.credentials {
            Credentials::Basic { username, token } => request.basic_auth(username, Some(token)),
            Credentials::Bearer { token } => request.bearer_auth(token),
        };
        request.build().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch the rendered HTML of `page_id`
    pub async fn fetch_page(&self, page_id: &str) -> Result<String, FetchError> {
        let request = self.build_request(page_id)?;
        let url = request.url().to_string();

        info!("Requesting Confluence page {} via API", page_id);
        debug!(
            "Using {} for request ({} auth): {}",
            request.url().scheme(),
            self.credentials.scheme(),
            url
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let html = extract_page_html(&url, &body)?;
        debug!("Successfully fetched: {} ({} chars of markup)", url, html.len());
        Ok(html)
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageSource for ConfluenceClient {
    async fn fetch_page(&self, page_id: &str) -> Result<String, FetchError> {
        Self::fetch_page(self, page_id).await
    }
}

#[derive(Deserialize)]
struct PageResponse {
    body: PageBody,
}

#[derive(Deserialize)]
struct PageBody {
    view: PageView,
}

#[derive(Deserialize)]
struct PageView {
    value: String,
}

/// Read `body.view.value` out of a content API response
pub fn extract_page_html(url: &str, body: &str) -> Result<String, FetchError> {
    serde_json::from_str::<PageResponse>(body)
        .map(|page| page.body.view.value)
        .map_err(|e| FetchError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
