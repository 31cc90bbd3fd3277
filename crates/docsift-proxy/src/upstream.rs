use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, Result};

/// A successful upstream response.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Client for the single configured document. No retries, no caching.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    url: String,
}

impl Upstream {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(ProxyError::Client)?;
        Ok(Self {
            client,
            url: config.upstream_url.clone(),
        })
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the document. Any non-2xx status is a failure.
    pub async fn fetch(&self) -> Result<Fetched> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(url = %self.url, bytes = body.len(), "fetched upstream document");
        Ok(Fetched { content_type, body })
    }
}
