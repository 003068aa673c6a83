use crate::domain::model::FetchedPage;
use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{PreviewError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

/// Desktop Chrome user agent; some sites refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/124.0 Safari/537.36";

/// Single-attempt GET against the target site. No retries and no body size
/// limit; redirects follow reqwest's default policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PreviewError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.fetch_timeout_secs()),
            config.user_agent(),
        )
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        tracing::debug!("Making page request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        tracing::debug!("Page response status: {}", status);

        if status.as_u16() >= 400 {
            return Err(PreviewError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await?;

        Ok(FetchedPage {
            html,
            final_url,
            status: status.as_u16(),
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .user_agent(DEFAULT_USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }
}
