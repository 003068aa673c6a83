use crate::domain::model::FetchedPage;
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

/// Retrieves a remote page. Implementations classify failures as
/// `PreviewError::Network` or `PreviewError::UpstreamStatus`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage>;
}

pub trait ConfigProvider: Send + Sync {
    fn listen_addr(&self) -> &str;
    fn fetch_timeout_secs(&self) -> u64;
    fn user_agent(&self) -> &str;
}
