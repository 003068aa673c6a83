use crate::core::rewriter::AccessibilityRewriter;
use crate::domain::model::{PreviewRequest, RewrittenDocument};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;
use std::time::Instant;

/// Fetches a page and rewrites it; a failed fetch ends the request before
/// any rewriting happens.
pub struct PreviewService<F: PageFetcher> {
    fetcher: F,
    rewriter: AccessibilityRewriter,
}

impl<F: PageFetcher> PreviewService<F> {
    pub fn new(fetcher: F, rewriter: AccessibilityRewriter) -> Self {
        Self { fetcher, rewriter }
    }

    pub fn rewriter(&self) -> &AccessibilityRewriter {
        &self.rewriter
    }

    pub async fn preview(&self, request: &PreviewRequest) -> Result<RewrittenDocument> {
        let started = Instant::now();
        tracing::info!(url = %request.url, profile = %request.profile, "Fetching page for preview");

        let page = match self.fetcher.fetch(&request.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Fetch failed, nothing to rewrite");
                return Err(e);
            }
        };

        tracing::debug!(
            status = page.status,
            final_url = %page.final_url,
            bytes = page.html.len(),
            "Fetched page"
        );

        let html = self.rewriter.rewrite(
            &page.html,
            &page.final_url,
            &request.profile,
            Some(&request.custom),
        );

        tracing::info!(
            profile = %request.profile,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Preview ready"
        );

        Ok(RewrittenDocument {
            html,
            profile: request.profile.clone(),
        })
    }
}
