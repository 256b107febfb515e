use crate::model::{ListingPage, ScraperError, SearchRequest};

/// Fetches and parses pages of the classifieds site.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Listing URLs found on one search result page.
    async fn search(&self, req: &SearchRequest) -> Result<Vec<String>, ScraperError>;

    /// Raw title, description and metadata rows of one listing.
    async fn listing(&self, url: &str) -> Result<ListingPage, ScraperError>;
}
