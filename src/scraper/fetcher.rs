use crate::model::{ListingPage, ScraperError, SearchRequest};
use crate::parser::{parse_listing_page, parse_search_page};
use crate::scraper::traits::PageFetcher;

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const SEARCH_URL: &str = "https://www.bazos.cz/search.php";

pub struct BazosFetcher {
    pub client: Client,
}

impl BazosFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) BazosSniperBot/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    fn search_params(req: &SearchRequest) -> Vec<(&'static str, String)> {
        vec![
            ("hledat", req.query.clone()),
            ("rubriky", "www".to_string()),
            ("hlokalita", req.zip_code.to_string()),
            ("humkreis", req.distance_km.to_string()),
            ("cenaod", req.min_price.to_string()),
            ("cenado", req.max_price.to_string()),
            ("Submit", "Hledat".to_string()),
            ("kitx", "ano".to_string()),
            ("order", String::new()),
            ("crz", req.offset.to_string()),
        ]
    }

    async fn get_html(&self, request: reqwest::RequestBuilder) -> Result<(String, String), ScraperError> {
        let response = request.send().await?;
        let final_url = response.url().to_string();

        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse(response.status().as_u16()));
        }

        Ok((final_url, response.text().await?))
    }
}

#[async_trait::async_trait]
impl PageFetcher for BazosFetcher {
    async fn search(&self, req: &SearchRequest) -> Result<Vec<String>, ScraperError> {
        let request = self.client.get(SEARCH_URL).query(&Self::search_params(req));
        let (url, html) = self.get_html(request).await?;
        debug!("Fetched search page {}", url);

        Ok(parse_search_page(&html, &url)?)
    }

    async fn listing(&self, url: &str) -> Result<ListingPage, ScraperError> {
        let (_, html) = self.get_html(self.client.get(url)).await?;
        Ok(parse_listing_page(&html, url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let req = SearchRequest {
            query: "macbook".to_string(),
            zip_code: 10400,
            distance_km: 50,
            min_price: 15000,
            max_price: 25000,
            offset: 40,
        };

        let params = BazosFetcher::search_params(&req);
        assert!(params.contains(&("hledat", "macbook".to_string())));
        assert!(params.contains(&("hlokalita", "10400".to_string())));
        assert!(params.contains(&("cenado", "25000".to_string())));
        assert!(params.contains(&("crz", "40".to_string())));
    }
}
