// Scrape orchestration: search pages -> listing pages -> extracted records
use crate::analyzer::{select_airs, select_pros, sort_by_price};
use crate::config::AppConfig;
use crate::extractor;
use crate::model::{Listing, ListingError, SearchRequest};
use crate::parser::parse_metadata;
use crate::scraper::PageFetcher;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Ads per search result page.
pub const PAGE_SIZE: usize = 20;

pub struct RunOutcome {
    pub all: Vec<Listing>,
    pub airs: Vec<Listing>,
    pub pros: Vec<Listing>,
}

fn jittered(pause: Duration) -> Duration {
    let max_ms = pause.as_millis() as u64;
    pause + Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

/// Walks the search result pages at offsets 0, 20, 40, ... below `n_ads`.
/// A failed page is logged and skipped; an empty page ends the walk.
pub async fn collect_listing_urls<F>(fetcher: &F, config: &AppConfig, pause: Duration) -> Vec<String>
where
    F: PageFetcher + ?Sized,
{
    let mut urls: Vec<String> = Vec::new();

    for offset in (0..config.n_ads).step_by(PAGE_SIZE) {
        if offset > 0 {
            sleep(jittered(pause)).await;
        }

        let request = SearchRequest {
            query: config.query.clone(),
            zip_code: config.zip_code,
            distance_km: config.distance_km,
            min_price: config.min_price,
            max_price: config.max_price,
            offset,
        };

        match fetcher.search(&request).await {
            Ok(page) if page.is_empty() => {
                info!("Search page at offset {} is empty, stopping", offset);
                break;
            }
            Ok(page) => {
                debug!("Search page at offset {}: {} listings", offset, page.len());
                for url in page {
                    if !urls.contains(&url) {
                        urls.push(url);
                    }
                }
            }
            Err(e) => warn!("Search page at offset {} failed: {}", offset, e),
        }
    }

    urls
}

/// Fetches one listing page and extracts its record.
pub async fn process_listing<F>(fetcher: &F, url: &str) -> Result<Listing, ListingError>
where
    F: PageFetcher + ?Sized,
{
    let page = fetcher.listing(url).await?;
    let attributes = extractor::extract(&page.layers())?;
    let metadata = parse_metadata(&page.metadata_rows);

    Ok(Listing {
        attributes,
        metadata,
        fetched_at: Utc::now(),
    })
}

/// Processes listings with at most `workers` in flight. Failed listings are
/// logged and left out; the others are unaffected.
pub async fn process_listings<F>(fetcher: &F, urls: Vec<String>, workers: usize) -> Vec<Listing>
where
    F: PageFetcher + ?Sized,
{
    stream::iter(urls)
        .map(|url| async move {
            let result = process_listing(fetcher, &url).await;
            (url, result)
        })
        .buffer_unordered(workers.max(1))
        .filter_map(|(url, result)| async move {
            match result {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!("Skipping listing {}: {}", url, e);
                    None
                }
            }
        })
        .collect()
        .await
}

/// Runs a full scrape and splits the result into the Air and Pro tables.
pub async fn scrape<F>(fetcher: &F, config: &AppConfig, pause: Duration) -> RunOutcome
where
    F: PageFetcher + ?Sized,
{
    let urls = collect_listing_urls(fetcher, config, pause).await;
    info!("Found {} listings, processing with {} workers", urls.len(), config.workers);

    let mut all = process_listings(fetcher, urls, config.workers).await;
    sort_by_price(&mut all);

    let airs = select_airs(&all, &config.wanted_years);
    let pros = select_pros(&all, &config.wanted_years);

    RunOutcome { all, airs, pros }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListingPage, ScraperError, Variant};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<usize, Vec<String>>,
        listings: HashMap<String, ListingPage>,
        failing_pages: Vec<usize>,
        requested_offsets: Mutex<Vec<usize>>,
    }

    impl FakeFetcher {
        fn add_listing(&mut self, url: &str, title: &str, description: &str, price: &str) {
            self.listings.insert(
                url.to_string(),
                ListingPage {
                    url: url.to_string(),
                    title: title.to_string(),
                    description: description.to_string(),
                    metadata_rows: vec![
                        ("Vidělo:".to_string(), "100 lidí".to_string()),
                        ("Cena:".to_string(), price.to_string()),
                    ],
                },
            );
        }
    }

    #[async_trait::async_trait]
    impl PageFetcher for FakeFetcher {
        async fn search(&self, req: &SearchRequest) -> Result<Vec<String>, ScraperError> {
            self.requested_offsets.lock().unwrap().push(req.offset);
            if self.failing_pages.contains(&req.offset) {
                return Err(ScraperError::InvalidResponse(503));
            }
            Ok(self.pages.get(&req.offset).cloned().unwrap_or_default())
        }

        async fn listing(&self, url: &str) -> Result<ListingPage, ScraperError> {
            self.listings
                .get(url)
                .cloned()
                .ok_or(ScraperError::InvalidResponse(404))
        }
    }

    fn config(n_ads: usize) -> AppConfig {
        AppConfig {
            n_ads,
            workers: 3,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_collect_urls_walks_pages() {
        let mut fetcher = FakeFetcher::default();
        fetcher.pages.insert(0, vec!["a".to_string(), "b".to_string()]);
        fetcher.pages.insert(20, vec!["b".to_string(), "c".to_string()]);
        fetcher.pages.insert(40, vec!["d".to_string()]);

        let urls = collect_listing_urls(&fetcher, &config(50), Duration::ZERO).await;
        assert_eq!(urls, vec!["a", "b", "c", "d"]);
        assert_eq!(*fetcher.requested_offsets.lock().unwrap(), vec![0, 20, 40]);
    }

    #[tokio::test]
    async fn test_collect_urls_skips_failed_page_and_stops_on_empty() {
        let mut fetcher = FakeFetcher::default();
        fetcher.pages.insert(0, vec!["a".to_string()]);
        fetcher.failing_pages.push(20);
        fetcher.pages.insert(40, vec!["c".to_string()]);

        let urls = collect_listing_urls(&fetcher, &config(100), Duration::ZERO).await;
        assert_eq!(urls, vec!["a", "c"]);
        assert_eq!(*fetcher.requested_offsets.lock().unwrap(), vec![0, 20, 40, 60]);
    }

    #[tokio::test]
    async fn test_failed_listing_does_not_abort_run() {
        let mut fetcher = FakeFetcher::default();
        fetcher.add_listing("ok", "Macbook Pro 2019 - [1.3.2021]", "16 gb ram", "20 000 Kč");
        fetcher.add_listing("no-date", "Macbook Pro 2019", "16 gb ram", "19 000 Kč");

        let urls = vec!["ok".to_string(), "no-date".to_string(), "missing".to_string()];
        let listings = process_listings(&fetcher, urls, 2).await;

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].url(), "ok");
        assert_eq!(listings[0].metadata.price, Some(20000));
        assert_eq!(listings[0].metadata.views, Some(100));
    }

    #[tokio::test]
    async fn test_process_listing_reports_malformed_title() {
        let mut fetcher = FakeFetcher::default();
        fetcher.add_listing("no-date", "Macbook Pro 2019", "", "1 Kč");

        let err = process_listing(&fetcher, "no-date").await.unwrap_err();
        assert!(matches!(err, ListingError::Extract(_)));
    }

    #[tokio::test]
    async fn test_scrape_splits_and_sorts() {
        let mut fetcher = FakeFetcher::default();
        fetcher.pages.insert(
            0,
            vec!["air-m1".to_string(), "pro-2019".to_string(), "pro-2015".to_string(), "pro-cheap".to_string()],
        );
        fetcher.add_listing("air-m1", "macbook air m1 2020 - [2.3.2021]", "", "24 000 Kč");
        fetcher.add_listing("pro-2019", "Macbook Pro 2019 - [3.3.2021]", "2,3 ghz", "22 000 Kč");
        fetcher.add_listing("pro-2015", "Macbook Pro 2015 - [4.3.2021]", "", "15 000 Kč");
        fetcher.add_listing("pro-cheap", "Macbook Pro 2020 - [5.3.2021]", "rok 2020 nebo 2019", "16 000 Kč");

        let outcome = scrape(&fetcher, &config(20), Duration::ZERO).await;

        let all: Vec<&str> = outcome.all.iter().map(Listing::url).collect();
        assert_eq!(all, vec!["pro-2015", "pro-cheap", "pro-2019", "air-m1"]);

        assert_eq!(outcome.airs.len(), 1);
        assert_eq!(outcome.airs[0].attributes.variant, Variant::Air);

        let pros: Vec<&str> = outcome.pros.iter().map(Listing::url).collect();
        assert_eq!(pros, vec!["pro-cheap", "pro-2019"]);
    }
}
