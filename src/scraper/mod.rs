pub mod fetcher;
pub mod traits;

pub use fetcher::BazosFetcher;
pub use traits::PageFetcher;
