use crate::model::Listing;
use std::fmt;

/// Price statistics of one result table. Listings without a price only
/// count towards `count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub count: usize,
    pub min_price: Option<u64>,
    pub avg_price: Option<f64>,
    pub std_dev: Option<f64>,
}

/// Calculates count, cheapest, average price and standard deviation.
pub fn summarize(listings: &[Listing]) -> PriceSummary {
    let prices: Vec<f64> = listings
        .iter()
        .filter_map(Listing::price)
        .filter(|&p| p > 0)
        .map(|p| p as f64)
        .collect();

    if prices.is_empty() {
        return PriceSummary {
            count: listings.len(),
            min_price: None,
            avg_price: None,
            std_dev: None,
        };
    }

    let count = prices.len() as f64;
    let avg = prices.iter().sum::<f64>() / count;
    let std_dev = (prices.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / count).sqrt();

    PriceSummary {
        count: listings.len(),
        min_price: listings.iter().filter_map(Listing::price).filter(|&p| p > 0).min(),
        avg_price: Some(avg),
        std_dev: Some(std_dev),
    }
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} listings", self.count)?;
        if let (Some(min), Some(avg), Some(std_dev)) = (self.min_price, self.avg_price, self.std_dev) {
            write!(f, ", cheapest {} Kč, avg {:.0} Kč (±{:.0})", min, avg, std_dev)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::selection::fixtures::listing;
    use crate::model::Variant;

    #[test]
    fn test_summarize() {
        let listings = vec![
            listing("a", Variant::Pro, None, false, Some(20000)),
            listing("b", Variant::Pro, None, false, Some(16000)),
            listing("c", Variant::Pro, None, false, None),
        ];

        let summary = summarize(&listings);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min_price, Some(16000));
        assert_eq!(summary.avg_price, Some(18000.0));
        assert_eq!(summary.std_dev, Some(2000.0));
        assert_eq!(summary.to_string(), "3 listings, cheapest 16000 Kč, avg 18000 Kč (±2000)");
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_price, None);
        assert_eq!(summary.to_string(), "0 listings");
    }
}
