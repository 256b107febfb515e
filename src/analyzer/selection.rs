use crate::extractor::candidates::MODEL_YEARS;
use crate::model::{FieldValue, Listing, Variant};

/// Sorts by price ascending; listings without a price go last.
pub fn sort_by_price(listings: &mut [Listing]) {
    listings.sort_by_key(|l| (l.price().is_none(), l.price()));
}

/// Rejects only a single known model year that is not wanted. Missing or
/// ambiguous years are kept for a human to look at.
pub fn is_wanted_year(year: &FieldValue<String>, wanted: &[u16]) -> bool {
    match year.single().and_then(|y| y.parse::<u16>().ok()) {
        Some(year) => !MODEL_YEARS.contains(&year) || wanted.contains(&year),
        None => true,
    }
}

/// Airs from a wanted year with the M1 chip.
pub fn select_airs(listings: &[Listing], wanted_years: &[u16]) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.attributes.variant != Variant::Pro)
        .filter(|l| is_wanted_year(&l.attributes.year, wanted_years))
        .filter(|l| l.attributes.m1_chip)
        .cloned()
        .collect()
}

/// Pros from a wanted year.
pub fn select_pros(listings: &[Listing], wanted_years: &[u16]) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.attributes.variant != Variant::Air)
        .filter(|l| is_wanted_year(&l.attributes.year, wanted_years))
        .cloned()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::listing;
    use super::*;

    #[test]
    fn test_sort_by_price() {
        let mut listings = vec![
            listing("a", Variant::Pro, None, false, None),
            listing("b", Variant::Pro, None, false, Some(20000)),
            listing("c", Variant::Pro, None, false, Some(15000)),
        ];
        sort_by_price(&mut listings);
        let urls: Vec<&str> = listings.iter().map(Listing::url).collect();
        assert_eq!(urls, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_is_wanted_year() {
        let wanted = [2019, 2020];
        assert!(is_wanted_year(&FieldValue::Single("2020".to_string()), &wanted));
        assert!(!is_wanted_year(&FieldValue::Single("2015".to_string()), &wanted));
        assert!(is_wanted_year(&FieldValue::Absent, &wanted));
        assert!(is_wanted_year(
            &FieldValue::Ambiguous(vec!["2015".to_string(), "2019".to_string()]),
            &wanted
        ));
    }

    #[test]
    fn test_select_airs_requires_m1() {
        let listings = vec![
            listing("air-m1", Variant::Air, Some("2020"), true, Some(20000)),
            listing("air-intel", Variant::Air, Some("2020"), false, Some(18000)),
            listing("air-old", Variant::Air, Some("2017"), true, Some(15000)),
            listing("pro", Variant::Pro, Some("2020"), true, Some(24000)),
        ];
        let airs = select_airs(&listings, &[2019, 2020]);
        let urls: Vec<&str> = airs.iter().map(Listing::url).collect();
        assert_eq!(urls, vec!["air-m1"]);
    }

    #[test]
    fn test_select_pros() {
        let listings = vec![
            listing("pro-2019", Variant::Pro, Some("2019"), false, Some(20000)),
            listing("pro-unknown", Variant::Pro, None, false, Some(21000)),
            listing("pro-2016", Variant::Pro, Some("2016"), false, Some(12000)),
            listing("air", Variant::Air, Some("2019"), true, Some(19000)),
        ];
        let pros = select_pros(&listings, &[2019, 2020]);
        let urls: Vec<&str> = pros.iter().map(Listing::url).collect();
        assert_eq!(urls, vec!["pro-2019", "pro-unknown"]);
    }
}
