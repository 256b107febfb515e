use crate::model::FieldValue;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Plausible CPU clock speeds; screen sizes and the like fall outside.
const GHZ_RANGE: RangeInclusive<f64> = 1.0..=4.0;

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9][.,][0-9]").unwrap());

/// Scans the description for "d.d" / "d,d" numbers that look like a clock
/// speed in GHz. The title and URL are never consulted.
pub fn extract_cpu_ghz(body: &str) -> FieldValue<f64> {
    let speeds = DECIMAL
        .find_iter(body)
        .filter_map(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .filter(|ghz| GHZ_RANGE.contains(ghz))
        .collect();

    FieldValue::from_matches(speeds)
}
