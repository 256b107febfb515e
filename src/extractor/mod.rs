// Attribute extractor: turns the text layers of a listing into structured fields.

pub mod candidates;
pub mod cpu;

pub use cpu::extract_cpu_ghz;

use crate::matcher;
use crate::model::{Candidate, ExtractError, FieldValue, ListingAttributes, MatchResult, TextLayers, Variant};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*)\]").unwrap());

/// Extracts every attribute of one listing.
///
/// Every query runs against the layers as given. The title keeps its
/// bracketed posting date, so a year inside it counts as title evidence.
pub fn extract(layers: &TextLayers) -> Result<ListingAttributes, ExtractError> {
    Ok(ListingAttributes {
        date: extract_date(&layers.title)?,
        variant: classify_variant(layers)?,
        year: reduce_candidates(layers, &candidates::years())?,
        ram: reduce_candidates(layers, &candidates::ram())?,
        storage: reduce_candidates(layers, &candidates::storage())?,
        touchbar: reduce_candidates(layers, &candidates::touchbar())?,
        m1_chip: matcher::is_present(layers, "m1")?,
        cpu_ghz: extract_cpu_ghz(&layers.body),
        url: layers.url.clone(),
    })
}

/// Posting date from the bracketed token of the title, e.g. "[15.3.2021]".
pub fn extract_date(title: &str) -> Result<String, ExtractError> {
    DATE_TOKEN
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtractError::MalformedTitle(title.to_string()))
}

/// "air" anywhere makes it an Air, everything else is a Pro.
///
/// The "macbook pro" evidence is looked up and logged but never changes the
/// outcome: there is no third, undecided variant.
pub fn classify_variant(layers: &TextLayers) -> Result<Variant, ExtractError> {
    let pro = matcher::find(layers, "macbook pro")?;
    let air = matcher::find(layers, "air")?;
    debug!(url = %layers.url, ?pro, ?air, "variant evidence");

    Ok(if air.is_found() { Variant::Air } else { Variant::Pro })
}

/// Reduces an ordered candidate list to one field value.
///
/// The first candidate found in the title or URL wins outright. Otherwise all
/// body-only hits are collected and collapsed by [`FieldValue::from_matches`].
pub fn reduce_candidates(
    layers: &TextLayers,
    candidates: &[Candidate],
) -> Result<FieldValue<String>, ExtractError> {
    let mut body_hits = Vec::new();

    for candidate in candidates {
        match matcher::find(layers, candidate.phrase())? {
            MatchResult::FoundInTitleOrUrl => {
                return Ok(FieldValue::Single(candidate.normalized().to_string()));
            }
            MatchResult::FoundInBodyOnly => body_hits.push(candidate.normalized().to_string()),
            MatchResult::NotFound => {}
        }
    }

    Ok(FieldValue::from_matches(body_hits))
}
