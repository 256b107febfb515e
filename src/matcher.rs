// Evidence matcher: whole-word phrase search across ranked text layers
use crate::model::{ExtractError, MatchResult, TextLayers};
use regex::Regex;

/// Builds a whole-word pattern for `phrase`. Special characters are escaped,
/// so the phrase is always matched literally.
pub fn word_pattern(phrase: &str) -> Result<Regex, ExtractError> {
    Regex::new(&format!(r"\b{}\b", regex::escape(phrase))).map_err(|source| {
        ExtractError::InvalidPattern {
            phrase: phrase.to_string(),
            source,
        }
    })
}

/// Searches `phrase` in the URL, then the title, then the body.
/// URL and title are equally authoritative and both outrank the body.
pub fn find(layers: &TextLayers, phrase: &str) -> Result<MatchResult, ExtractError> {
    let pattern = word_pattern(phrase)?;

    if pattern.is_match(&layers.url) || pattern.is_match(&layers.title) {
        return Ok(MatchResult::FoundInTitleOrUrl);
    }
    if pattern.is_match(&layers.body) {
        return Ok(MatchResult::FoundInBodyOnly);
    }
    Ok(MatchResult::NotFound)
}

/// True if `phrase` occurs in any layer.
pub fn is_present(layers: &TextLayers, phrase: &str) -> Result<bool, ExtractError> {
    Ok(find(layers, phrase)?.is_found())
}
