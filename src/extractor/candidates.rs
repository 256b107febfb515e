// Ordered candidate lists; earlier entries win on a title/URL hit.
use crate::model::Candidate;
use std::ops::RangeInclusive;

/// Model years the extractor knows about.
pub const MODEL_YEARS: RangeInclusive<u16> = 2010..=2021;

const RAM: &[&str] = &["8", "8gb", "8 gb", "16", "16gb", "16 gb", "32", "32gb", "32 gb"];

// "1tb" and "1000gb" normalize to different digits and are reported apart.
const STORAGE: &[&str] = &[
    "128", "128gb", "128 gb", "256", "256gb", "256 gb", "512", "512gb", "512 gb", "1tb", "1 tb",
    "1000 gb", "1000gb",
];

const TOUCHBAR: &[&str] = &["touchbar", "touch bar"];

pub fn years() -> Vec<Candidate> {
    MODEL_YEARS.map(|year| Candidate::numeric(year.to_string())).collect()
}

pub fn ram() -> Vec<Candidate> {
    RAM.iter().copied().map(Candidate::numeric).collect()
}

pub fn storage() -> Vec<Candidate> {
    STORAGE.iter().copied().map(Candidate::numeric).collect()
}

pub fn touchbar() -> Vec<Candidate> {
    TOUCHBAR.iter().copied().map(Candidate::text).collect()
}
