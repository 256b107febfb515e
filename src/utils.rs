// Utility functions

/// Keeps only the ASCII digits of `text` ("15 000 Kč" -> "15000").
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Parses the digits of `text` as a number, `None` when there are none.
pub fn parse_digits(text: &str) -> Option<u64> {
    digits_only(text).parse().ok()
}
