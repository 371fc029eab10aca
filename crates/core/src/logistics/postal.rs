use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostalCountry {
    France,
    Belgium,
    Luxembourg,
    Switzerland,
}

struct PostalPattern {
    country: PostalCountry,
    prefix: Option<&'static str>,
    digits: usize,
}

// Unprefixed four-digit codes resolve to the first matching entry. French codes
// carry no prefix so that every French match is also a code `classify_zone` reads.
const POSTAL_PATTERNS: &[PostalPattern] = &[
    PostalPattern { country: PostalCountry::France, prefix: None, digits: 5 },
    PostalPattern { country: PostalCountry::Belgium, prefix: None, digits: 4 },
    PostalPattern { country: PostalCountry::Belgium, prefix: Some("B-"), digits: 4 },
    PostalPattern { country: PostalCountry::Luxembourg, prefix: Some("L-"), digits: 4 },
    PostalPattern { country: PostalCountry::Switzerland, prefix: Some("CH-"), digits: 4 },
];

/// Loose postal code check: returns the first country whose pattern the code fits.
pub fn plausible_postal_country(postal_code: &str) -> Option<PostalCountry> {
    let compact: String = postal_code
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if compact.is_empty() {
        return None;
    }

    POSTAL_PATTERNS
        .iter()
        .find(|pattern| {
            let digits = match pattern.prefix {
                Some(prefix) => match compact.strip_prefix(prefix) {
                    Some(rest) => rest,
                    None => return false,
                },
                None => compact.as_str(),
            };
            digits.len() == pattern.digits && digits.bytes().all(|byte| byte.is_ascii_digit())
        })
        .map(|pattern| pattern.country)
}
