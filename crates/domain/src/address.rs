use fancy_regex::Regex;
use std::sync::LazyLock;

use crate::DomainError;

/// Street-suffix substitutions, applied to whole words only.
const SUFFIXES: &[(&str, &str)] = &[
    ("STREET", "ST"),
    ("AVENUE", "AVE"),
    ("BOULEVARD", "BLVD"),
    ("DRIVE", "DR"),
    ("ROAD", "RD"),
    ("LANE", "LN"),
    ("COURT", "CT"),
    ("PLACE", "PL"),
    ("TERRACE", "TER"),
    ("CIRCLE", "CIR"),
    ("PARKWAY", "PKWY"),
    ("HIGHWAY", "HWY"),
    ("SQUARE", "SQ"),
    ("TRAIL", "TRL"),
];

/// `STREET, CITY, ST 12345`
static STRICT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([^,]+),\s*([^,]+),\s*([A-Z]{2})\s+(\d{5})$").ok());

pub const MISSING_STREET_OR_CITY: &str = "street address and city are required";

/// Free-text address split into its canonical components.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl ParsedAddress {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.street.is_empty() || self.city.is_empty() {
            return Err(DomainError::InvalidAddress(MISSING_STREET_OR_CITY.to_string()));
        }
        Ok(())
    }
}

/// Uppercases, trims, collapses whitespace and canonicalizes street suffixes.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    let mut out = String::with_capacity(collapsed.len());
    let mut word = String::new();

    for c in collapsed.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush_word(&mut word, &mut out);
            out.push(c);
        }
    }
    flush_word(&mut word, &mut out);

    out
}

fn flush_word(word: &mut String, out: &mut String) {
    if word.is_empty() {
        return;
    }
    match SUFFIXES.iter().find(|(long, _)| *long == word.as_str()) {
        Some((_, short)) => out.push_str(short),
        None => out.push_str(word),
    }
    word.clear();
}

/// Parses free text into (street, city, state, zip).
///
/// Tries the strict `STREET, CITY, ST 12345` form first, then falls back to
/// comma segments, then treats the whole input as the street. Missing
/// components come back empty; call [`ParsedAddress::validate`] to enforce
/// street and city.
pub fn parse(text: &str) -> ParsedAddress {
    let normalized = normalize(text);

    if let Some(parsed) = parse_strict(&normalized) {
        return parsed;
    }

    let segments: Vec<&str> = normalized
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [street, city] => ParsedAddress {
            street: street.to_string(),
            city: city.to_string(),
            ..Default::default()
        },
        [street, city, rest @ ..] if !rest.is_empty() => {
            let (state, zip) = guess_state_zip(&rest.join(" "));
            ParsedAddress {
                street: street.to_string(),
                city: city.to_string(),
                state,
                zip,
            }
        }
        _ => ParsedAddress {
            street: normalized.trim_matches(|c: char| c == ',' || c.is_whitespace()).to_string(),
            ..Default::default()
        },
    }
}

fn parse_strict(normalized: &str) -> Option<ParsedAddress> {
    let regex = STRICT_PATTERN.as_ref()?;
    let caps = regex.captures(normalized).ok()??;
    let group = |i: usize| caps.get(i).map(|m| m.as_str().trim().to_string()).unwrap_or_default();

    Some(ParsedAddress {
        street: group(1),
        city: group(2),
        state: group(3),
        zip: group(4),
    })
}

/// A two-letter token is the state, a five-digit token the zip; order-independent.
fn guess_state_zip(remainder: &str) -> (String, String) {
    let mut state = String::new();
    let mut zip = String::new();

    for token in remainder.split_whitespace() {
        if state.is_empty() && token.len() == 2 && token.chars().all(|c| c.is_ascii_alphabetic()) {
            state = token.to_string();
        } else if zip.is_empty() && token.len() == 5 && token.chars().all(|c| c.is_ascii_digit()) {
            zip = token.to_string();
        }
    }

    (state, zip)
}
