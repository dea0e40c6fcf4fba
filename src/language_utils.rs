use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Translation backends take ISO 639-1 (2-letter) codes, while subtitle
/// catalogs index their archives by ISO 639-2/B (3-letter bibliographic)
/// codes. This module converts between the two and validates what the
/// user typed on the command line.

/// Legacy ISO 639-2/B codes that differ from the 639-2/T code isolang
/// resolves to. Subtitle catalogs use the bibliographic form.
const PART2B_OVERRIDES: &[(&str, &str)] = &[
    ("fra", "fre"), // French
    ("deu", "ger"), // German
    ("nld", "dut"), // Dutch
    ("ell", "gre"), // Greek
    ("zho", "chi"), // Chinese
    ("ces", "cze"), // Czech
    ("isl", "ice"), // Icelandic
    ("sqi", "alb"), // Albanian
    ("hye", "arm"), // Armenian
    ("eus", "baq"), // Basque
    ("mya", "bur"), // Burmese
    ("fas", "per"), // Persian
    ("kat", "geo"), // Georgian
    ("msa", "may"), // Malay
    ("mkd", "mac"), // Macedonian
    ("ron", "rum"), // Romanian
    ("slk", "slo"), // Slovak
    ("cym", "wel"), // Welsh
];

/// Resolve a user-supplied code (2- or 3-letter) to an isolang Language
fn resolve(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized).or_else(|| {
            // Accept a bibliographic code by mapping it back to 639-2/T
            PART2B_OVERRIDES
                .iter()
                .find(|(_, b)| *b == normalized)
                .and_then(|(t, _)| Language::from_639_3(t))
        }),
        _ => None,
    }
}

/// Validate that a code names a real language
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize to the ISO 639-1 (2-letter) form translation backends expect.
/// Falls back to the 639-2/T code for languages without a 2-letter code.
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let lang = resolve(code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    match lang.to_639_1() {
        Some(part1) => Ok(part1.to_string()),
        None => Ok(lang.to_639_3().to_string()),
    }
}

/// The ISO 639-2/B code subtitle catalogs use as their language id
/// (e.g. "en" -> "eng", "fr" -> "fre", "de" -> "ger").
pub fn to_subtitle_catalog_code(code: &str) -> Result<String> {
    let lang = resolve(code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    let part2t = lang.to_639_3();
    let part2b = PART2B_OVERRIDES
        .iter()
        .find(|(t, _)| *t == part2t)
        .map(|(_, b)| *b)
        .unwrap_or(part2t);

    Ok(part2b.to_string())
}

/// Check if two language codes name the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve(code1), resolve(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = resolve(code)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
