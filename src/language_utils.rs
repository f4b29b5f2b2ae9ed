use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Requests name languages loosely ("ko", "kor", "KO"); the prompt
/// selector and the generic template both need a canonical form and a
/// human readable name.
/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(part2b, _)| *part2b == code)
        .map(|(_, part2t)| *part2t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part2T),
        3 if part2b_to_part2t(&normalized_code).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Resolve a code to its isolang entry
fn resolve(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = part2b_to_part2t(&normalized_code).unwrap_or(&normalized_code);
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    Ok(resolve(code)?.to_639_3().to_string())
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(resolve(code)?.to_name().to_string())
}

/// Display name for prompts, falling back to the raw code for unknown input
pub fn display_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.trim().to_string())
}
