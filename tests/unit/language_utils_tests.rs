/*!
 * Tests for language utility functions
 */

use subline::language_utils::{
    LanguageCodeType, display_name, get_language_name, language_codes_match, normalize_to_part2t,
    validate_language_code,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("ko").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("kor").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("eng").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);

    // Whitespace and case
    assert_eq!(validate_language_code(" KO ").unwrap(), LanguageCodeType::Part1);
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_normalize_to_part2t_shouldConvertAllFormats() {
    assert_eq!(normalize_to_part2t("ko").unwrap(), "kor");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("ENG").unwrap(), "eng");
    assert!(normalize_to_part2t("zz").is_err());
}

#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("ko", "kor"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("ko", "ja"));
    assert!(!language_codes_match("ko", "invalid"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ko").unwrap(), "Korean");
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert!(get_language_name("qq").is_err());
}

#[test]
fn test_display_name_withUnknownCode_shouldReturnTrimmedCode() {
    assert_eq!(display_name("ja"), "Japanese");
    assert_eq!(display_name(" tlh-x "), "tlh-x");
}
