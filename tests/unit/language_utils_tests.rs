/*!
 * Tests for language utility functions
 */

use srtglot::language_utils::{get_language_name, normalize_to_part2t, prompt_language_name};

/// Test ISO 639-1 and ISO 639-2 normalization
#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldNormalize() {
    assert_eq!(normalize_to_part2t("de").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("FR").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("zho").unwrap(), "zho");
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("german").is_err());
}

#[test]
fn test_get_language_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("fre").unwrap(), "French");
}

#[test]
fn test_prompt_language_name_withFreeFormLabel_shouldKeepLabel() {
    assert_eq!(prompt_language_name("de"), "German");
    assert_eq!(prompt_language_name("Brazilian Portuguese"), "Brazilian Portuguese");
    assert_eq!(prompt_language_name("  Klingon "), "Klingon");
}
