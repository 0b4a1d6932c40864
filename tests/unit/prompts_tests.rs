/*!
 * Tests for prompt wording
 */

use srtglot::translation::prompts::{
    TranslationPromptBuilder, CLOSE_MARKER, DEFAULT_MODERATION_HINT, OPEN_MARKER,
};

const NOTICE: &str = "Text to translate is placed between symbols [[ and ]]";

#[test]
fn test_instructions_withFirstBatch_shouldUseFullInstruction() {
    let prompts = TranslationPromptBuilder::with_seed(1);
    let text = prompts.instructions("German", 0, None);

    assert!(text.starts_with("Here is a part of SRT file. Translate it into German."));
    assert!(text.contains("Remember that I want you to translate the content to German."));
    assert!(text.ends_with(NOTICE));
}

#[test]
fn test_instructions_withLaterBatch_shouldCombineFillerPhrases() {
    let prompts = TranslationPromptBuilder::with_seed(3);

    for batch_index in 1..20 {
        let text = prompts.instructions("French", batch_index, None);

        let encouragement = TranslationPromptBuilder::encouragements()
            .iter()
            .find(|e| text.starts_with(*e));
        assert!(encouragement.is_some(), "no encouragement in {:?}", text);

        let rest = &text[encouragement.unwrap().len()..];
        assert!(
            TranslationPromptBuilder::format_reminders().iter().any(|r| rest.starts_with(r)),
            "no format reminder in {:?}",
            text
        );
        assert!(text.contains("French"));
        assert!(text.ends_with(NOTICE));
    }
}

#[test]
fn test_instructions_withModeration_shouldStartWithHint() {
    let prompts = TranslationPromptBuilder::with_seed(5);

    for batch_index in [0, 4] {
        let text = prompts.instructions("Polish", batch_index, Some(DEFAULT_MODERATION_HINT));

        assert!(text.starts_with(DEFAULT_MODERATION_HINT));
        assert!(!text.starts_with("Here is a part of SRT file"));
        assert!(text.contains("Polish"));
        assert!(TranslationPromptBuilder::encouragements()
            .iter()
            .all(|e| !text.starts_with(e)));
    }
}

#[test]
fn test_with_seed_withSameSeed_shouldProduceSamePhrasing() {
    let first = TranslationPromptBuilder::with_seed(42);
    let second = TranslationPromptBuilder::from_seed(Some(42));

    for batch_index in 1..10 {
        assert_eq!(
            first.instructions("Spanish", batch_index, None),
            second.instructions("Spanish", batch_index, None)
        );
    }
}

#[test]
fn test_wrap_payload_withText_shouldPlaceTextBetweenMarkers() {
    let prompt = TranslationPromptBuilder::wrap_payload("Translate.", "1\na --> b\nHi");

    assert_eq!(prompt, format!("Translate.\n{}\n1\na --> b\nHi\n{}", OPEN_MARKER, CLOSE_MARKER));
}
