/*!
 * Prompt templates for batch translation.
 *
 * The first batch of a language gets an explicit instruction; later batches are
 * phrased from small fixed phrase sets so consecutive requests do not repeat
 * word for word.
 */

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Opens the translatable payload inside a prompt
pub const OPEN_MARKER: &str = "[[";

/// Closes the translatable payload inside a prompt
pub const CLOSE_MARKER: &str = "]]";

/// Corrective instruction sent after a reply that could not be parsed
pub const DEFAULT_MODERATION_HINT: &str =
    "The output is not what I asked you. Please stick to the original prompt. Focus on translating the content. ";

/// Opening instruction for the first batch of a language.
const FIRST_BATCH: &str = "Here is a part of SRT file. Translate it into {target_language}. Keep the original formatting of SRT file.\nRemember that I want you to translate the content to {target_language}.\n";

const ENCOURAGEMENTS: &[&str] = &[
    "You're doing a good job! ",
    "Good job! ",
    "Wonderful! ",
    "Great! ",
    "Nice! ",
    "Sounds good! ",
];

const FORMAT_REMINDERS: &[&str] = &[
    "Keep the original SRT format. ",
    "Original text is in SRT format. Make output in SRT format too. ",
    "Can you maintain SRT format? ",
    "Stick to the SRT format please. ",
];

const REQUESTS: &[&str] = &[
    "Here is part of that text to translate to {target_language}. ",
    "Here is some text to translate to {target_language}. ",
    "Can you translate that for me to {target_language}? ",
    "There is some translation I need. Can you help me translating to {target_language}? ",
];

const PAYLOAD_NOTICE: &str = "Text to translate is placed between symbols [[ and ]]";

/// Builds the instruction text and wraps payloads for the provider.
#[derive(Debug)]
pub struct TranslationPromptBuilder {
    rng: Mutex<StdRng>,
}

impl TranslationPromptBuilder {
    /// Phrase choice seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible phrase choice
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seeded when `seed` is set, OS-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    /// Instruction text placed before the payload.
    pub fn instructions(
        &self,
        target_language: &str,
        batch_index: usize,
        moderation: Option<&str>,
    ) -> String {
        let mut prompt = if batch_index == 0 && moderation.is_none() {
            FIRST_BATCH.replace("{target_language}", target_language)
        } else {
            let mut rng = self.rng.lock();
            let mut prompt = match moderation {
                Some(hint) => hint.to_string(),
                None => Self::pick(ENCOURAGEMENTS, &mut rng).to_string(),
            };
            prompt.push_str(Self::pick(FORMAT_REMINDERS, &mut rng));
            prompt.push_str(&Self::pick(REQUESTS, &mut rng).replace("{target_language}", target_language));
            prompt
        };

        prompt.push_str(PAYLOAD_NOTICE);
        prompt
    }

    /// Append the payload between the bracket markers.
    pub fn wrap_payload(instructions: &str, text: &str) -> String {
        format!("{}\n{}\n{}\n{}", instructions, OPEN_MARKER, text, CLOSE_MARKER)
    }

    fn pick(phrases: &'static [&'static str], rng: &mut StdRng) -> &'static str {
        phrases.choose(rng).copied().unwrap_or(phrases[0])
    }

    /// Phrase sets, exposed for callers that want to check which variant was used
    pub fn encouragements() -> &'static [&'static str] {
        ENCOURAGEMENTS
    }

    pub fn format_reminders() -> &'static [&'static str] {
        FORMAT_REMINDERS
    }
}

impl Default for TranslationPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
