use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::{AppError, TranslationError};
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::translation::{parse_reply, Batcher, TranslationService};

// @module: Application controller for subtitle translation

/// Where one batch of one language stands
#[derive(Debug)]
pub enum BatchState {
    /// About to be sent without a moderation hint
    Pending,
    /// Sent; `attempt` counts from 1
    Sent { attempt: u32 },
    /// Reply parsed into entries
    Parsed(Vec<SubtitleEntry>),
    /// Reply unusable; will be re-sent with the moderation hint
    Retry { attempt: u32 },
    /// Provider failed; the language stops here
    Aborted(TranslationError),
    /// Too many unusable replies; the language stops here
    Failed { attempts: u32 },
}

/// How the translation of one language ended
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageOutcome {
    /// Every batch was translated
    Completed,
    /// The provider failed on `batch`; later batches were not sent
    Aborted { batch: usize, reason: String },
    /// `batch` never produced a parsable reply
    Failed { batch: usize, attempts: u32 },
}

/// Result of translating the input into one language
#[derive(Debug, Clone)]
pub struct LanguageReport {
    pub language: String,
    pub output_path: PathBuf,
    /// Entries in the source file
    pub expected_entries: usize,
    /// Entries written to the output file
    pub translated_entries: usize,
    pub outcome: LanguageOutcome,
}

impl LanguageReport {
    pub fn counts_match(&self) -> bool {
        self.expected_entries == self.translated_entries
    }
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Sends batches to the provider
    service: TranslationService,
}

impl Controller {
    // @method: Create a new controller with the provider named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config.translation)
            .context("Failed to create translation provider")?;
        Ok(Self { config, service })
    }

    // @method: Create a controller around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        let service = TranslationService::with_provider(provider, &config.translation);
        Self { config, service }
    }

    /// Translate `input_file` into every language of `target_languages`, in order.
    ///
    /// Output files are written next to the input as `<stem>_<language>.srt`.
    /// Nothing is written when the input is not a readable, well-formed `.srt` file.
    pub async fn run(
        &self,
        input_file: &Path,
        output_dir: &Path,
        target_languages: &[String],
    ) -> Result<Vec<LanguageReport>, AppError> {
        info!(
            "Arguments: input {:?}, output {:?}, languages {:?}",
            input_file, output_dir, target_languages
        );

        FileManager::validate_subtitle_input(input_file)?;
        let source = SubtitleCollection::parse(input_file)?;
        info!("Parsed {} subtitles from {:?}", source.len(), input_file);

        let batches = Batcher::new(source.entries(), self.config.translation.get_max_chars_per_request())
            .with_delimiter(self.config.translation.common.batch_delimiter.as_str())
            .get_batches();

        let mut reports = Vec::with_capacity(target_languages.len());
        for language in target_languages {
            let output_path = FileManager::translated_output_path(input_file, language);
            let report = self.translate_language(&batches, language, source.len(), output_path).await?;
            reports.push(report);
        }

        Ok(reports)
    }

    /// Run every batch for one language and write whatever was translated
    async fn translate_language(
        &self,
        batches: &[String],
        language: &str,
        expected_entries: usize,
        output_path: PathBuf,
    ) -> Result<LanguageReport, AppError> {
        let start_time = Instant::now();
        let mut target = SubtitleCollection::new(output_path);
        let mut outcome = LanguageOutcome::Completed;
        let progress_bar = self.create_progress_bar(batches.len(), language);

        info!(
            "Translating into {} with {} ({} batches)",
            language,
            self.service.provider_name(),
            batches.len()
        );

        for (batch_index, batch) in batches.iter().enumerate() {
            Self::display_progress(batch_index, batches.len());

            if batch.trim().is_empty() {
                debug!("Batch {} holds no subtitles, skipping", batch_index);
                progress_bar.inc(1);
                continue;
            }

            match self.translate_single_batch(batch, language, batch_index).await {
                BatchState::Parsed(entries) => {
                    for entry in entries {
                        target.add(entry);
                    }
                    progress_bar.inc(1);
                }
                BatchState::Aborted(e) => {
                    error!("Translation into {} cancelled at batch {}: {}", language, batch_index, e);
                    outcome = LanguageOutcome::Aborted {
                        batch: batch_index,
                        reason: e.to_string(),
                    };
                    break;
                }
                BatchState::Failed { attempts } => {
                    error!(
                        "Batch {} for {} still unparsable after {} attempts, giving up",
                        batch_index, language, attempts
                    );
                    outcome = LanguageOutcome::Failed {
                        batch: batch_index,
                        attempts,
                    };
                    break;
                }
                state => unreachable!("batch ended in non-terminal state {:?}", state),
            }
        }
        progress_bar.finish_and_clear();

        target.write()?;

        if target.len() != expected_entries {
            warn!(
                "Amount of subtitles doesn't match. Actual: {}, expected: {}",
                target.len(),
                expected_entries
            );
        }

        info!(
            "Wrote {} subtitles to {:?} in {:.1}s",
            target.len(),
            target.path,
            start_time.elapsed().as_secs_f64()
        );

        Ok(LanguageReport {
            language: language.to_string(),
            output_path: target.path.clone(),
            expected_entries,
            translated_entries: target.len(),
            outcome,
        })
    }

    /// Drive one batch until it reaches a terminal state
    async fn translate_single_batch(&self, batch: &str, language: &str, batch_index: usize) -> BatchState {
        let common = &self.config.translation.common;
        let mut state = BatchState::Pending;

        loop {
            state = match state {
                BatchState::Pending => BatchState::Sent { attempt: 1 },
                BatchState::Retry { attempt } => match common.max_reply_retries {
                    Some(max) if attempt > max => BatchState::Failed { attempts: attempt },
                    _ => BatchState::Sent { attempt: attempt + 1 },
                },
                BatchState::Sent { attempt } => {
                    let moderation = (attempt > 1).then_some(common.moderation_hint.as_str());
                    let reply = self.service.translate_batch(batch, language, batch_index, moderation).await;

                    match reply.and_then(|text| parse_reply(&text)) {
                        Ok(entries) => {
                            debug!("Batch {} parsed into {} entries", batch_index, entries.len());
                            BatchState::Parsed(entries)
                        }
                        Err(e) if e.is_recoverable() => {
                            warn!("Batch {} attempt {}: {}", batch_index, attempt, e);
                            BatchState::Retry { attempt }
                        }
                        Err(e) => BatchState::Aborted(e),
                    }
                }
                terminal => return terminal,
            };
        }
    }

    // @logs: Batch progress as a percentage
    fn display_progress(current: usize, total: usize) {
        info!("Progress {}% ({} of {})", Self::progress_percent(current, total), current, total);
    }

    // Rounded down; an empty run counts as done
    fn progress_percent(current: usize, total: usize) -> usize {
        if total == 0 { 100 } else { current * 100 / total }
    }

    fn create_progress_bar(&self, total: usize, language: &str) -> ProgressBar {
        if !self.config.progress_bar {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓░"));
        progress_bar.set_message(language.to_string());
        progress_bar
    }
}
