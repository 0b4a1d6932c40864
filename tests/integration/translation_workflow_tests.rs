/*!
 * Integration tests for the translation workflow
 *
 * These run the controller end to end on real files with a mock provider.
 */

use std::fs;
use std::sync::Arc;
use anyhow::Result;

use srtglot::app_controller::{Controller, LanguageOutcome};
use srtglot::errors::{AppError, ProviderError, SubtitleError};
use srtglot::providers::mock::MockProvider;
use srtglot::translation::prompts::DEFAULT_MODERATION_HINT;
use crate::common;

fn translated(index: usize, text: &str) -> String {
    format!("{}\n00:00:{:02},000 --> 00:00:{:02},000\n{}", index, index - 1, index, text)
}

/// The echo provider hands back every batch untouched, so each output equals the input
#[tokio::test]
async fn test_run_withEchoProvider_shouldWriteIdenticalFilePerLanguage() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "episode.srt", &common::numbered_srt(8))?;

    let mock = MockProvider::echo();
    let controller = Controller::with_provider(common::test_config(100), Arc::new(mock.clone()));
    let languages = vec!["de".to_string(), "fr".to_string()];

    let reports = controller.run(&input, temp_dir.path(), &languages).await?;

    assert_eq!(reports.len(), 2);
    for (report, language) in reports.iter().zip(&languages) {
        assert_eq!(&report.language, language);
        assert_eq!(report.outcome, LanguageOutcome::Completed);
        assert!(report.counts_match());
        assert_eq!(report.output_path, temp_dir.path().join(format!("episode_{}.srt", language)));
        assert_eq!(fs::read_to_string(&report.output_path)?, common::numbered_srt(8));
    }

    // Languages run one after another, each starting with the full instruction
    let prompts = mock.prompts();
    let batches_per_language = prompts.len() / 2;
    assert!(batches_per_language > 1);
    assert!(prompts[0].contains("Translate it into German."));
    assert!(prompts[batches_per_language].contains("Translate it into French."));
    assert!(prompts[1..batches_per_language].iter().all(|p| !p.contains("Translate it into")));
    Ok(())
}

#[tokio::test]
async fn test_run_withTranslatedReplies_shouldWriteTranslations() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "clip.srt", &common::numbered_srt(2))?;

    let mock = MockProvider::scripted(vec![Ok(format!(
        "{}\n\n{}",
        translated(1, "Untertitel 1"),
        translated(2, "Untertitel 2")
    ))]);
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock.clone()));

    let reports = controller.run(&input, temp_dir.path(), &["German".to_string()]).await?;

    let written = fs::read_to_string(&reports[0].output_path)?;
    assert_eq!(
        written,
        format!("{}\n\n{}\n\n", translated(1, "Untertitel 1"), translated(2, "Untertitel 2"))
    );
    assert_eq!(mock.request_count(), 1);
    assert_eq!(mock.requests()[0].temperature, 0.0);
    Ok(())
}

/// A provider failure on batch 2 of 5 keeps the output of batches 0 and 1
#[tokio::test]
async fn test_run_withProviderFailureOnThirdBatch_shouldAbortAndKeepEarlierBatches() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "film.srt", &common::numbered_srt(5))?;

    let mock = MockProvider::scripted(vec![
        Ok(translated(1, "Eins")),
        Ok(translated(2, "Zwei")),
        Err(ProviderError::ConnectionError("connection reset".to_string())),
        Ok(translated(4, "Vier")),
        Ok(translated(5, "Fünf")),
    ]);
    let controller = Controller::with_provider(common::test_config(60), Arc::new(mock.clone()));

    let reports = controller.run(&input, temp_dir.path(), &["de".to_string()]).await?;
    let report = &reports[0];

    assert!(matches!(report.outcome, LanguageOutcome::Aborted { batch: 2, .. }));
    assert_eq!(mock.request_count(), 3);
    assert_eq!(report.expected_entries, 5);
    assert_eq!(report.translated_entries, 2);
    assert_eq!(
        fs::read_to_string(&report.output_path)?,
        format!("{}\n\n{}\n\n", translated(1, "Eins"), translated(2, "Zwei"))
    );
    Ok(())
}

#[tokio::test]
async fn test_run_withAbortedLanguage_shouldStillTranslateNextLanguage() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "film.srt", &common::numbered_srt(1))?;

    let mock = MockProvider::scripted(vec![
        Err(ProviderError::ApiError { status_code: 500, message: "boom".to_string() }),
        Ok(translated(1, "Un")),
    ]);
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock));

    let reports = controller
        .run(&input, temp_dir.path(), &["de".to_string(), "fr".to_string()])
        .await?;

    assert!(matches!(reports[0].outcome, LanguageOutcome::Aborted { batch: 0, .. }));
    assert_eq!(fs::read_to_string(&reports[0].output_path)?, "");
    assert_eq!(reports[1].outcome, LanguageOutcome::Completed);
    assert_eq!(reports[1].translated_entries, 1);
    Ok(())
}

/// A short paragraph triggers a retry with the moderation hint instead of an abort
#[tokio::test]
async fn test_run_withMalformedReply_shouldRetryWithModerationHint() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "show.srt", &common::numbered_srt(1))?;

    let mock = MockProvider::scripted(vec![
        Ok("1\n00:00:00,000 --> 00:00:01,000".to_string()),
        Ok(format!("[[\n\n{}\n\n]]", translated(1, "Hola"))),
    ]);
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock.clone()));

    let reports = controller.run(&input, temp_dir.path(), &["es".to_string()]).await?;

    assert_eq!(reports[0].outcome, LanguageOutcome::Completed);
    assert_eq!(reports[0].translated_entries, 1);

    let prompts = mock.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(!prompts[0].contains(DEFAULT_MODERATION_HINT));
    assert!(prompts[1].starts_with(DEFAULT_MODERATION_HINT));
    assert!(prompts[1].contains("Spanish"));
    assert_eq!(
        MockProvider::extract_payload(&prompts[0]),
        MockProvider::extract_payload(&prompts[1])
    );
    Ok(())
}

#[tokio::test]
async fn test_run_withPersistentlyMalformedReplies_shouldFailAfterRetryLimit() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "show.srt", &common::numbered_srt(1))?;

    let mock = MockProvider::scripted((0..10).map(|_| Ok("I cannot do that.".to_string())).collect());
    let mut config = common::test_config(2000);
    config.translation.common.max_reply_retries = Some(2);
    let controller = Controller::with_provider(config, Arc::new(mock.clone()));

    let reports = controller.run(&input, temp_dir.path(), &["it".to_string()]).await?;

    assert_eq!(reports[0].outcome, LanguageOutcome::Failed { batch: 0, attempts: 3 });
    assert_eq!(mock.request_count(), 3);
    assert!(reports[0].output_path.exists());
    Ok(())
}

/// An empty completion is re-sent instead of dropping the batch
#[tokio::test]
async fn test_run_withEmptyReply_shouldRetryBatch() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "p.srt", &common::numbered_srt(1))?;

    let mock = MockProvider::scripted(vec![Ok(String::new()), Ok(translated(1, "Hallo"))]);
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock.clone()));

    let reports = controller.run(&input, temp_dir.path(), &["de".to_string()]).await?;

    assert_eq!(reports[0].outcome, LanguageOutcome::Completed);
    assert_eq!(reports[0].translated_entries, 1);
    assert_eq!(mock.request_count(), 2);
    assert!(mock.prompts()[1].starts_with(DEFAULT_MODERATION_HINT));
    assert_eq!(
        fs::read_to_string(&reports[0].output_path)?,
        format!("{}\n\n", translated(1, "Hallo"))
    );
    Ok(())
}

/// Without a retry limit a batch is re-sent until a reply parses
#[tokio::test]
async fn test_run_withUnboundedRetries_shouldKeepRetryingPastDefaultLimit() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "show.srt", &common::numbered_srt(1))?;

    let mut script: Vec<Result<String, ProviderError>> =
        (0..15).map(|_| Ok("Sorry, I can't.".to_string())).collect();
    script.push(Ok(translated(1, "Ciao")));
    let mock = MockProvider::scripted(script);

    let mut config = common::test_config(2000);
    config.translation.common.max_reply_retries = None;
    let controller = Controller::with_provider(config, Arc::new(mock.clone()));

    let reports = controller.run(&input, temp_dir.path(), &["it".to_string()]).await?;

    assert_eq!(reports[0].outcome, LanguageOutcome::Completed);
    assert_eq!(reports[0].translated_entries, 1);
    assert_eq!(mock.request_count(), 16);
    Ok(())
}

/// A reply with fewer entries than the source is written anyway
#[tokio::test]
async fn test_run_withMissingEntriesInReply_shouldWriteNonEmptyFile() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", &common::numbered_srt(3))?;

    let mock = MockProvider::scripted(vec![Ok(format!(
        "{}\n\n{}",
        translated(1, "Ciao"),
        translated(2, "Arrivederci")
    ))]);
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock));

    let reports = controller.run(&input, temp_dir.path(), &["it".to_string()]).await?;
    let report = &reports[0];

    assert_eq!(report.outcome, LanguageOutcome::Completed);
    assert!(!report.counts_match());
    assert_eq!(report.translated_entries, 2);
    assert!(!fs::read_to_string(&report.output_path)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_run_withNonSrtInput_shouldWriteNothing() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.txt", common::SAMPLE_SRT)?;

    let mock = MockProvider::echo();
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock.clone()));

    let result = controller.run(&input, temp_dir.path(), &["de".to_string()]).await;

    assert!(matches!(result, Err(AppError::Subtitle(SubtitleError::InvalidInput { .. }))));
    assert_eq!(mock.request_count(), 0);
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_run_withMalformedSourceFile_shouldFailBeforeTranslating() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "broken.srt", "1\n00:00:01,000 --> 00:00:02,000\n\n")?;

    let mock = MockProvider::echo();
    let controller = Controller::with_provider(common::test_config(2000), Arc::new(mock.clone()));

    let result = controller.run(&input, temp_dir.path(), &["de".to_string()]).await;

    assert!(matches!(result, Err(AppError::Subtitle(SubtitleError::MalformedBlock { block: 1, .. }))));
    assert_eq!(mock.request_count(), 0);
    assert!(!temp_dir.path().join("broken_de.srt").exists());
    Ok(())
}
