// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use srtglot::app_config::{self, Config, TranslationProvider};
use srtglot::app_controller::{Controller, LanguageOutcome, LanguageReport};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    OpenAI,
    LMStudio,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an SRT file into one or more languages
    Translate(TranslateArgs),

    /// Generate shell completions for srtglot
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct TranslateArgs {
    /// Subtitle file to translate (.srt)
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Output directory (outputs are written next to the input file)
    #[arg(value_name = "OUTPUT_DIRECTORY")]
    output_directory: PathBuf,

    /// Target languages, e.g. 'de', 'fr' or 'Brazilian Portuguese'
    #[arg(value_name = "TARGET_LANGUAGES", required = true, num_args = 1..)]
    target_languages: Vec<String>,

    #[command(flatten)]
    options: TranslateOptions,
}

#[derive(clap::Args, Debug, Clone)]
struct TranslateOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "OPEN_AI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum characters per request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Maximum re-sends of a batch whose reply is not valid SRT
    #[arg(long)]
    max_retries: Option<u32>,

    /// Seed for prompt phrasing
    #[arg(long)]
    seed: Option<u64>,
}

/// srtglot - SRT subtitle translation with LLMs
///
/// Splits an SRT file into batches, has an LLM translate each batch and writes
/// one `<name>_<language>.srt` file per target language.
#[derive(Parser, Debug)]
#[command(name = "srtglot")]
#[command(version)]
#[command(about = "Translate SRT subtitles with an LLM")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "srtglot translates SRT subtitle files with chat-completion models.

EXAMPLES:
    srtglot movie.srt out de                    # Translate to German (movie_de.srt)
    srtglot movie.srt out de fr es              # Several languages, one after another
    srtglot -p ollama -m llama3.2:3b movie.srt out pl
    srtglot --log-level debug movie.srt out ja
    srtglot completions bash > srtglot.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The OpenAI key is read from OPEN_AI_API_KEY.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key, default)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)
    ollama    - Local Ollama server (default: llama3.2:3b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file to translate (.srt)
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Output directory (outputs are written next to the input file)
    #[arg(value_name = "OUTPUT_DIRECTORY")]
    output_directory: Option<PathBuf>,

    /// Target languages, e.g. 'de', 'fr' or 'Brazilian Portuguese'
    #[arg(value_name = "TARGET_LANGUAGES", num_args = 1..)]
    target_languages: Vec<String>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Custom logger implementation, filtered by `log::max_level()`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtglot", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_file = cli.input_file.ok_or_else(|| {
                anyhow!("INPUT_FILE is required when no subcommand is specified")
            })?;
            let output_directory = cli.output_directory.ok_or_else(|| {
                anyhow!("OUTPUT_DIRECTORY is required when no subcommand is specified")
            })?;
            if cli.target_languages.is_empty() {
                return Err(anyhow!("at least one target language is required"));
            }

            run_translate(TranslateArgs {
                input_file,
                output_directory,
                target_languages: cli.target_languages,
                options: cli.options,
            })
            .await
        }
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let options = &args.options;

    // Apply the command line level before the config file is read
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config)?;
    apply_overrides(&mut config, options);

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    info!(
        "Using {} with model {}",
        config.translation.provider.display_name(),
        config.translation.get_model()
    );

    let controller = Controller::with_config(config)?;
    let reports = controller
        .run(&args.input_file, &args.output_directory, &args.target_languages)
        .await
        .context("Translation failed")?;

    print_summary(&reports);

    Ok(())
}

// Command line values win over the config file
fn apply_overrides(config: &mut Config, options: &TranslateOptions) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    let provider_config = config.translation.active_provider_config_mut();
    if let Some(model) = &options.model {
        provider_config.model = model.clone();
    }
    if let Some(api_key) = options.api_key.as_ref().filter(|key| !key.is_empty()) {
        provider_config.api_key = api_key.clone();
    }
    if let Some(batch_size) = options.batch_size {
        provider_config.max_chars_per_request = batch_size;
    }

    let common = &mut config.translation.common;
    if let Some(max_retries) = options.max_retries {
        common.max_reply_retries = Some(max_retries);
    }
    if options.seed.is_some() {
        common.prompt_seed = options.seed;
    }
}

fn print_summary(reports: &[LanguageReport]) {
    for report in reports {
        match &report.outcome {
            LanguageOutcome::Completed if report.counts_match() => {
                info!("Success: {} -> {:?}", report.language, report.output_path);
            }
            LanguageOutcome::Completed => {
                warn!(
                    "Done with differences: {} -> {:?} ({} of {} subtitles)",
                    report.language, report.output_path, report.translated_entries, report.expected_entries
                );
            }
            LanguageOutcome::Aborted { batch, reason } => {
                error!(
                    "Incomplete: {} -> {:?} stopped at batch {} ({})",
                    report.language, report.output_path, batch, reason
                );
            }
            LanguageOutcome::Failed { batch, attempts } => {
                error!(
                    "Incomplete: {} -> {:?} batch {} failed after {} attempts",
                    report.language, report.output_path, batch, attempts
                );
            }
        }
    }
}
