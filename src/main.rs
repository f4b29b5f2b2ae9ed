// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use subline::app_config::{self, Config, FailurePolicy};
use subline::app_controller::Controller;
use subline::errors::AppError;

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

/// CLI Wrapper for FailurePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFailurePolicy {
    Fallback,
    Abort,
}

impl From<CliFailurePolicy> for FailurePolicy {
    fn from(policy: CliFailurePolicy) -> Self {
        match policy {
            CliFailurePolicy::Fallback => FailurePolicy::Fallback,
            CliFailurePolicy::Abort => FailurePolicy::Abort,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a segment file
    Translate(TranslateArgs),

    /// Generate shell completions for subline
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// JSON file with a translation request or a bare segment list
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (defaults to INPUT.translated.json)
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'ko')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'ko')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Segments per provider request
    #[arg(long)]
    batch_size: Option<usize>,

    /// Batches translated concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// What to do when a batch exhausts its retries
    #[arg(long, value_enum)]
    failure_policy: Option<CliFailurePolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subline - batch translation of timed text segments
#[derive(Parser, Debug)]
#[command(name = "subline")]
#[command(version)]
#[command(about = "Translate subtitle segments in batches through an LLM provider")]
#[command(long_about = "subline translates timed text segments in fixed-size batches with bounded concurrency.

EXAMPLES:
    subline translate talk.json                     # en -> ko using conf.json
    subline translate -s ko -t en talk.json         # Korean to English
    subline translate --batch-size 5 talk.json      # Smaller batches
    subline completions bash > subline.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. The API key can be
    provided through the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
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
    // The max level is adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subline", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => Ok(run_translate(args).await?),
    }
}

async fn run_translate(options: TranslateArgs) -> Result<(), AppError> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(&options.input_path));

    let response = controller
        .run(
            &options.input_path,
            &output_path,
            options.source_language.as_deref(),
            options.target_language.as_deref(),
        )
        .await?;

    info!("Translated {} segments", response.meta.translated_count);
    Ok(())
}

/// Load or create the configuration, then apply environment and CLI overrides
fn load_config(options: &TranslateArgs) -> Result<Config, AppError> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::load(config_path).map_err(|e| AppError::Config(format!("{:#}", e)))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path.display()
        );
        let config = Config::default();
        config
            .save(config_path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        config
    };

    config.apply_env_overrides();
    config.apply_overrides(None, options.model.clone());

    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
    if let Some(batch_size) = options.batch_size {
        config.pipeline.batch_size = batch_size;
    }
    if let Some(concurrency) = options.concurrency {
        config.pipeline.concurrent_batches = concurrency;
    }
    if let Some(policy) = &options.failure_policy {
        config.pipeline.failure_policy = policy.clone().into();
    }

    config
        .validate()
        .map_err(|e| AppError::Config(format!("Configuration validation failed: {}", e)))?;

    Ok(config)
}

/// `talk.json` -> `talk.translated.json`
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "segments".to_string());
    input.with_file_name(format!("{}.translated.json", stem))
}
