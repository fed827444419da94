// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use xcloc_translate::app_config::{Config, LogLevel, TranslationProvider};
use xcloc_translate::file_utils::FileManager;
use xcloc_translate::language_utils;
use xcloc_translate::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
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

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for xcloc-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "xcloc-translate",
    version,
    about = "Translate the XLIFF documents of an Xcode localization bundle",
    subcommand_negates_reqs = true,
    args_conflicts_with_subcommands = true
)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source bundle directory (must contain contents.json)
    #[arg(long, value_name = "DIR", required = true)]
    input: Option<PathBuf>,

    /// Destination bundle directory, replaced if it exists
    #[arg(long, value_name = "DIR", required = true)]
    output: Option<PathBuf>,

    /// Target locale, written verbatim to every artifact (e.g. 'de', 'zh-Hans')
    #[arg(long = "target_lang", value_name = "LOCALE", required = true)]
    target_lang: Option<String>,

    /// Warn when the target locale is not a common Xcode locale code
    #[arg(long = "verify-codes")]
    verify_codes: bool,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Also append log lines to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// File that receives a copy of every log line, once configured
static LOG_FILE: OnceCell<PathBuf> = OnceCell::new();

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
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
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let _ = writeln!(
            std::io::stderr(),
            "\x1B[{}m{} {:<5} {}\x1B[0m",
            Self::color_for_level(record.level()),
            now,
            record.level(),
            record.args()
        );

        if let Some(path) = LOG_FILE.get() {
            let _ = FileManager::append_to_log_file(path, &format!("{:<5} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "xcloc-translate", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run_translate(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_translate(options: CommandLineOptions) -> Result<bool> {
    // Apply a command line log level before the config is read
    if let Some(level) = &options.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load(&options.config_path)?;

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
    if options.log_file.is_some() {
        config.log_file = options.log_file.clone();
    }

    config.validate().context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());
    if let Some(path) = &config.log_file {
        let _ = LOG_FILE.set(path.clone());
    }

    let input = options.input.context("--input is required")?;
    let output = options.output.context("--output is required")?;
    let target_locale = options.target_lang.context("--target_lang is required")?;

    if options.verify_codes {
        language_utils::validate_locale_code(&target_locale);
    }

    let controller = Controller::with_config(config)?;
    let report = controller.run(input, output, &target_locale).await?;

    if report.success {
        info!("Done: {} document(s) translated", report.documents.len());
    } else {
        for failed in report.failed_documents() {
            if let Err(e) = &failed.result {
                error!("Failed: {:?}: {}", failed.input, e);
            }
        }
    }

    Ok(report.success)
}
