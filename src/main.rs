// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, Credentials};
use crate::app_controller::Controller;
use crate::chat::telegram::TelegramClient;

mod app_config;
mod app_controller;
mod audio;
mod chat;
mod dispatcher;
mod errors;
mod extraction;
mod file_utils;
mod language_id;
mod language_utils;
mod providers;
mod synthesis;
mod transcription;
mod translation;

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

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot and long-poll for messages (default command)
    Run(RunArgs),

    /// Process a single local file or video link without the bot
    Process(ProcessArgs),

    /// Generate shell completions for dubwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input file or video link to process
    #[arg(value_name = "INPUT")]
    input: String,

    /// Directory the transcript and audio are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dubwai - Dubbing With AI
///
/// A dubbing bot that extracts text from documents, audio files and video
/// links, translates it and answers with a translated transcript plus a
/// synthesized spoken-audio rendition.
#[derive(Parser, Debug)]
#[command(name = "dubwai")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered dubbing bot")]
#[command(long_about = "dubwai accepts documents, audio clips and video links, extracts their text,
translates it when it is in the pivot language and synthesizes a spoken-audio
rendition of the result.

EXAMPLES:
    dubwai                                  # Start the bot with the default config
    dubwai run -c conf.json                 # Start the bot with a specific config
    dubwai process report.pdf               # Dub a local file, artifacts in cwd
    dubwai process -o out/ talk.mp3         # Dub a local audio file into out/
    dubwai --log-level debug                # Start with debug logging
    dubwai completions bash > dubwai.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file does
    not exist, a default one is created automatically. The two required
    credentials only ever come from the environment:
    TELEGRAM_BOT_TOKEN and DEEPL_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
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
            let (color, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dubwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Run(args)) => run_bot(args).await,
        Some(Commands::Process(args)) => run_process(args).await,
        None => {
            // Default behavior - start the bot with the top-level args
            run_bot(RunArgs {
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
            .await
        }
    }
}

/// Load the configuration, creating a default file when none exists, and
/// apply the command-line log level
fn load_config(config_path: &str, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(cli_level) = cli_log_level {
        config.log_level = cli_level.into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(to_level_filter(&config.log_level));

    Ok(config)
}

async fn run_bot(args: RunArgs) -> Result<()> {
    let config = load_config(&args.config_path, args.log_level)?;

    // Both credentials are required before anything is loaded; a missing
    // one is a fatal startup error.
    let credentials = Credentials::from_env()?;

    let chat = TelegramClient::new(credentials.bot_token.clone());
    let controller = Controller::new(config, &credentials)?;

    info!("Starting dubwai bot");
    controller.run(&chat).await
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    let config = load_config(&args.config_path, args.log_level)?;
    let credentials = Credentials::from_env()?;

    let controller = Controller::new(config, &credentials)?;

    let (transcript_path, audio_path) = controller
        .process_local(&args.input, &args.output_dir)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    info!("Transcript written to {:?}", transcript_path);
    info!("Audio written to {:?}", audio_path);
    Ok(())
}
