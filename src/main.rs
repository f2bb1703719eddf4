// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use samiconv::app_config::{self, Config};
use samiconv::app_controller::{ConversionDirection, Controller};
use samiconv::file_utils::FileManager;

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
    /// Decode SAMI files into caption JSON
    #[command(alias = "json")]
    ToJson(ConvertArgs),

    /// Render caption JSON files as SAMI
    #[command(alias = "sami")]
    ToSami(ConvertArgs),

    /// Check that a caption file carries the header its format expects
    Verify {
        /// Caption file to check
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Caption language, used to pick legacy encodings
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Generate shell completions for samiconv
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for converted files (defaults to next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Caption language code (e.g., 'en', 'ru', 'ko'), used to pick legacy encodings
    #[arg(short, long)]
    language: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// samiconv - SAMI caption converter
///
/// Decodes SAMI subtitle files into caption records and renders records back
/// into SAMI markup.
#[derive(Parser, Debug)]
#[command(name = "samiconv")]
#[command(version)]
#[command(about = "SAMI caption converter")]
#[command(long_about = "samiconv decodes SAMI subtitle files into caption JSON and renders caption JSON back into SAMI.

EXAMPLES:
    samiconv to-json movie.smi                  # Write movie.json next to movie.smi
    samiconv to-json -l ru movie.smi            # Decode a legacy Cyrillic file
    samiconv to-json -o out/ /captions/         # Convert a whole directory
    samiconv to-sami -f movie.json              # Overwrite an existing movie.smi
    samiconv verify movie.smi                   # Check the header only
    samiconv completions bash > samiconv.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger accepts every level; log::set_max_level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "samiconv", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::ToJson(args) => run_convert(config, args, ConversionDirection::ToJson).await,
        Commands::ToSami(args) => run_convert(config, args, ConversionDirection::ToSami).await,
        Commands::Verify { input_path, language } => {
            let language = language.unwrap_or_else(|| config.default_language.clone());
            let controller = Controller::with_config(config)?;
            let file_type = controller.verify_file(&input_path, &language).await?;
            info!("Header OK ({:?}): {:?}", file_type, input_path);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_convert(config: Config, args: ConvertArgs, direction: ConversionDirection) -> Result<()> {
    let language = args.language.unwrap_or_else(|| config.default_language.clone());
    let controller = Controller::with_config(config)?;

    if FileManager::file_exists(&args.input_path) {
        let output_dir = match &args.output_dir {
            Some(dir) => dir.clone(),
            None => args.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };
        controller
            .run(&args.input_path, &output_dir, direction, &language, args.force_overwrite)
            .await?;
    } else if FileManager::dir_exists(&args.input_path) {
        let summary = controller
            .run_folder(&args.input_path, args.output_dir.as_deref(), direction, &language, args.force_overwrite)
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    Ok(())
}
