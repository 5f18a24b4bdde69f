// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use bookreview::app_config::{Config, LogLevel};
use bookreview::app_controller::Controller;

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
    /// Run the web application (default command)
    Serve,

    /// Load a catalog CSV file (header: isbn,title,author,year) into the store
    Import {
        /// CSV file to import
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Generate shell completions for bookreview
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Settings shared by every command
#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "bookreview.json")]
    config: PathBuf,

    /// Store connection string (sqlite://books.db, a file path or :memory:)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// API key of the rating service; without it book pages show no statistics
    #[arg(long, global = true, env = "GOODREADS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Address to listen on
    #[arg(long, global = true, env = "BOOKREVIEW_BIND")]
    bind: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl GlobalOptions {
    /// Apply command line and environment overrides on top of `config`
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(key) = &self.api_key {
            config.gateway.api_key = key.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind_addr = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone().into();
        }
    }
}

/// Book reviews - search a catalog, read and write reviews
#[derive(Parser, Debug)]
#[command(name = "bookreview")]
#[command(version)]
#[command(about = "Web application for searching and reviewing books")]
#[command(long_about = "Serves a small book review site backed by SQLite.

EXAMPLES:
    bookreview import books.csv                   # Load the catalog
    bookreview serve                              # Run the site on 127.0.0.1:5000
    bookreview --bind 0.0.0.0:8080 serve          # Listen elsewhere
    bookreview completions bash > bookreview.bash # Generate bash completions

CONFIGURATION:
    Settings are read from bookreview.json when present, then overridden by
    flags or their environment variables. DATABASE_URL is required.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOptions,
}

// Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger lets everything through; `set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
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
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "bookreview", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.global.config)?;
    cli.global.apply(&mut config);
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Some(Commands::Import { file, quiet }) => {
            let summary = controller.import_catalog(&file, !quiet).await?;
            info!("Imported {:?}: {}", file, summary);
            Ok(())
        }
        Some(Commands::Serve) | None => controller.serve().await,
        Some(Commands::Completions { .. }) => Ok(()),
    }
}
