//! drupal - inspect and administer a Drupal site through drush
//!
//! ## Commands
//!
//! - `status`: decoded `drush status`
//! - `settings`: the `$settings` array, or one key of it
//! - `database`: default database connection
//! - `drush`: run any drush command and report its classified output

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drupal_drush::{
    init_tracing, Completion, DrushConfig, DrushError, FailurePolicy, Message, MessageSet, Program,
    Site,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "drupal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and administer a Drupal site through drush", long_about = None)]
struct Cli {
    /// Drupal site directory
    #[arg(short, long, global = true, default_value = ".")]
    site: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Kill drush or PHP after this many seconds (0 = never)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Drush executable, with leading args (e.g. "ddev drush")
    #[arg(long, global = true)]
    drush: Option<String>,

    /// PHP interpreter
    #[arg(long, global = true)]
    php: Option<String>,

    /// Fail on warnings, notices and stray stderr output, not only on [error]
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the site status reported by drush
    Status,

    /// Show the $settings array from settings.php
    Settings {
        /// Only print this key
        key: Option<String>,
    },

    /// Show the default database connection
    Database {
        /// Print the password instead of masking it
        #[arg(long)]
        show_password: bool,
    },

    /// Run a drush command
    Drush {
        /// Drush command name, e.g. `cr`
        command: String,

        /// Arguments passed after the command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Cli {
    fn config(&self) -> Result<DrushConfig> {
        let mut config = DrushConfig::from_env();
        if let Some(drush) = &self.drush {
            config = config.with_drush(Program::parse(drush).context("--drush is empty")?);
        }
        if let Some(php) = &self.php {
            config = config.with_php(Program::parse(php).context("--php is empty")?);
        }
        match self.timeout {
            // 0 switches off a timeout set in the environment
            Some(0) => config.timeout = None,
            Some(secs) => config = config.with_timeout(Duration::from_secs(secs)),
            None => {}
        }
        if self.strict {
            config = config.with_failure_policy(FailurePolicy::AnyMessage);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.json, level);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.config()?;
    let site = Site::with_config(&cli.site, config)
        .with_context(|| format!("Failed to open site {}", cli.site.display()))?;

    match cli.command {
        Commands::Status => {
            let status = site.status().await.context("Failed to fetch site status")?;
            print_json(&status)?;
        }
        Commands::Settings { key } => {
            let settings = site
                .settings()
                .await
                .context("Failed to fetch site settings")?;
            match key {
                Some(key) => match settings.get(&key) {
                    Some(value) => print_json(value)?,
                    None => {
                        eprintln!("Setting {key} is not defined");
                        return Ok(ExitCode::FAILURE);
                    }
                },
                None => print_json(&settings)?,
            }
        }
        Commands::Database { show_password } => {
            let db = site
                .default_database()
                .await
                .context("Failed to fetch default database")?;
            let shown = if show_password { db.clone() } else { db.redacted() };
            print_json(&shown)?;
            println!("{}", shown.dsn());
        }
        Commands::Drush { command, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            return run_drush(&site, &command, &args).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_drush(site: &Site, command: &str, args: &[&str]) -> Result<ExitCode> {
    let outcome = site.drush(command, args).await;
    let status = drush_exit_status(&outcome);

    match outcome {
        Ok(done) => {
            print!("{}", done.stdout);
            report_ok(&done.ok_messages);
            report_messages(&done.advisories);
        }
        Err(DrushError::Command(failure)) => {
            print!("{}", failure.stdout);
            report_ok(&failure.ok_messages);
            report_messages(&failure.messages);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to run drush {command}")),
    }

    Ok(ExitCode::from(status.unwrap_or(1)))
}

/// Process exit status for a drush outcome: 0 on success, 1 when drush
/// reported an `[error]`, 2 when it only warned (`--strict`). `None` for
/// failures that never got a verdict from drush.
fn drush_exit_status(outcome: &drupal_drush::Result<Completion>) -> Option<u8> {
    match outcome {
        Ok(_) => Some(0),
        Err(DrushError::Command(failure)) if failure.has_errors() => Some(1),
        Err(DrushError::Command(_)) => Some(2),
        Err(_) => None,
    }
}

fn report_ok(messages: &[Message]) {
    for message in messages {
        eprintln!("{message}");
    }
}

fn report_messages(messages: &MessageSet) {
    eprint!("{messages}");
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
