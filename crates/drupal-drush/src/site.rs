//! Drupal site handle
//!
//! A [`Site`] is a validated Drupal directory plus the config used to reach
//! drush and PHP for it. Every fetch goes back to the site; nothing is
//! cached.

use crate::config::DrushConfig;
use crate::database::Database;
use crate::decode::decode_json;
use crate::drush::{CommandResult, Completion, DrushCommand};
use crate::error::{DrushError, Result};
use crate::php;
use crate::settings::Settings;
use crate::status::Status;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A Drupal site, identified by its location in the filesystem.
#[derive(Debug, Clone)]
pub struct Site {
    root: PathBuf,
    config: DrushConfig,
}

impl Site {
    /// Open a site using drush and PHP as configured in the environment.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(root, DrushConfig::from_env())
    }

    /// Open a site with an explicit config.
    ///
    /// Fails if the path does not exist, is not a directory, or the PHP
    /// interpreter cannot be found on `PATH`.
    pub fn with_config(root: impl AsRef<Path>, config: DrushConfig) -> Result<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).map_err(|source| DrushError::SiteNotFound {
            path: root.to_path_buf(),
            source,
        })?;

        let metadata =
            std::fs::metadata(&absolute).map_err(|source| DrushError::SiteNotFound {
                path: absolute.clone(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(DrushError::NotADirectory(absolute));
        }

        let php = which::which(&config.php.program).map_err(|source| {
            DrushError::InterpreterNotFound {
                program: config.php.program.clone(),
                source,
            }
        })?;
        debug!(php = %php.display(), root = %absolute.display(), "Opened Drupal site");

        Ok(Site {
            root: absolute,
            config,
        })
    }

    /// Absolute site directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &DrushConfig {
        &self.config
    }

    /// Build a drush command for this site without running it.
    pub fn command(&self, command: &str) -> DrushCommand {
        DrushCommand::with_config(&self.root, command, &self.config)
    }

    /// Run a drush command and apply the configured failure policy.
    ///
    /// ```ignore
    /// match site.drush("cr", &[]).await {
    ///     Ok(done) => println!("{}", done.stdout),
    ///     Err(e) if e.is_advisory() => eprintln!("{e}"),
    ///     Err(e) => return Err(e),
    /// }
    /// ```
    pub async fn drush(&self, command: &str, args: &[&str]) -> Result<Completion> {
        self.command(command)
            .args(args.iter().copied())
            .run(self.config.failure_policy)
            .await
    }

    /// Run a drush command and return its raw result without judging it.
    pub async fn drush_raw(&self, command: &str, args: &[&str]) -> Result<CommandResult> {
        self.command(command)
            .args(args.iter().copied())
            .execute()
            .await
    }

    /// `drush status`, decoded.
    pub async fn status(&self) -> Result<Status> {
        let done = self.drush("status", &["--format=json"]).await?;
        decode_json("drush status", done.stdout.as_bytes())
    }

    /// The `$settings` array from the site's settings.php.
    pub async fn settings(&self) -> Result<Settings> {
        let out = self.dump_settings_variable("$settings").await?;
        decode_json("drupal settings", &out)
    }

    /// Connection details of the default database.
    pub async fn default_database(&self) -> Result<Database> {
        let out = self
            .dump_settings_variable("$databases['default']['default']")
            .await?;
        decode_json("drupal database", &out)
    }

    async fn dump_settings_variable(&self, expression: &str) -> Result<Vec<u8>> {
        let status = self.status().await?;
        info!(
            root = %status.root,
            site = %status.site,
            expression,
            "Reading settings.php"
        );
        let code = php::settings_snippet(&status.root, &status.site, expression);
        php::run_snippet(&self.config.php, &self.root, &code, self.config.timeout).await
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root.display())
    }
}
