//! Runner configuration
//!
//! Defaults come from the environment so that wrappers such as
//! `vendor/bin/drush` or `ddev drush` can be swapped in without code changes.

use crate::message_set::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming the drush executable
pub const DRUSH_BIN_ENV: &str = "DRUSH_BIN";
/// Environment variable naming the PHP interpreter
pub const PHP_BIN_ENV: &str = "DRUPAL_PHP_BIN";
/// Environment variable holding the command timeout in seconds (0 = none)
pub const TIMEOUT_ENV: &str = "DRUSH_TIMEOUT_SECS";
/// Environment variable selecting the failure policy (`any` or `errors`)
pub const FAILURE_POLICY_ENV: &str = "DRUSH_FAILURE_POLICY";

/// An executable plus the arguments that always precede anything we add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Program {
    pub fn new(program: impl Into<String>) -> Self {
        Program {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a leading argument, e.g. `Program::new("ddev").arg("drush")`.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Parse a whitespace separated command line such as `"lando drush"`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Program {
            program: program.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How drush and PHP are invoked for a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrushConfig {
    /// The drush executable
    pub drush: Program,
    /// The PHP interpreter used for settings and database snippets
    pub php: Program,
    /// Kill a command that runs longer than this. `None` waits forever.
    pub timeout: Option<Duration>,
    /// When a finished command counts as failed
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for DrushConfig {
    fn default() -> Self {
        DrushConfig {
            drush: std::env::var(DRUSH_BIN_ENV)
                .ok()
                .and_then(|v| Program::parse(&v))
                .unwrap_or_else(|| Program::new("drush")),
            php: std::env::var(PHP_BIN_ENV)
                .ok()
                .and_then(|v| Program::parse(&v))
                .unwrap_or_else(|| Program::new("php")),
            timeout: std::env::var(TIMEOUT_ENV)
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            failure_policy: std::env::var(FAILURE_POLICY_ENV)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl DrushConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a config with explicit programs and no timeout
    pub fn new(drush: Program, php: Program) -> Self {
        DrushConfig {
            drush,
            php,
            timeout: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_drush(mut self, drush: Program) -> Self {
        self.drush = drush;
        self
    }

    pub fn with_php(mut self, php: Program) -> Self {
        self.php = php;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
