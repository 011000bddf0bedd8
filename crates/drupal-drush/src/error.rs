//! Error types for drupal-drush

use crate::message::Message;
use crate::message_set::MessageSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A drush command that ran to completion but reported problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// The drush command name, e.g. `cr`
    pub command: String,
    /// Whatever the command printed on stdout before failing
    pub stdout: String,
    /// `[ok]` and `[success]` lines printed along the way
    pub ok_messages: Vec<Message>,
    /// Everything else drush printed on stderr, plus the exit status
    pub messages: MessageSet,
}

impl CommandFailure {
    pub fn has_errors(&self) -> bool {
        self.messages.has_errors()
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.has_warnings()
    }

    pub fn has_notices(&self) -> bool {
        self.messages.has_notices()
    }

    pub fn has_unknowns(&self) -> bool {
        self.messages.has_unknowns()
    }
}

impl std::fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drush {} reported problems:\n{}", self.command, self.messages)
    }
}

/// Errors that can occur while driving drush or PHP
#[derive(Error, Debug)]
pub enum DrushError {
    /// Site root could not be resolved or inspected
    #[error("Drupal site error. Could not stat {path}: {source}")]
    SiteNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Site root exists but is a file
    #[error("Drupal site error. {0} is not a directory")]
    NotADirectory(PathBuf),

    /// Interpreter is not on PATH
    #[error("Drupal site error. {program} executable not found: {source}")]
    InterpreterNotFound {
        program: String,
        source: which::Error,
    },

    /// Child process could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Child process came up without the pipe we asked for
    #[error("Failed to capture {0} of child process")]
    MissingPipe(&'static str),

    /// IO error while talking to the child
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Command exceeded the configured timeout and was killed
    #[error("{command} timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    /// An output reader task panicked or was cancelled
    #[error("Output reader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Drush ran and reported errors, warnings or other problems
    #[error("{0}")]
    Command(CommandFailure),

    /// PHP snippet exited non-zero
    #[error("PHP exited with {status}: {stderr}")]
    Php { status: String, stderr: String },

    /// Output was not the JSON we expected
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },
}

impl DrushError {
    /// The classified drush messages, if this is a command-level failure.
    pub fn messages(&self) -> Option<&MessageSet> {
        match self {
            DrushError::Command(failure) => Some(&failure.messages),
            _ => None,
        }
    }

    /// True for a command-level failure that holds no `[error]` message,
    /// i.e. drush only warned.
    pub fn is_advisory(&self) -> bool {
        self.messages().is_some_and(|m| !m.has_errors())
    }

    /// True when the tool could not be used at all, as opposed to a command
    /// that ran and reported problems.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DrushError::Spawn { .. }
                | DrushError::MissingPipe(_)
                | DrushError::Io(_)
                | DrushError::TimedOut { .. }
                | DrushError::Join(_)
        )
    }
}

/// Result type for drupal-drush operations
pub type Result<T> = std::result::Result<T, DrushError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::classify;

    fn failure(lines: &[&str]) -> DrushError {
        DrushError::Command(CommandFailure {
            command: "cr".to_string(),
            stdout: String::new(),
            ok_messages: Vec::new(),
            messages: lines.iter().map(|l| classify(l)).collect(),
        })
    }

    #[test]
    fn test_command_failure_exposes_messages() {
        let err = failure(&["broken [error]"]);
        let messages = err.messages().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages.has_errors());
        assert!(!err.is_advisory());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_warning_only_failure_is_advisory() {
        let err = failure(&["careful [warning]", "hmm [notice]"]);
        assert!(err.is_advisory());
    }

    #[test]
    fn test_transport_errors_have_no_messages() {
        let err = DrushError::MissingPipe("stdout");
        assert!(err.messages().is_none());
        assert!(err.is_transport());
        assert!(!err.is_advisory());

        let err = DrushError::TimedOut {
            command: "cr".to_string(),
            timeout: Duration::from_secs(3),
        };
        assert!(err.is_transport());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_error_display() {
        let err = failure(&["broken [error]"]);
        let text = err.to_string();
        assert!(text.contains("drush cr"));
        assert!(text.contains("[error]: broken"));

        let err = DrushError::NotADirectory(PathBuf::from("/tmp/site.txt"));
        assert!(err.to_string().contains("is not a directory"));
    }
}
