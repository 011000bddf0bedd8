//! Drush command execution
//!
//! Runs one drush command as a child process. Stdout and stderr are drained
//! by two tokio tasks while the caller waits for the process to exit; both
//! tasks are joined before the result is assembled so no late line is lost.
//!
//! Stdout is collected verbatim. Every stderr line is passed through
//! [`classify`]: `[ok]`/`[success]` lines go to the ok channel, everything
//! else to the [`MessageSet`]. A non-zero exit adds one more message after
//! the parsed lines.

use crate::config::{DrushConfig, Program};
use crate::error::{CommandFailure, DrushError, Result};
use crate::message::{classify, Message, Severity};
use crate::message_set::{FailurePolicy, MessageSet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Flags appended after the command name on every invocation.
pub const GLOBAL_FLAGS: [&str; 2] = ["--yes", "--nocolor"];

/// Wide terminal so drush never wraps or truncates a message line.
pub const COLUMN_ENV: [(&str, &str); 2] = [("DRUSH_COLUMNS", "10000"), ("COLUMNS", "10000")];

/// Raw outcome of a drush run, before any failure policy is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// The drush command name
    pub command: String,
    /// Everything written to stdout, in arrival order
    pub stdout: String,
    /// `[ok]` and `[success]` lines
    pub ok_messages: Vec<Message>,
    /// All other stderr lines, then the exit failure if any
    pub messages: MessageSet,
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// Whether drush exited zero.
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Split into success or failure according to `policy`.
    pub fn into_outcome(self, policy: FailurePolicy) -> Result<Completion> {
        if policy.is_failure(&self.messages) {
            return Err(DrushError::Command(CommandFailure {
                command: self.command,
                stdout: self.stdout,
                ok_messages: self.ok_messages,
                messages: self.messages,
            }));
        }

        Ok(Completion {
            stdout: self.stdout,
            ok_messages: self.ok_messages,
            advisories: self.messages,
        })
    }
}

/// A drush command that succeeded under the failure policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub stdout: String,
    pub ok_messages: Vec<Message>,
    /// Warnings and notices tolerated by [`FailurePolicy::ErrorsOnly`].
    /// Always empty under [`FailurePolicy::AnyMessage`].
    pub advisories: MessageSet,
}

/// A drush command to be executed in a site directory.
#[derive(Debug, Clone)]
pub struct DrushCommand {
    directory: PathBuf,
    command: String,
    arguments: Vec<String>,
    program: Program,
    timeout: Option<Duration>,
}

impl DrushCommand {
    /// New command using the drush program and timeout from the environment.
    pub fn new(directory: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self::with_config(directory, command, &DrushConfig::from_env())
    }

    pub fn with_config(
        directory: impl Into<PathBuf>,
        command: impl Into<String>,
        config: &DrushConfig,
    ) -> Self {
        DrushCommand {
            directory: directory.into(),
            command: command.into(),
            arguments: Vec::new(),
            program: config.drush.clone(),
            timeout: config.timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(mut self, program: Program) -> Self {
        self.program = program;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments passed to the drush program, leading wrapper args included.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = self.program.args.clone();
        argv.push(self.command.clone());
        argv.extend(GLOBAL_FLAGS.iter().map(|f| f.to_string()));
        argv.extend(self.arguments.iter().cloned());
        argv
    }

    /// Run the command and judge it with `policy`.
    pub async fn run(&self, policy: FailurePolicy) -> Result<Completion> {
        self.execute().await?.into_outcome(policy)
    }

    /// Run the command and return everything it produced.
    ///
    /// Only transport problems (spawn failure, missing pipes, timeout) are
    /// errors here. Whatever drush reported is in the returned result.
    pub async fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let mut cmd = Command::new(&self.program.program);
        cmd.args(self.argv())
            .current_dir(&self.directory)
            .envs(COLUMN_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            event = "drush.started",
            command = %self.command,
            program = %self.program,
            directory = %self.directory.display(),
        );

        let mut child = cmd.spawn().map_err(|source| DrushError::Spawn {
            program: self.program.program.clone(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(DrushError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(DrushError::MissingPipe("stderr"))?;

        let stdout_task = tokio::spawn(drain_stdout(stdout));
        let stderr_task = tokio::spawn(drain_stderr(stderr));
        let aborts = [stdout_task.abort_handle(), stderr_task.abort_handle()];

        let collect = async {
            let status = child.wait().await?;
            let (stdout, stderr) = tokio::join!(stdout_task, stderr_task);
            let stdout = stdout??;
            let (ok_messages, messages) = stderr??;
            Ok::<_, DrushError>((status, stdout, ok_messages, messages))
        };

        let collected = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, collect).await {
                Ok(collected) => collected,
                Err(_) => {
                    warn!(
                        event = "drush.timed_out",
                        command = %self.command,
                        timeout_ms = limit.as_millis() as u64,
                    );
                    for handle in &aborts {
                        handle.abort();
                    }
                    if let Err(e) = child.kill().await {
                        warn!("Failed to kill drush {}: {}", self.command, e);
                    }
                    return Err(DrushError::TimedOut {
                        command: format!("drush {}", self.command),
                        timeout: limit,
                    });
                }
            },
            None => collect.await,
        };

        let (status, stdout, ok_messages, mut messages) = collected?;

        if !status.success() {
            warn!(event = "drush.failed", command = %self.command, status = %status);
            messages.push(Message::synthetic(
                Severity::Error,
                format!("drush {} exited with {}", self.command, status),
            ));
        }

        info!(
            event = "drush.finished",
            command = %self.command,
            exit_code = status.code().unwrap_or(-1),
            errors = messages.count(Severity::Error),
            warnings = messages.count(Severity::Warning) + messages.count(Severity::Notice),
            ok = ok_messages.len(),
            duration_ms = start.elapsed().as_millis() as u64,
        );

        Ok(CommandResult {
            command: self.command.clone(),
            stdout,
            ok_messages,
            messages,
            exit_code: status.code(),
        })
    }
}

async fn drain_stdout<R: AsyncRead + Unpin>(mut stdout: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    stdout.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Classify stderr line by line. A blank line is an Unknown message.
async fn drain_stderr<R: AsyncRead + Unpin>(
    stderr: R,
) -> std::io::Result<(Vec<Message>, MessageSet)> {
    let mut reader = BufReader::new(stderr);
    let mut line = Vec::new();
    let mut ok_messages = Vec::new();
    let mut messages = MessageSet::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&line);
        let message = classify(&text);
        debug!(severity = %message.severity(), text = message.text(), "drush message");
        if message.is_ok() {
            ok_messages.push(message);
        } else {
            messages.push(message);
        }
    }

    Ok((ok_messages, messages))
}
