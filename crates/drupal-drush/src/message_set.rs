//! Ordered collection of drush messages that doubles as an error value.

use serde::{Deserialize, Serialize};

use crate::message::{Marker, Message, Severity};

/// When a finished command should be reported as failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any error, warning, notice or unrecognised stderr line fails the
    /// command.
    AnyMessage,
    /// Only messages of [`Severity::Error`] fail the command. Everything
    /// else is handed back as advisories on the successful result. A
    /// non-zero exit always adds an error message, so it fails too.
    #[default]
    ErrorsOnly,
}

impl FailurePolicy {
    /// Whether `messages` should be surfaced as an error under this policy.
    pub fn is_failure(self, messages: &MessageSet) -> bool {
        match self {
            FailurePolicy::AnyMessage => !messages.is_empty(),
            FailurePolicy::ErrorsOnly => messages.has_errors(),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any_message" | "any-message" => Ok(FailurePolicy::AnyMessage),
            "errors" | "errors_only" | "errors-only" => Ok(FailurePolicy::ErrorsOnly),
            other => Err(format!("unknown failure policy: {other}")),
        }
    }
}

/// Errors, warnings, notices and unrecognised stderr output of one drush
/// run, in the order drush printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageSet {
    messages: Vec<Message>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// True if any message has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.any_severity(Severity::Error)
    }

    /// True if any message is a warning. Notices count as warnings here.
    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity().normalized() == Severity::Warning)
    }

    /// True if any message was tagged `[notice]`.
    pub fn has_notices(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.marker() == Some(Marker::Notice))
    }

    /// True if any stderr line carried no recognised marker.
    pub fn has_unknowns(&self) -> bool {
        self.any_severity(Severity::Unknown)
    }

    /// Count of messages with exactly this severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity() == severity)
            .count()
    }

    /// Messages with exactly this severity, in order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |m| m.severity() == severity)
    }

    fn any_severity(&self, severity: Severity) -> bool {
        self.messages.iter().any(|m| m.severity() == severity)
    }
}

impl std::fmt::Display for MessageSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MessageSet {}

impl From<Vec<Message>> for MessageSet {
    fn from(messages: Vec<Message>) -> Self {
        MessageSet { messages }
    }
}

impl FromIterator<Message> for MessageSet {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        MessageSet {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageSet {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageSet {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
