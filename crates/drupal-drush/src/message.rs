//! Drush message classification
//!
//! Drush reports progress and problems on stderr, one line per message,
//! with a bracketed severity tag at the end of the line:
//!
//! ```text
//! Command pm-list needs a higher bootstrap level to run.   [error]
//! Cache rebuild complete.                                  [success]
//! ```
//!
//! [`classify`] turns one such line into a typed [`Message`].

use serde::{Deserialize, Serialize};

/// Severity of a drush message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Notice,
    Ok,
    /// Any stderr output without a recognised marker
    Unknown,
}

impl Severity {
    /// Severity with notices folded into warnings.
    ///
    /// Drush itself treats `[notice]` as a flavour of `[warning]`, and the
    /// aggregate predicates on [`crate::MessageSet`] follow that rule.
    pub fn normalized(self) -> Severity {
        match self {
            Severity::Notice => Severity::Warning,
            other => other,
        }
    }

    /// Tag used when rendering a message of this severity.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Error => "[error]",
            Severity::Warning => "[warning]",
            Severity::Notice => "[notice]",
            Severity::Ok => "[ok]",
            Severity::Unknown => "[unknown]",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Literal marker drush appended to a stderr line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Error,
    Warning,
    Notice,
    Ok,
    Success,
}

impl Marker {
    /// Markers in match priority order.
    pub const ALL: [Marker; 5] = [
        Marker::Error,
        Marker::Warning,
        Marker::Notice,
        Marker::Ok,
        Marker::Success,
    ];

    /// The text drush prints, brackets included. Case and spacing sensitive.
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Error => "[error]",
            Marker::Warning => "[warning]",
            Marker::Notice => "[notice]",
            Marker::Ok => "[ok]",
            Marker::Success => "[success]",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Marker::Error => Severity::Error,
            Marker::Warning => Severity::Warning,
            Marker::Notice => Severity::Notice,
            Marker::Ok | Marker::Success => Severity::Ok,
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified line of drush output.
///
/// Deserializing rejects a severity that disagrees with the marker, so a
/// decoded message always looks like one [`classify`] could have produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageRecord")]
pub struct Message {
    text: String,
    severity: Severity,
    marker: Option<Marker>,
}

impl Message {
    /// Build a message that did not come from a drush stderr line, such as
    /// the summary of a failed process.
    pub(crate) fn synthetic(severity: Severity, text: impl Into<String>) -> Self {
        Message {
            text: text.into(),
            severity,
            marker: None,
        }
    }

    /// Message text with the marker stripped.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The literal marker that matched, if any.
    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.marker {
            Some(marker) => marker.as_str(),
            None => self.severity.tag(),
        };
        write!(f, "{}: {}", tag, self.text)
    }
}

impl std::error::Error for Message {}

#[derive(Deserialize)]
struct MessageRecord {
    text: String,
    severity: Severity,
    marker: Option<Marker>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = String;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let consistent = match record.marker {
            Some(marker) => marker.severity() == record.severity,
            // Unmarked lines and the exit-status summary
            None => matches!(record.severity, Severity::Unknown | Severity::Error),
        };
        if !consistent {
            return Err(format!(
                "severity {} does not match marker {:?}",
                record.severity, record.marker
            ));
        }

        Ok(Message {
            text: record.text,
            severity: record.severity,
            marker: record.marker,
        })
    }
}

/// Classify a raw stderr line.
///
/// Never fails: a line without a recognised marker (including the empty
/// line) becomes an [`Severity::Unknown`] message holding the trimmed line.
pub fn classify(line: &str) -> Message {
    let trimmed = line.trim();

    for marker in Marker::ALL {
        if let Some(rest) = trimmed.strip_suffix(marker.as_str()) {
            return Message {
                text: rest.trim().to_string(),
                severity: marker.severity(),
                marker: Some(marker),
            };
        }
    }

    Message {
        text: trimmed.to_string(),
        severity: Severity::Unknown,
        marker: None,
    }
}
