//! drupal-drush: drive a Drupal site through drush
//!
//! This crate runs drush commands against a Drupal site and turns what
//! drush prints on stderr into typed messages. It also reads the site's
//! status, `$settings` array and default database connection.
//!
//! ## Messages
//!
//! Drush tags stderr lines with `[error]`, `[warning]`, `[notice]`, `[ok]`
//! or `[success]`. Each line becomes a [`Message`]. `[ok]`/`[success]`
//! lines are returned on the success channel. Everything else is collected
//! in a [`MessageSet`], which is also the error value of a failed command.
//!
//! ```ignore
//! let site = Site::new("/var/www/drupal")?;
//! match site.drush("cr", &[]).await {
//!     Ok(done) => {
//!         for message in &done.ok_messages {
//!             println!("{message}");
//!         }
//!     }
//!     Err(e) => match e.messages() {
//!         Some(messages) if !messages.has_errors() => eprintln!("{messages}"),
//!         _ => return Err(e.into()),
//!     },
//! }
//! ```

pub mod config;
mod decode;
pub mod database;
pub mod drush;
pub mod error;
pub mod message;
pub mod message_set;
pub mod php;
pub mod settings;
pub mod site;
pub mod status;
pub mod telemetry;

pub use config::{DrushConfig, Program};
pub use database::Database;
pub use drush::{CommandResult, Completion, DrushCommand, COLUMN_ENV, GLOBAL_FLAGS};
pub use error::{CommandFailure, DrushError, Result};
pub use message::{classify, Marker, Message, Severity};
pub use message_set::{FailurePolicy, MessageSet};
pub use settings::{SettingValue, Settings};
pub use site::Site;
pub use status::Status;
pub use telemetry::init_tracing;
