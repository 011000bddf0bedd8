//! Database connection details from `$databases` in settings.php.

use crate::decode::lenient_string;
use serde::{Deserialize, Serialize};

/// Connection details for one Drupal database connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    #[serde(deserialize_with = "lenient_string")]
    pub database: String,
    #[serde(deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(deserialize_with = "lenient_string")]
    pub prefix: String,
    #[serde(deserialize_with = "lenient_string")]
    pub host: String,
    #[serde(deserialize_with = "lenient_string")]
    pub port: String,
    #[serde(deserialize_with = "lenient_string")]
    pub namespace: String,
    /// Driver name as Drupal knows it: `mysql`, `pgsql`, `sqlite`
    #[serde(deserialize_with = "lenient_string")]
    pub driver: String,
}

impl Database {
    /// Connection string in `user[:password]@host[:port]/database` form.
    pub fn dsn(&self) -> String {
        let mut dsn = self.username.clone();
        if !self.password.is_empty() {
            dsn.push(':');
            dsn.push_str(&self.password);
        }
        dsn.push('@');
        dsn.push_str(&self.host);
        if !self.port.is_empty() {
            dsn.push(':');
            dsn.push_str(&self.port);
        }
        dsn.push('/');
        dsn.push_str(&self.database);
        dsn
    }

    /// A copy with the password replaced, safe to print or log.
    pub fn redacted(&self) -> Database {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".to_string();
        }
        copy
    }
}
