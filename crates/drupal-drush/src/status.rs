//! Site status as reported by `drush status --format=json`.

use crate::decode::{lenient_string, lenient_strings};
use serde::{Deserialize, Serialize};

/// Miscellaneous information about a Drupal site.
///
/// Fields drush did not report are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Status {
    #[serde(deserialize_with = "lenient_string")]
    pub drupal_version: String,
    /// Settings file relative to the Drupal root
    #[serde(deserialize_with = "lenient_string")]
    pub drupal_settings_file: String,
    #[serde(deserialize_with = "lenient_string")]
    pub uri: String,

    #[serde(deserialize_with = "lenient_string")]
    pub db_driver: String,
    #[serde(deserialize_with = "lenient_string")]
    pub db_hostname: String,
    #[serde(deserialize_with = "lenient_string")]
    pub db_username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub db_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub db_port: String,

    #[serde(deserialize_with = "lenient_string")]
    pub php_bin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub php_os: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub php_conf: Vec<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub drush_script: String,
    #[serde(deserialize_with = "lenient_string")]
    pub drush_version: String,
    #[serde(deserialize_with = "lenient_string")]
    pub drush_temp: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub drush_conf: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub drush_alias_files: Vec<String>,

    /// Absolute Drupal root
    #[serde(deserialize_with = "lenient_string")]
    pub root: String,
    /// Site directory relative to the root, e.g. `sites/default`
    #[serde(deserialize_with = "lenient_string")]
    pub site: String,
    #[serde(deserialize_with = "lenient_string")]
    pub modules: String,
    #[serde(deserialize_with = "lenient_string")]
    pub themes: String,
    #[serde(deserialize_with = "lenient_string")]
    pub config_sync: String,
}
