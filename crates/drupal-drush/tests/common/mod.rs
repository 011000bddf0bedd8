//! Fake drush and PHP executables for integration tests.
//!
//! The fakes are shell scripts run through `sh` (passed as the first
//! program argument) so the test never has to exec a freshly written file.

#![allow(dead_code)]

use drupal_drush::{DrushConfig, Program};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_DRUSH: &str = r#"
cmd="$1"
shift
case "$cmd" in
  status)
    cat <<JSON
{"drupal-version": "8.3.5", "db-driver": "mysql", "db-hostname": "mysql", "db-port": "3306",
 "php-os": "Linux", "drush-version": "8.1.12", "drush-alias-files": [],
 "root": "$PWD", "site": "sites/default",
 "drupal-settings-file": "sites/default/settings.php"}
JSON
    ;;
  cr)
    echo "Cache rebuild complete.                    [success]" >&2
    ;;
  pm-list)
    echo "Command pm-list needs a higher bootstrap level to run - you will need to invoke drush from a more functional Drupal environment to run this command. [error]" >&2
    echo "The drush command 'pm-list' could not be executed.   [error]" >&2
    exit 1
    ;;
  mixed)
    echo "payload"
    echo "One thing broke [error]" >&2
    echo "Another looks odd [warning]" >&2
    echo "PHP Deprecated: something" >&2
    ;;
  advisory)
    echo "payload"
    echo "Module foo is deprecated [warning]" >&2
    echo "Undefined index: bar [notice]" >&2
    echo "Enabled views [ok]" >&2
    ;;
  silent-fail)
    exit 3
    ;;
  blank-lines)
    printf '\n   \n' >&2
    ;;
  bad-json)
    echo "this is not json"
    ;;
  echo-args)
    printf '%s\n' "$@"
    printf 'columns=%s/%s\n' "$DRUSH_COLUMNS" "$COLUMNS"
    printf 'pwd=%s\n' "$PWD"
    ;;
  flood)
    i=0
    while [ $i -lt 3000 ]; do
      echo "stdout line $i"
      echo "stderr line $i [warning]" >&2
      i=$((i+1))
    done
    ;;
  hang)
    exec sleep 30
    ;;
  *)
    echo "Unknown command $cmd [error]" >&2
    exit 1
    ;;
esac
"#;

const FAKE_PHP: &str = r#"
# called as: php -r CODE
case "$2" in
  *'$databases'*)
    printf '%s' '{"database": "drupal", "username": "root", "password": "", "prefix": "", "host": "mysql", "port": "3306", "namespace": "Drupal\\Core\\Database\\Driver\\mysql", "driver": "mysql"}'
    ;;
  *'$settings'*)
    printf '%s' '{"hash_salt": "X", "list": ["a", "b"], "file_scan_ignore_directories": ["node_modules", "bower_components"]}'
    ;;
  *)
    echo "unexpected snippet" >&2
    exit 255
    ;;
esac
"#;

/// A temporary Drupal root with fake drush and php scripts beside it.
pub struct FakeSite {
    pub root: TempDir,
    tools: TempDir,
}

impl FakeSite {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create site dir");
        let tools = tempfile::tempdir().expect("create tools dir");
        std::fs::write(tools.path().join("drush.sh"), FAKE_DRUSH).expect("write fake drush");
        std::fs::write(tools.path().join("php.sh"), FAKE_PHP).expect("write fake php");
        FakeSite { root, tools }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn drush_script(&self) -> PathBuf {
        self.tools.path().join("drush.sh")
    }

    pub fn php_script(&self) -> PathBuf {
        self.tools.path().join("php.sh")
    }

    pub fn config(&self) -> DrushConfig {
        DrushConfig::new(
            Program::new("sh").arg(self.drush_script().to_string_lossy()),
            Program::new("sh").arg(self.php_script().to_string_lossy()),
        )
    }
}
