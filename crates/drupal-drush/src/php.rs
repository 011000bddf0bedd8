//! Inline PHP execution
//!
//! Settings and database credentials live in PHP variables inside
//! `settings.php`, so they are read by including that file from a `php -r`
//! snippet and printing the variable as JSON.
//!
//! The snippet is assembled by plain string concatenation from the site
//! paths drush reports. Only use this against trusted site directories.

use crate::config::Program;
use crate::error::{DrushError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Build a snippet that loads `settings.php` for a site and prints
/// `expression` as JSON.
///
/// `app_root` is the Drupal root and `site_path` the site directory relative
/// to it, as in `drush status` output (`root` and `site`).
pub fn settings_snippet(app_root: &str, site_path: &str, expression: &str) -> String {
    format!(
        "$app_root = '{app_root}'; $site_path = '{site_path}'; \
         include_once($app_root.'/'.$site_path.'/settings.php'); \
         print json_encode({expression});"
    )
}

/// Run `code` through `php -r` and return its stdout.
pub async fn run_snippet(
    php: &Program,
    directory: &Path,
    code: &str,
    timeout: Option<Duration>,
) -> Result<Vec<u8>> {
    let mut cmd = Command::new(&php.program);
    cmd.args(&php.args)
        .arg("-r")
        .arg(code)
        .current_dir(directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = %php, "Running PHP snippet");

    let child = cmd.spawn().map_err(|source| DrushError::Spawn {
        program: php.program.clone(),
        source,
    })?;

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| DrushError::TimedOut {
                command: format!("{php} -r"),
                timeout: limit,
            })??,
        None => child.wait_with_output().await?,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(status = %output.status, "PHP snippet failed");
        return Err(DrushError::Php {
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_snippet() {
        let code = settings_snippet("/var/www/html", "sites/default", "$settings");
        assert_eq!(
            code,
            "$app_root = '/var/www/html'; $site_path = 'sites/default'; \
             include_once($app_root.'/'.$site_path.'/settings.php'); \
             print json_encode($settings);"
        );
    }

    #[test]
    fn test_settings_snippet_database_expression() {
        let code = settings_snippet("/srv", "sites/multi", "$databases['default']['default']");
        assert!(code.ends_with("print json_encode($databases['default']['default']);"));
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_spawn_error() {
        let php = Program::new("definitely-not-a-real-php-binary");
        let err = run_snippet(&php, &std::env::temp_dir(), "print 1;", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DrushError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_snippet_passes_code_after_r_flag() {
        // `sh -c 'echo "$2"' sh -r CODE` echoes CODE back
        let php = Program::new("sh")
            .arg("-c")
            .arg("printf '%s' \"$2\"")
            .arg("sh");
        let out = run_snippet(&php, &std::env::temp_dir(), "print 1;", None)
            .await
            .unwrap();
        assert_eq!(out, b"print 1;");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_php_error() {
        let php = Program::new("sh").arg("-c").arg("echo oops >&2; exit 255");
        let err = run_snippet(&php, &std::env::temp_dir(), "print 1;", None)
            .await
            .unwrap_err();
        match err {
            DrushError::Php { stderr, .. } => assert_eq!(stderr, "oops"),
            other => panic!("expected php error, got {other:?}"),
        }
    }
}
