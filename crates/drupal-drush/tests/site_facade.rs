//! Site facade tests against fake drush and PHP.

#![cfg(unix)]

mod common;

use common::FakeSite;
use drupal_drush::{DrushError, FailurePolicy, Program, Site};

fn open(fake: &FakeSite) -> Site {
    Site::with_config(fake.path(), fake.config()).expect("open site")
}

#[tokio::test]
async fn test_status() {
    let fake = FakeSite::new();
    let site = open(&fake);

    let status = site.status().await.expect("status");
    assert_eq!(status.drupal_version, "8.3.5");
    assert_eq!(status.drupal_settings_file, "sites/default/settings.php");
    assert_eq!(status.db_driver, "mysql");
    assert_eq!(status.db_hostname, "mysql");
    assert_eq!(status.site, "sites/default");
    assert!(status.drush_alias_files.is_empty());
}

#[tokio::test]
async fn test_settings() {
    let fake = FakeSite::new();
    let site = open(&fake);

    let settings = site.settings().await.expect("settings");
    assert_eq!(settings.get_string("hash_salt"), "X");
    assert_eq!(settings.get_array("list"), vec!["a", "b"]);
    assert_eq!(
        settings.get_array("file_scan_ignore_directories"),
        vec!["node_modules", "bower_components"]
    );
    assert_eq!(settings.get_string("missing"), "");
}

#[tokio::test]
async fn test_default_database() {
    let fake = FakeSite::new();
    let site = open(&fake);

    let db = site.default_database().await.expect("database");
    assert_eq!(db.database, "drupal");
    assert_eq!(db.username, "root");
    assert_eq!(db.password, "");
    assert_eq!(db.prefix, "");
    assert_eq!(db.host, "mysql");
    assert_eq!(db.port, "3306");
    assert_eq!(db.driver, "mysql");
    assert_eq!(db.namespace, "Drupal\\Core\\Database\\Driver\\mysql");
    assert_eq!(db.dsn(), "root@mysql:3306/drupal");
}

#[tokio::test]
async fn test_drush_passthrough() {
    let fake = FakeSite::new();
    let site = open(&fake);

    let done = site.drush("cr", &[]).await.expect("cr");
    assert_eq!(done.ok_messages.len(), 1);

    let raw = site.drush_raw("pm-list", &[]).await.expect("raw result");
    assert_eq!(raw.exit_code, Some(1));
    assert!(raw.messages.has_errors());
}

#[tokio::test]
async fn test_site_failure_policy_applies_to_drush() {
    let fake = FakeSite::new();

    let lenient = open(&fake);
    let done = lenient.drush("advisory", &[]).await.expect("advisory only");
    assert!(done.advisories.has_warnings());

    let strict = Site::with_config(
        fake.path(),
        fake.config().with_failure_policy(FailurePolicy::AnyMessage),
    )
    .unwrap();
    let err = strict.drush("advisory", &[]).await.unwrap_err();
    assert!(err.is_advisory());
}

#[tokio::test]
async fn test_status_decode_failure() {
    let fake = FakeSite::new();
    // Route `status` to a command that prints garbage
    let config = fake.config().with_drush(
        Program::new("sh")
            .arg("-c")
            .arg("echo 'this is not json'")
            .arg("drush"),
    );
    let site = Site::with_config(fake.path(), config).unwrap();

    let err = site.status().await.unwrap_err();
    assert!(matches!(err, DrushError::Decode { .. }));
    assert!(err.messages().is_none());
}

#[tokio::test]
async fn test_settings_propagates_status_failure() {
    let fake = FakeSite::new();
    let config = fake.config().with_drush(
        Program::new("sh")
            .arg("-c")
            .arg("echo 'Drush was not able to start (bootstrap) Drupal. [error]' >&2; exit 1")
            .arg("drush"),
    );
    let site = Site::with_config(fake.path(), config).unwrap();

    let err = site.settings().await.unwrap_err();
    let messages = err.messages().expect("status failure surfaces messages");
    assert!(messages.has_errors());
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn test_settings_php_failure() {
    let fake = FakeSite::new();
    let config = fake
        .config()
        .with_php(Program::new("sh").arg("-c").arg("echo 'PHP Parse error' >&2; exit 255"));
    let site = Site::with_config(fake.path(), config).unwrap();

    let err = site.settings().await.unwrap_err();
    match err {
        DrushError::Php { stderr, .. } => assert_eq!(stderr, "PHP Parse error"),
        other => panic!("expected php failure, got {other:?}"),
    }
}

#[test]
fn test_site_display_is_path() {
    let fake = FakeSite::new();
    let site = open(&fake);
    assert_eq!(site.to_string(), site.path().display().to_string());
}
