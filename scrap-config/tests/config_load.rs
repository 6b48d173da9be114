use scrap_config::JournalConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a TOML file in a temp dir and return its path.
fn write_toml(tmp: &TempDir, name: &str, toml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, toml).expect("write toml");
    p
}

#[test]
#[serial]
fn loads_all_sections_from_file() {
    let tmp = TempDir::new().unwrap();

    let file_toml = r#"
[consumer]
key = "ck-from-file"
secret = "cs-from-file"

[twitter]
user = "journal_account"

[scrapbox]
project = "my-journal"
"#;
    let p = write_toml(&tmp, "config.toml", file_toml);

    let config = JournalConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load journal config");

    assert_eq!(config.consumer.key, "ck-from-file");
    assert_eq!(config.consumer.secret, "cs-from-file");
    assert_eq!(config.twitter.user, "journal_account");
    assert_eq!(config.scrapbox.project, "my-journal");
}

#[test]
#[serial]
fn secrets_can_come_from_the_environment() {
    let tmp = TempDir::new().unwrap();

    let file_toml = r#"
[consumer]
key = "${SJ_TEST_CONSUMER_KEY}"
secret = "${SJ_TEST_CONSUMER_SECRET}"

[twitter]
user = "journal_account"

[scrapbox]
project = "my-journal"
"#;
    let p = write_toml(&tmp, "config.toml", file_toml);

    temp_env::with_vars(
        [
            ("SJ_TEST_CONSUMER_KEY", Some("injected-key")),
            ("SJ_TEST_CONSUMER_SECRET", Some("injected-secret")),
        ],
        || {
            let config = JournalConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load journal config");
            assert_eq!(config.consumer.key, "injected-key");
            assert_eq!(config.consumer.secret, "injected-secret");
        },
    );
}

#[test]
#[serial]
fn missing_file_is_a_fatal_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");

    let err = JournalConfigLoader::new().with_file(missing).load();
    assert!(err.is_err(), "absent config must fail startup");
}
