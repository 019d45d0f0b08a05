//! Tests for flag normalization.

use super::{FlagTables, JOB_ID_FLAG, base_name, normalize};
use crate::error::ErrorKind;

fn flags(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

fn tables() -> &'static FlagTables {
    FlagTables::global()
}

#[test]
fn test_empty_request_gets_defaults() {
    let set = normalize(&[], None, tables()).unwrap();
    assert_eq!(
        set.as_slice(),
        &flags(&["--onetime", "--no-daemonize", "--verbose"])
    );
}

#[test]
fn test_job_id_appended_last() {
    let set = normalize(&flags(&["--noop"]), Some("job-42"), tables()).unwrap();
    assert_eq!(
        set.as_slice(),
        &flags(&[
            "--noop",
            "--onetime",
            "--no-daemonize",
            "--verbose",
            "--job-id",
            "job-42",
        ])
    );
}

#[test]
fn test_whitelisted_flags_preserved_in_order() {
    let requested = flags(&["--tags", "web,db", "--no-noop", "--environment", "prod_1"]);
    let set = normalize(&requested, None, tables()).unwrap();
    assert_eq!(&set.as_slice()[..5], requested.as_slice());
}

#[test]
fn test_flags_are_trimmed() {
    let set = normalize(&flags(&["  --noop\t"]), None, tables()).unwrap();
    assert_eq!(set.as_slice()[0], "--noop");
}

#[test]
fn test_default_spelled_exactly_is_not_duplicated() {
    let set = normalize(&flags(&["--verbose", "--noop"]), None, tables()).unwrap();
    assert_eq!(
        set.as_slice(),
        &flags(&["--verbose", "--noop", "--onetime", "--no-daemonize"])
    );
    assert_eq!(set.iter().filter(|f| *f == "--verbose").count(), 1);
}

#[test]
fn test_characters_outside_class_rejected() {
    for bad in ["--noop;rm", "--tags=web", "--environment production", "$HOME", "--noop|x", ""] {
        let err = normalize(&flags(&[bad]), None, tables()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson, "accepted {:?}", bad);
        assert!(err.to_string().contains(bad.trim()));
    }
}

#[test]
fn test_contradicting_default_rejected() {
    for bad in ["--daemonize", "--no-onetime", "--no-verbose"] {
        let err = normalize(&flags(&[bad]), None, tables()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
        assert!(err.to_string().contains("required default"), "{}", err);
    }
}

#[test]
fn test_non_whitelisted_rejected() {
    for bad in ["--server", "--no-splay_extra", "--certname", "-v"] {
        let err = normalize(&flags(&[bad]), None, tables()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
        assert!(err.to_string().contains("non-permitted"), "{}", err);
    }
}

#[test]
fn test_value_requires_preceding_option() {
    let err = normalize(&flags(&["production"]), None, tables()).unwrap_err();
    assert!(err.to_string().contains("non-permitted flag 'production'"));

    let err = normalize(&flags(&["--onetime", "production"]), None, tables()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidJson);

    let err = normalize(&flags(&["--environment", "a", "b"]), None, tables()).unwrap_err();
    assert!(err.to_string().contains("'b'"));
}

#[test]
fn test_normalization_is_idempotent() {
    let first = normalize(
        &flags(&["--environment", "staging", "--noop"]),
        Some("1234"),
        tables(),
    )
    .unwrap();
    let second = normalize(first.as_slice(), Some("1234"), tables()).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.iter().filter(|f| *f == JOB_ID_FLAG).count(), 1);
}

#[test]
fn test_foreign_job_id_rejected() {
    let requested = flags(&["--job-id", "other"]);
    assert!(normalize(&requested, Some("mine"), tables()).is_err());
    assert!(normalize(&requested, None, tables()).is_err());
    assert!(normalize(&flags(&["--job-id"]), Some("mine"), tables()).is_err());
}

#[test]
fn test_job_id_appended_verbatim() {
    let set = normalize(&[], Some("job 1/a"), tables()).unwrap();
    assert_eq!(&set.as_slice()[3..], ["--job-id", "job 1/a"]);

    let again = normalize(set.as_slice(), Some("job 1/a"), tables()).unwrap();
    assert_eq!(again, set);
}

#[test]
fn test_custom_tables() {
    let custom = FlagTables::new(&["--once"], &["color"]);
    let set = normalize(&flags(&["--no-color"]), None, &custom).unwrap();
    assert_eq!(set.as_slice(), &flags(&["--no-color", "--once"]));
    assert!(normalize(&flags(&["--noop"]), None, &custom).is_err());
}

#[test]
fn test_base_name() {
    assert_eq!(base_name("--no-daemonize"), "daemonize");
    assert_eq!(base_name("--noop"), "noop");
    assert_eq!(base_name("--no-noop"), "noop");
}

#[test]
fn test_display_joins_with_spaces() {
    let set = normalize(&[], None, tables()).unwrap();
    assert_eq!(set.to_string(), "--onetime --no-daemonize --verbose");
    assert_eq!(set.as_slice().len(), 3);
    assert_eq!(set.iter().count(), 3);
}
