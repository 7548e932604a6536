use crate::server::ServerError;

use googletest::prelude::*;

#[test]
fn given_startup_timeout_when_displayed_then_logs_included() {
    let error = ServerError::startup_timeout(45, "vite booting\nstill booting".into());

    let message = error.to_string();

    assert!(message.contains("45s"));
    assert!(message.ends_with("vite booting\nstill booting"));
    assert_that!(error.logs(), some(eq("vite booting\nstill booting")));
}

#[test]
fn given_errors_without_logs_when_queried_then_none() {
    assert_that!(ServerError::cancelled().logs(), none());
    assert_that!(ServerError::bundle_incomplete("/app/resources/node").logs(), none());
}

#[test]
fn given_cancelled_when_checked_then_only_cancelled_reports_true() {
    assert!(ServerError::cancelled().is_cancelled());
    assert!(!ServerError::exited_before_ready(String::new()).is_cancelled());
}

#[test]
fn given_bundle_incomplete_when_hint_then_suggests_reinstall() {
    let error = ServerError::bundle_incomplete("/app/resources/node_modules/@slidev/cli/bin/slidev.mjs");

    assert!(error.recovery_hint().contains("reinstall"));
    assert!(error.to_string().contains("slidev.mjs"));
}

#[test]
fn given_slides_error_when_converted_then_deck_variant() {
    let error = ServerError::from(studio_slides::SlidesError::invalid_file_name("../x.md"));

    assert!(matches!(error, ServerError::Deck { .. }));
    assert!(error.to_string().contains("../x.md"));
}

#[test]
fn given_config_error_when_converted_then_config_invalid() {
    let error = ServerError::from(studio_config::ConfigError::supervisor("bad timeout"));

    assert!(matches!(error, ServerError::ConfigInvalid { .. }));
    assert!(error.recovery_hint().contains("Configuration"));
}

#[test]
fn given_io_error_when_converted_then_io_variant() {
    let error = ServerError::from(std::io::Error::other("disk gone"));

    assert!(matches!(error, ServerError::Io { .. }));
}
